//! Weekday column geometry.
//!
//! Coordinate-based providers print the week as five columns. Where the
//! publisher shifts the layout between weeks, we locate the weekday headers
//! dynamically from OCR word positions; where the layout has been stable the
//! provider config pins a hand-calibrated table instead. Both paths produce
//! the same `ColumnSpan`s, consumed immediately by column extraction and
//! never persisted.

use crate::error::{MIN_HEADERS, MenuError};
use crate::model::Weekday;
use crate::ocr::WordBox;

/// Horizontal extent of one weekday's column on a rasterized page, in pixels
/// at the rasterization DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub day: Weekday,
    pub left: u32,
    pub right: u32,
}

/// Vertical band (y range) in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub top: u32,
    pub bottom: u32,
}

/// How a provider derives its column spans.
#[derive(Debug, Clone, Copy)]
pub enum Locator {
    /// Find weekday headers in the given vertical band of the page.
    Dynamic { header_band: Band, edge_margin: u32 },
    /// Hand-calibrated spans for a known-stable layout.
    Static(&'static [ColumnSpan]),
}

/// Both English and German header spellings occur across the sources.
const DAY_WORDS: &[(&str, Weekday)] = &[
    ("MONTAG", Weekday::Monday),
    ("MONDAY", Weekday::Monday),
    ("DIENSTAG", Weekday::Tuesday),
    ("TUESDAY", Weekday::Tuesday),
    ("MITTWOCH", Weekday::Wednesday),
    ("WEDNESDAY", Weekday::Wednesday),
    ("DONNERSTAG", Weekday::Thursday),
    ("THURSDAY", Weekday::Thursday),
    ("FREITAG", Weekday::Friday),
    ("FRIDAY", Weekday::Friday),
];

// Keeps digits so that OCR confusions like "M0NTAG" stay one substitution
// away from the dictionary entry instead of shrinking the word.
fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

fn hamming_within_one(a: &str, b: &str) -> bool {
    if a.chars().count() != b.chars().count() {
        return false;
    }
    a.chars().zip(b.chars()).filter(|(x, y)| x != y).count() <= 1
}

/// Match an OCR word against the weekday dictionary, tolerating one
/// substituted character or a truncated tail (at least five leading
/// characters intact).
pub fn weekday_for_word(word: &str) -> Option<Weekday> {
    let norm = normalize(word);
    if norm.len() < 5 {
        return None;
    }
    for (name, day) in DAY_WORDS {
        if hamming_within_one(&norm, name) {
            return Some(*day);
        }
        if name.len() > norm.len() && name.starts_with(norm.as_str()) {
            return Some(*day);
        }
    }
    None
}

/// Dynamic column location from OCR word boxes.
///
/// Collects header hits inside the header band, requires at least three of
/// the five days, sorts the found days by horizontal center and splits the
/// page at neighbor midpoints. The first and last spans run to the page
/// edges minus `edge_margin`. Days whose header was not found get no span.
pub fn locate_columns(
    words: &[WordBox],
    page_width: u32,
    header_band: Band,
    edge_margin: u32,
) -> Result<Vec<ColumnSpan>, MenuError> {
    // (horizontal center, day), first hit per day wins
    let mut headers: Vec<(u32, Weekday)> = Vec::new();
    for word in words {
        let center_y = word.y + word.h / 2;
        if center_y < header_band.top || center_y > header_band.bottom {
            continue;
        }
        let Some(day) = weekday_for_word(&word.text) else {
            continue;
        };
        if headers.iter().any(|(_, d)| *d == day) {
            continue;
        }
        headers.push((word.x + word.w / 2, day));
    }

    if headers.len() < MIN_HEADERS {
        return Err(MenuError::InsufficientHeaders {
            found: headers.len(),
        });
    }

    headers.sort_by_key(|(center, _)| *center);

    let mut spans = Vec::with_capacity(headers.len());
    for (i, (center, day)) in headers.iter().enumerate() {
        let left = if i == 0 {
            edge_margin
        } else {
            (headers[i - 1].0 + center) / 2
        };
        let right = if i == headers.len() - 1 {
            page_width.saturating_sub(edge_margin)
        } else {
            (center + headers[i + 1].0) / 2
        };
        spans.push(ColumnSpan {
            day: *day,
            left,
            right,
        });
    }

    Ok(spans)
}

impl Locator {
    pub fn columns(
        &self,
        words: &[WordBox],
        page_width: u32,
    ) -> Result<Vec<ColumnSpan>, MenuError> {
        match self {
            Locator::Dynamic {
                header_band,
                edge_margin,
            } => locate_columns(words, page_width, *header_band, *edge_margin),
            Locator::Static(spans) => Ok(spans.to_vec()),
        }
    }
}
