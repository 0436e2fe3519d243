//! OCR text cleanup.
//!
//! Menu cells come back from OCR littered with allergen codes, kcal counts
//! and price fragments. `clean` strips those in a fixed order so the pattern
//! catalogs only ever see dish text. The function is pure and idempotent.

use regex::Regex;
use std::sync::OnceLock;

/// Lines with less than this share of alphabetic characters are OCR noise
/// (stray digits, table rules), not dish text.
const MIN_ALPHA_RATIO: f64 = 0.4;

fn allergen_chain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "A,C,G" style chains, and codes glued to a | or / table separator,
    // where even a single letter is an allergen mark.
    RE.get_or_init(|| Regex::new(r"[|/][A-Z](,[A-Z])*\b|\b[A-Z](,[A-Z])+\b").unwrap())
}

fn kcal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\d+\s*kcal").unwrap())
}

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Euro-prefixed, euro-suffixed and bare decimal amounts.
    RE.get_or_init(|| Regex::new(r"€\s*\d+[.,]\d{2}|\d+[.,]\d{2}\s*€|\d+[.,]\d{2}").unwrap())
}

/// A standalone run of 1-3 uppercase letters is an allergen code
/// ("A", "AG", "NF"), never a dish word.
fn is_allergen_token(token: &str) -> bool {
    let len = token.chars().count();
    (1..=3).contains(&len) && token.chars().all(|c| c.is_uppercase() && c.is_alphabetic())
}

fn alpha_ratio(line: &str) -> f64 {
    let total = line.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return 0.0;
    }
    let alpha = line.chars().filter(|c| c.is_alphabetic()).count();
    alpha as f64 / total as f64
}

/// Strip allergen codes, kcal annotations and embedded prices from raw cell
/// text, collapse whitespace and drop noise lines. Hyphens and commas inside
/// dish names survive untouched.
pub fn clean(raw: &str) -> String {
    let mut kept: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = allergen_chain_re().replace_all(line, " ");
        let line = kcal_re().replace_all(&line, " ");
        let line = currency_re().replace_all(&line, " ");

        let words: Vec<&str> = line
            .split_whitespace()
            .filter(|w| !is_allergen_token(w))
            .collect();
        let line = words.join(" ");

        if line.is_empty() || alpha_ratio(&line) < MIN_ALPHA_RATIO {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}
