//! The Nice Guys (Vienna).
//!
//! The weekly menu PDF carries a real text layer, so this pipeline is pure
//! text: download, extract the text layer, line-scan it with German weekday
//! markers. Prices are rarely printed per dish; the house charges fixed
//! Tagesteller rates, applied by ordinal position.

use crate::acquire::Fetcher;
use crate::assemble::{LineScanConfig, line_scan};
use crate::error::MenuError;
use crate::model::WeeklyMenuSet;
use crate::pdf;

pub const NAME: &str = "The Nice Guys";
pub const HOMEPAGE: &str = "https://www.theniceguys.at";
pub const MENU_URL: &str = "https://www.theniceguys.at/data/wochenmenue.pdf";

/// Tagesteller rate, then the vegetarian rate; further dishes fall back to
/// the first tier.
const TIER_PRICES: &[&str] = &["€11.20", "€10.30"];

/// Boilerplate the menu PDF repeats every week: header, contact block and
/// allergen legend. Never dish text.
const SKIP_MARKERS: &[&str] = &[
    "wochenmenu",
    "weekly",
    "menu",
    "nice guys",
    "www.",
    "http",
    "tel:",
    "fax:",
    "email",
    "@",
    "reservierung",
    "öffnungszeiten",
    "opening",
    "closed",
    "geschlossen",
    "allergene",
    "allergen",
    "enthält",
    "contains",
];

pub fn fetch_weekly_menu(fetcher: &dyn Fetcher) -> Result<WeeklyMenuSet, MenuError> {
    let bytes = fetcher.fetch(MENU_URL, super::ProviderKind::NiceGuys.fetch_timeout())?;
    let text = pdf::extract_text(&bytes)?;
    Ok(parse_menu_text(&text))
}

/// Line-scan the extracted text layer into the weekly set.
pub fn parse_menu_text(text: &str) -> WeeklyMenuSet {
    line_scan(
        text,
        &LineScanConfig {
            provider: NAME,
            tier_prices: TIER_PRICES,
            skip_markers: SKIP_MARKERS,
        },
    )
}
