//! Food Garden (Vienna).
//!
//! The menu PDF is image-only: a five-column table rendered as a picture.
//! The table rows survive OCR only as jumbled row text ("Linsen-Kokos-Curry
//! NF Rotkrautstrudel ACGO Vegane Ravioli ..."), so instead of geometry this
//! pipeline OCRs whole pages and searches for the recurring dishes with a
//! day-slotted pattern catalog. The catalog is re-curated when the kitchen
//! rotates its lineup.

use crate::acquire::Fetcher;
use crate::assemble::weekly_from_day_hits;
use crate::error::MenuError;
use crate::model::{Weekday, WeeklyMenuSet};
use crate::ocr::{DocumentAnalyzer, OcrMode};
use crate::pattern::{DishPattern, match_catalog};
use crate::pdf;

pub const NAME: &str = "Food Garden";
pub const HOMEPAGE: &str = "https://foodgarden.wien";
pub const MENU_URL: &str =
    "https://foodgarden.wien/wp-content/uploads/Foodgarden-Aloha-Bowl-Menu.pdf";

const DPI: u32 = 300;
const LANG: &str = "deu";

/// Rows read left to right are Monday to Friday. Dish I is the vegetarian
/// row, Dish II the meat row. Expressions tolerate the usual OCR damage:
/// swallowed hyphens, merged compounds, mangled diacritics.
const CATALOG: &[DishPattern] = &[
    DishPattern::new("I-Mon", r"Linsen.?Kokos.?Curry", "Linsen-Kokos-Curry")
        .ingredients("Rote Linsen, Süßkartoffel, Basmatireis, Koriander")
        .price("€8.90")
        .day(Weekday::Monday),
    DishPattern::new("I-Tue", r"Rotkrautstrudel", "Rotkrautstrudel")
        .ingredients("Ziegenkäse, Schnittlauch-Rahm-Dip, frischer Rucola")
        .price("€8.90")
        .day(Weekday::Tuesday),
    DishPattern::new("I-Wed", r"Vegane\s*Ravioli|Triangolo\s*Portobello", "Vegane Ravioli Triangolo")
        .ingredients("Portobello, leichte Kräutersauce, Grana Padano")
        .price("€8.90")
        .day(Weekday::Wednesday),
    DishPattern::new("I-Thu", r"Kürbis.?Spinat.?Lasagne", "Kürbis-Spinat-Lasagne")
        .ingredients("Schafkäse, Kürbiskerne, Blattsalat, Hausdressing")
        .price("€8.90")
        .day(Weekday::Thursday),
    DishPattern::new("I-Fri", r"Ebly.?Gemüse.?Risotto", "Ebly-Gemüse-Risotto")
        .ingredients("Wurzelgemüse, Kürbis, getrocknete Paradeiser")
        .price("€8.90")
        .day(Weekday::Friday),
    DishPattern::new("II-Mon", r"Spaghetti\s*Carbonara", "Spaghetti Carbonara")
        .ingredients("Zwiebel, Speck, Ei, Grana Padano, frische Petersilie")
        .price("€8.90")
        .day(Weekday::Monday),
    DishPattern::new("II-Tue", r"Cordon\s*Bleu", "Cordon Bleu von der Pute")
        .ingredients("Petersilerdäpfel, Preiselbeeren, Bio-Zitrone")
        .price("€8.90")
        .day(Weekday::Tuesday),
    DishPattern::new("II-Wed", r"[CĆČ]evap[cčće]i[cčć]i", "Cevapcici")
        .ingredients("Potato Wedges, Ajvar, Zwiebelsenf, Minz-Dip")
        .price("€8.90")
        .day(Weekday::Wednesday),
    DishPattern::new("II-Thu", r"Chicken\s*Tikka\s*Masala", "Chicken Tikka Masala")
        .ingredients("Jasminreis, Kichererbsen, gehackte Cashewnüsse")
        .price("€8.90")
        .day(Weekday::Thursday),
    DishPattern::new("II-Fri", r"Sayadiya|[Ss]eehechtfil", "Sayadiya - gebratenes Seehechtfilet")
        .ingredients("orientalischer Gewürzreis, karamellisierte Zwiebeln")
        .price("€8.90")
        .day(Weekday::Friday),
    DishPattern::new("special", r"Hirschragout", "Hirschragout (Weekly Special)")
        .ingredients("Serviettenknödel, Preiselbeeren")
        .price("€9.80")
        .weekly_special(),
];

pub fn fetch_weekly_menu(
    fetcher: &dyn Fetcher,
    analyzer: &dyn DocumentAnalyzer,
) -> Result<WeeklyMenuSet, MenuError> {
    if !analyzer.available() {
        return Err(MenuError::OcrUnavailable);
    }

    let bytes = fetcher.fetch(MENU_URL, super::ProviderKind::FoodGarden.fetch_timeout())?;
    let pages = pdf::rasterize(&bytes, DPI)?;

    let mut full_text = String::new();
    for page in &pages {
        full_text.push_str(&analyzer.recognize(page, LANG, OcrMode::Block)?);
        full_text.push('\n');
    }

    Ok(parse_menu_text(&full_text))
}

/// Match the dish catalog against whole-page OCR output and assemble the
/// week; the weekly special is replicated to every day it is found for.
pub fn parse_menu_text(text: &str) -> WeeklyMenuSet {
    let hits = match_catalog(text, CATALOG);
    weekly_from_day_hits(&hits, NAME)
}
