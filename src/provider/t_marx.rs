//! T-Marx by Eurest (Vienna).
//!
//! The menu PDF is a scanned five-column table, one column per weekday, with
//! a German and an English page. The pipeline rasterizes at 300 dpi, skips
//! the English page, locates the weekday columns (dynamically from the OCR'd
//! header row, with a hand-calibrated table as the configured fallback) and
//! then OCRs each day's column band separately. Slot catalogs recognize the
//! recurring dishes per category; category prices are fixed by the house.

use crate::acquire::Fetcher;
use crate::assemble::{contains_closure, dish_from_hit};
use crate::clean::clean;
use crate::error::MenuError;
use crate::layout::{Band, ColumnSpan, Locator};
use crate::model::{DishRecord, Weekday, WeekdayMenu, WeeklyMenuSet};
use crate::ocr::{DocumentAnalyzer, OcrMode};
use crate::pattern::{DishPattern, PatternHit, match_catalog};
use crate::pdf::{self, PageImage};
use regex::Regex;
use tracing::warn;

pub const NAME: &str = "T-Marx by Eurest";
pub const HOMEPAGE: &str = "https://menu.mitarbeiterrestaurant.at";
pub const MENU_URL: &str = "https://menu.mitarbeiterrestaurant.at/menu/t-marx-by-eurest.pdf";

const DPI: u32 = 300;
const LANG: &str = "deu";

/// Vertical band holding the dish text of every column (300 dpi pixels).
const CONTENT_BAND: Band = Band {
    top: 500,
    bottom: 1900,
};

/// Band the weekday header row sits in, for dynamic column location.
const HEADER_BAND: Band = Band {
    top: 300,
    bottom: 500,
};

const EDGE_MARGIN: u32 = 40;

/// Hand-calibrated 300 dpi column spans, measured off one observed rendering
/// (header centers: MONTAG=717, DIENSTAG=1269, MITTWOCH=1818,
/// DONNERSTAG=2352, FREITAG=2961). Selectable when the layout is known
/// stable; any upstream layout change silently breaks these.
pub const STATIC_COLUMNS: &[ColumnSpan] = &[
    ColumnSpan { day: Weekday::Monday, left: 650, right: 1060 },
    ColumnSpan { day: Weekday::Tuesday, left: 1060, right: 1625 },
    ColumnSpan { day: Weekday::Wednesday, left: 1625, right: 2175 },
    ColumnSpan { day: Weekday::Thursday, left: 2175, right: 2770 },
    ColumnSpan { day: Weekday::Friday, left: 2770, right: 3508 },
];

pub const DEFAULT_LOCATOR: Locator = Locator::Dynamic {
    header_band: HEADER_BAND,
    edge_margin: EDGE_MARGIN,
};

/// Fixed category prices.
const PRICE_SUPPE: &str = "€2,50";
const PRICE_TAGESTELLER: &str = "€8,00 - €9,10";
const PRICE_VEGETARISCH: &str = "€7,50 - €8,30";
const PRICE_BOWL: &str = "€7,80 - €8,70";
const PRICE_PASTA: &str = "€8,20 - €9,60";

/// Recurring dishes per category slot, ordered from most to least specific.
const CATALOG: &[DishPattern] = &[
    // Suppe
    DishPattern::new("Suppe", r"Klare,?\s*kräftige\s*Rindssuppe", "Klare, kräftige Rindssuppe")
        .category("Suppe")
        .price(PRICE_SUPPE),
    DishPattern::new("Suppe", r"Bohnensuppe", "Bohnensuppe")
        .category("Suppe")
        .price(PRICE_SUPPE),
    DishPattern::new("Suppe", r"Paradeisercremesuppe", "Paradeisercremesuppe")
        .category("Suppe")
        .price(PRICE_SUPPE),
    DishPattern::new("Suppe", r"Grießnockerlsuppe", "Grießnockerlsuppe")
        .category("Suppe")
        .price(PRICE_SUPPE),
    DishPattern::new("Suppe", r"Frittatensuppe", "Frittatensuppe")
        .category("Suppe")
        .price(PRICE_SUPPE),
    DishPattern::new("Suppe", r"Gemüsesuppe", "Gemüsesuppe")
        .category("Suppe")
        .price(PRICE_SUPPE),
    // The soup station sometimes just announces the chef's pick.
    DishPattern::new("Suppe", r"Chefs?\s*choice", "Chef's choice")
        .category("Suppe")
        .price(PRICE_SUPPE),
    // Tagesteller
    DishPattern::new(
        "Tagesteller",
        r"Gratinierte?\s*Schinkenfleckerl",
        "Gratinierte Schinkenfleckerl (Schwein) mit Blattsalat",
    )
    .category("Tagesteller")
    .price(PRICE_TAGESTELLER),
    DishPattern::new(
        "Tagesteller",
        r"Gebackene[sr]?\s*Hühnerschnitzel",
        "Gebackenes Hühnerschnitzel mit Beilage nach Wahl",
    )
    .category("Tagesteller")
    .price(PRICE_TAGESTELLER),
    DishPattern::new(
        "Tagesteller",
        r"Schweinsschopfbraten",
        "Schweinsschopfbraten im Natursaft mit Erdäpfelknödel",
    )
    .category("Tagesteller")
    .price(PRICE_TAGESTELLER),
    DishPattern::new(
        "Tagesteller",
        r"Calamari\s*gebacken",
        "Calamari gebacken mit Caesar Salat und Sauce Tartar",
    )
    .category("Tagesteller")
    .price(PRICE_TAGESTELLER),
    DishPattern::new("Tagesteller", r"Wiener\s*Schnitzel", "Wiener Schnitzel mit Beilage nach Wahl")
        .category("Tagesteller")
        .price(PRICE_TAGESTELLER),
    DishPattern::new("Tagesteller", r"Tafelspitz", "Tafelspitz mit klassischen Beilagen")
        .category("Tagesteller")
        .price(PRICE_TAGESTELLER),
    DishPattern::new("Tagesteller", r"Backhendl", "Backhendl mit Erdäpfelsalat")
        .category("Tagesteller")
        .price(PRICE_TAGESTELLER),
    // Vegetarisch
    DishPattern::new("Vegetarisch", r"Cremespinat", "Cremespinat mit Spiegelei und Röstkartoffel")
        .category("Vegetarisch")
        .price(PRICE_VEGETARISCH),
    DishPattern::new("Vegetarisch", r"Käsespätzle", "Käsespätzle mit Röstzwiebeln und Blattsalat")
        .category("Vegetarisch")
        .price(PRICE_VEGETARISCH),
    DishPattern::new(
        "Vegetarisch",
        r"Wokgemüse.*?Tofu",
        "Süß-Saures Wokgemüse mit Jasminreis und gegrilltem Tofu",
    )
    .category("Vegetarisch")
    .price(PRICE_VEGETARISCH),
    DishPattern::new("Vegetarisch", r"Spinatknödel", "Spinatknödel mit Salbeibutter")
        .category("Vegetarisch")
        .price(PRICE_VEGETARISCH),
    DishPattern::new("Vegetarisch", r"Gemüsecurry", "Gemüsecurry mit Reis")
        .category("Vegetarisch")
        .price(PRICE_VEGETARISCH),
    DishPattern::new("Vegetarisch", r"Erdäpfelgulasch", "Erdäpfelgulasch")
        .category("Vegetarisch")
        .price(PRICE_VEGETARISCH),
    DishPattern::new("Vegetarisch", r"Chefs?\s*choice", "Chef's choice")
        .category("Vegetarisch")
        .price(PRICE_VEGETARISCH),
    // Pasta & Co
    DishPattern::new("Pasta & Co", r"Pizza\s*Della\s*Casa", "Pizza Della Casa")
        .category("Pasta & Co")
        .price(PRICE_PASTA),
    DishPattern::new(
        "Pasta & Co",
        r"Rosa\s*Kalbstafelspitz",
        "Rosa Kalbstafelspitz mit Serviettenknödel und Waldpilzragout",
    )
    .category("Pasta & Co")
    .price(PRICE_PASTA),
    DishPattern::new(
        "Pasta & Co",
        r"Frische\s*Pasta.*?(Rinderbolognese|Pesto)",
        "Frische Pasta mit Rinderbolognese oder Pesto",
    )
    .category("Pasta & Co")
    .price(PRICE_PASTA),
    DishPattern::new("Pasta & Co", r"Rinderbolognese", "Pasta mit Rinderbolognese")
        .category("Pasta & Co")
        .price(PRICE_PASTA),
    DishPattern::new("Pasta & Co", r"Lasagne", "Lasagne")
        .category("Pasta & Co")
        .price(PRICE_PASTA),
];

pub fn fetch_weekly_menu(
    fetcher: &dyn Fetcher,
    analyzer: &dyn DocumentAnalyzer,
) -> Result<WeeklyMenuSet, MenuError> {
    fetch_weekly_menu_with(fetcher, analyzer, DEFAULT_LOCATOR)
}

/// Same pipeline with an explicit locator, for deployments pinning the
/// static column table.
pub fn fetch_weekly_menu_with(
    fetcher: &dyn Fetcher,
    analyzer: &dyn DocumentAnalyzer,
    locator: Locator,
) -> Result<WeeklyMenuSet, MenuError> {
    if !analyzer.available() {
        return Err(MenuError::OcrUnavailable);
    }

    let bytes = fetcher.fetch(MENU_URL, super::ProviderKind::TMarx.fetch_timeout())?;
    let pages = pdf::rasterize(&bytes, DPI)?;
    menu_from_pages(&pages, analyzer, locator)
}

/// Extract the weekly menu from already-rasterized pages, skipping the
/// English language version.
pub fn menu_from_pages(
    pages: &[PageImage],
    analyzer: &dyn DocumentAnalyzer,
    locator: Locator,
) -> Result<WeeklyMenuSet, MenuError> {
    for page in pages {
        if is_english_page(page, analyzer)? {
            continue;
        }
        return extract_menu_from_page(page, analyzer, locator);
    }

    warn!(provider = NAME, "no German menu page found");
    Ok(WeeklyMenuSet::empty(NAME))
}

/// The PDF carries both language versions; a quick OCR of the top-left
/// corner tells them apart.
fn is_english_page(page: &PageImage, analyzer: &dyn DocumentAnalyzer) -> Result<bool, MenuError> {
    let corner = page.crop(0, 0, 500, 300);
    let sample = analyzer.recognize(&corner, LANG, OcrMode::Block)?;
    Ok(sample.contains("Monday") || sample.contains("Week") || sample.contains("WEEK"))
}

/// OCR each located day column and parse it independently.
fn extract_menu_from_page(
    page: &PageImage,
    analyzer: &dyn DocumentAnalyzer,
    locator: Locator,
) -> Result<WeeklyMenuSet, MenuError> {
    let words = match locator {
        Locator::Dynamic { .. } => analyzer.recognize_words(page, LANG)?,
        Locator::Static(_) => Vec::new(),
    };
    let spans = locator.columns(&words, page.width())?;

    let mut set = WeeklyMenuSet::empty(NAME);
    for span in spans {
        let column = page.crop(span.left, CONTENT_BAND.top, span.right, CONTENT_BAND.bottom);
        let text = analyzer.recognize(&column, LANG, OcrMode::Column)?;
        set.set(parse_column(span.day, &text));
    }
    Ok(set)
}

/// Parse one day column's OCR output into that day's menu.
pub fn parse_column(day: Weekday, text: &str) -> WeekdayMenu {
    if contains_closure(text) {
        return WeekdayMenu::closed(day, NAME);
    }

    let cleaned = clean(text).replace('\n', " ");
    let hits = match_catalog(&cleaned, CATALOG);

    let mut dishes = Vec::new();
    push_slot(&mut dishes, &hits, "Suppe", || generic_soup(&cleaned));
    push_slot(&mut dishes, &hits, "Tagesteller", || generic_daily(&cleaned));
    push_slot(&mut dishes, &hits, "Vegetarisch", || None);
    // The bowl station runs every open day regardless of the printed menu.
    dishes.push(
        DishRecord::new("Create your own Bowl")
            .with_category("Bowl")
            .with_price(PRICE_BOWL),
    );
    push_slot(&mut dishes, &hits, "Pasta & Co", || None);

    WeekdayMenu {
        day,
        dishes,
        provider: NAME.to_string(),
        closed: false,
    }
}

fn push_slot(
    dishes: &mut Vec<DishRecord>,
    hits: &[PatternHit],
    slot: &str,
    fallback: impl FnOnce() -> Option<DishRecord>,
) {
    if let Some(hit) = hits.iter().find(|h| h.slot == slot) {
        dishes.push(dish_from_hit(hit));
    } else if let Some(dish) = fallback() {
        dishes.push(dish);
    }
}

/// Catch soups the catalog does not know by their "...suppe" suffix.
fn generic_soup(text: &str) -> Option<DishRecord> {
    let re = Regex::new(r"(?i)([\wäöüß]+suppe)").unwrap();
    let name = re.captures(text)?.get(1)?.as_str().to_string();
    Some(
        DishRecord::new(name)
            .with_category("Suppe")
            .with_price(PRICE_SUPPE),
    )
}

/// Catch unknown daily dishes by their side-dish phrasing.
fn generic_daily(text: &str) -> Option<DishRecord> {
    let re = Regex::new(r"(?i)(\w+(?:\s+\w+)?)\s+(?:mit\s+)?(?:Blattsalat|Beilage)").unwrap();
    let name = re.find(text)?.as_str().trim().to_string();
    Some(
        DishRecord::new(name)
            .with_category("Tagesteller")
            .with_price(PRICE_TAGESTELLER),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_normal_column_yields_all_five_stations() {
        // Typical PSM-4 column output with allergen codes and prices inline.
        let text = "Frittatensuppe A,C,G 2,50\nGebackenes Hühnerschnitzel A,C,G\nmit Beilage nach Wahl\nKäsespätzle |A,C,G 7,50\nFrische Pasta mit Rinderbolognese oder Pesto";
        let menu = parse_column(Weekday::Monday, text);

        assert!(!menu.closed);
        let names: Vec<_> = menu.dishes.iter().map(|d| d.name_de.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Frittatensuppe",
                "Gebackenes Hühnerschnitzel mit Beilage nach Wahl",
                "Käsespätzle mit Röstzwiebeln und Blattsalat",
                "Create your own Bowl",
                "Frische Pasta mit Rinderbolognese oder Pesto",
            ]
        );
        assert_eq!(menu.dishes[0].price.as_deref(), Some(PRICE_SUPPE));
        assert_eq!(menu.dishes[0].category.as_deref(), Some("Suppe"));
        assert_eq!(menu.dishes[3].price.as_deref(), Some(PRICE_BOWL));
    }

    #[test]
    fn feiertag_column_is_a_single_sentinel() {
        let menu = parse_column(Weekday::Thursday, "FEIERTAG\ngeschlossen");
        assert!(menu.closed);
        assert_eq!(menu.dishes.len(), 1);
        assert_eq!(menu.dishes[0].name_de, "Feiertag - Geschlossen");
        assert_eq!(menu.dishes[0].price, None);
    }

    #[test]
    fn unknown_soup_falls_back_to_the_captured_name() {
        let menu = parse_column(Weekday::Tuesday, "Kürbiscremesuppe\nTafelspitz");
        assert_eq!(menu.dishes[0].name_de, "Kürbiscremesuppe");
        assert_eq!(menu.dishes[0].category.as_deref(), Some("Suppe"));
        assert_eq!(menu.dishes[1].name_de, "Tafelspitz mit klassischen Beilagen");
    }

    #[test]
    fn chefs_choice_soup_survives_next_to_a_known_veggie_dish() {
        let menu = parse_column(Weekday::Monday, "Chefs choice 2,50\nSpinatknödel mit Salbeibutter");
        let soup = menu
            .dishes
            .iter()
            .find(|d| d.category.as_deref() == Some("Suppe"))
            .unwrap();
        assert_eq!(soup.name_de, "Chef's choice");
        let veggie = menu
            .dishes
            .iter()
            .find(|d| d.category.as_deref() == Some("Vegetarisch"))
            .unwrap();
        assert_eq!(veggie.name_de, "Spinatknödel mit Salbeibutter");
    }

    #[test]
    fn unknown_daily_is_caught_by_side_dish_phrasing() {
        let menu = parse_column(Weekday::Wednesday, "Gegrilltes Huhn mit Beilage");
        assert!(
            menu.dishes
                .iter()
                .any(|d| d.category.as_deref() == Some("Tagesteller")
                    && d.name_de.contains("Huhn"))
        );
    }

    #[test]
    fn bowl_station_is_always_present_on_open_days() {
        let menu = parse_column(Weekday::Friday, "völlig unleserlicher OCR Müll");
        assert_eq!(menu.dishes.len(), 1);
        assert_eq!(menu.dishes[0].name_de, "Create your own Bowl");
    }

    #[test]
    fn static_table_covers_the_full_page_in_order() {
        let mut last_right = 0;
        for (span, day) in STATIC_COLUMNS.iter().zip(Weekday::ALL) {
            assert_eq!(span.day, day);
            assert!(span.left >= last_right);
            assert!(span.right > span.left);
            last_right = span.right;
        }
        assert_eq!(STATIC_COLUMNS.last().unwrap().right, 3508);
    }
}
