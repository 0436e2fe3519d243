//! Turning matched text into weekly menus.
//!
//! Two assembly strategies exist, matching the two kinds of source PDF:
//! a line scan over text-layer output, where German weekday names mark
//! section boundaries, and a column assembly for OCR sources, where pattern
//! hits already carry their day or category slot. Both always return a full
//! Monday-to-Friday set.

use crate::model::{DishRecord, Weekday, WeekdayMenu, WeeklyMenuSet};
use crate::pattern::PatternHit;
use regex::Regex;
use std::sync::OnceLock;

/// Configuration for the line-scan strategy.
pub struct LineScanConfig<'a> {
    pub provider: &'a str,
    /// Ordinal price tiers: first dish gets tier 0, second tier 1, any
    /// further dish falls back to tier 0. Only fills dishes without an
    /// inline price.
    pub tier_prices: &'a [&'a str],
    /// Lowercase substrings marking boilerplate lines (addresses, opening
    /// hours, allergen legends) that are never dishes.
    pub skip_markers: &'a [&'a str],
}

fn price_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"€\s*(\d+[.,]\d{2})").unwrap(),
            Regex::new(r"(\d+[.,]\d{2})\s*€").unwrap(),
            Regex::new(r"EUR\s*(\d+[.,]\d{2})").unwrap(),
        ]
    })
}

/// Split an inline price off a dish line, normalizing to `€X.XX`.
fn split_price(line: &str) -> (String, Option<String>) {
    for re in price_res() {
        if let Some(caps) = re.captures(line) {
            let price = format!("€{}", caps[1].replace(',', "."));
            let rest = re.replace(line, "").trim().to_string();
            return (rest, Some(price));
        }
    }
    (line.trim().to_string(), None)
}

/// Allergen legend lines ("A Gluten C Eier G Milch ...") read like dish text
/// to a naive scan; recognize them by their code-word cadence.
fn is_allergen_line(line: &str) -> bool {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    let res = RES.get_or_init(|| {
        vec![
            Regex::new(
                r"(?i)\b[A-R]\s+(Gluten|Krebstiere|Eier|Fisch|Erdnüsse|Sojabohnen|Milch|Schalenfrüchte|Sellerie|Senf|Sesam|Sulfite|Lupinen|Weichtiere)",
            )
            .unwrap(),
            Regex::new(r"^[A-R](\s+[A-R]){2,}").unwrap(),
            Regex::new(r"^([A-R]\s+\w+\s+){2,}").unwrap(),
        ]
    });
    if res.iter().any(|re| re.is_match(line)) {
        return true;
    }
    // Three or more "code word" pairs is a legend even without known names.
    static PAIR: OnceLock<Regex> = OnceLock::new();
    let pair = PAIR.get_or_init(|| Regex::new(r"[A-R]\s+\w+").unwrap());
    pair.find_iter(line).count() >= 3
}

/// Parse one text-layer line into a dish candidate. Returns `None` for
/// boilerplate, allergen legends and fragments too short to be a dish.
pub fn parse_dish_line(line: &str, skip_markers: &[&str]) -> Option<DishRecord> {
    if is_allergen_line(line) {
        return None;
    }

    let lower = line.to_lowercase();
    if skip_markers.iter().any(|marker| lower.contains(marker)) {
        return None;
    }

    if line.chars().count() < 4 {
        return None;
    }

    let (name, price) = split_price(line);
    let name = name
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '|' | '/' | ':' | ','))
        .to_string();
    if name.chars().count() < 3 {
        return None;
    }

    let mut dish = DishRecord::new(name);
    dish.price = price;
    Some(dish)
}

/// Ordinal fallback pricing for dishes the text gave no explicit price.
pub fn assign_tier_prices(dishes: &mut [DishRecord], tiers: &[&str]) {
    for (i, dish) in dishes.iter_mut().enumerate() {
        if dish.price.is_none() {
            let tier = tiers.get(i).or_else(|| tiers.first());
            dish.price = tier.map(|t| t.to_string());
        }
    }
}

fn day_in_line(line: &str) -> Option<Weekday> {
    let lower = line.to_lowercase();
    Weekday::ALL
        .into_iter()
        .find(|day| lower.contains(&day.german().to_lowercase()))
}

fn strip_day_names(line: &str) -> String {
    let mut rest = line.to_string();
    for day in Weekday::ALL {
        let re = Regex::new(&format!("(?i){}", day.german())).unwrap();
        rest = re.replace_all(&rest, "").to_string();
    }
    rest.trim().to_string()
}

/// Line-scan assembly for text-layer sources.
///
/// A line containing a German weekday name opens that day's section; the
/// remainder of the marker line and every following line accumulate as that
/// day's dishes until the next marker. Tier pricing fills in whatever the
/// text did not price explicitly.
pub fn line_scan(text: &str, cfg: &LineScanConfig) -> WeeklyMenuSet {
    let mut set = WeeklyMenuSet::empty(cfg.provider);

    let mut current_day: Option<Weekday> = None;
    let mut current: Vec<DishRecord> = Vec::new();

    let flush = |day: Option<Weekday>, dishes: &mut Vec<DishRecord>, set: &mut WeeklyMenuSet| {
        if let Some(day) = day {
            if !dishes.is_empty() {
                assign_tier_prices(dishes, cfg.tier_prices);
                set.set(WeekdayMenu {
                    day,
                    dishes: std::mem::take(dishes),
                    provider: cfg.provider.to_string(),
                    closed: false,
                });
            }
        }
        dishes.clear();
    };

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(day) = day_in_line(line) {
            flush(current_day, &mut current, &mut set);
            current_day = Some(day);

            // Menu content can share the marker line with the day name.
            let remainder = strip_day_names(line);
            if remainder.chars().count() > 3 {
                if let Some(dish) = parse_dish_line(&remainder, cfg.skip_markers) {
                    current.push(dish);
                }
            }
        } else if current_day.is_some() {
            if let Some(dish) = parse_dish_line(line, cfg.skip_markers) {
                current.push(dish);
            }
        }
    }
    flush(current_day, &mut current, &mut set);

    set
}

/// Closure keywords, bilingual. A day column containing any of these is a
/// holiday and carries only the sentinel record.
pub fn contains_closure(text: &str) -> bool {
    let upper = text.to_uppercase();
    ["FEIERTAG", "GESCHLOSSEN", "HOLIDAY", "CLOSED"]
        .iter()
        .any(|kw| upper.contains(kw))
}

/// Column-free assembly from day-slotted pattern hits (whole-page OCR
/// sources): day-tied hits land on their day, weekly specials replicate to
/// every open day.
pub fn weekly_from_day_hits(hits: &[PatternHit], provider: &str) -> WeeklyMenuSet {
    let mut set = WeeklyMenuSet::empty(provider);

    for hit in hits.iter().filter(|h| !h.weekly_special) {
        let Some(day) = hit.day else {
            continue;
        };
        let mut menu = set.get(day).clone();
        menu.dishes.push(dish_from_hit(hit));
        set.set(menu);
    }

    for hit in hits.iter().filter(|h| h.weekly_special) {
        set.push_to_all_open(&dish_from_hit(hit));
    }

    set
}

/// Canonical record for a pattern hit: "Name (ingredients)" the way the
/// sources list them, fixed price and category from the catalog.
pub fn dish_from_hit(hit: &PatternHit) -> DishRecord {
    let name = match hit.ingredients {
        Some(ingredients) => format!("{} ({ingredients})", hit.name),
        None => hit.name.to_string(),
    };
    let mut dish = DishRecord::new(name);
    dish.price = hit.price.map(str::to_string);
    dish.category = hit.category.map(str::to_string);
    dish
}
