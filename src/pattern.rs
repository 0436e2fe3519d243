//! Fuzzy dish-pattern matching.
//!
//! Each provider carries a hand-curated catalog of regex patterns for the
//! dishes that recur on its menu. The expressions are written to survive OCR
//! damage: `.?` where compound words merge or split, character classes where
//! diacritics get misread ("Cevapcici" arrives as anything from "Ćevapčići"
//! to "Cevapcici"). Matching is case-insensitive and purely textual; the
//! catalog order decides ties.

use crate::model::Weekday;
use regex::Regex;

/// One catalog entry. `slot` names the menu position the entry competes for;
/// within a slot the first matching entry in declaration order wins.
#[derive(Debug, Clone, Copy)]
pub struct DishPattern {
    pub slot: &'static str,
    pub expr: &'static str,
    pub name: &'static str,
    pub ingredients: Option<&'static str>,
    pub category: Option<&'static str>,
    pub price: Option<&'static str>,
    pub day: Option<Weekday>,
    pub weekly_special: bool,
}

impl DishPattern {
    pub const fn new(slot: &'static str, expr: &'static str, name: &'static str) -> Self {
        DishPattern {
            slot,
            expr,
            name,
            ingredients: None,
            category: None,
            price: None,
            day: None,
            weekly_special: false,
        }
    }

    pub const fn ingredients(mut self, ingredients: &'static str) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    pub const fn category(mut self, category: &'static str) -> Self {
        self.category = Some(category);
        self
    }

    pub const fn price(mut self, price: &'static str) -> Self {
        self.price = Some(price);
        self
    }

    pub const fn day(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    pub const fn weekly_special(mut self) -> Self {
        self.weekly_special = true;
        self
    }
}

/// A pattern that matched somewhere in the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternHit {
    pub slot: &'static str,
    pub name: &'static str,
    pub ingredients: Option<&'static str>,
    pub category: Option<&'static str>,
    pub price: Option<&'static str>,
    pub day: Option<Weekday>,
    pub weekly_special: bool,
}

/// Scan the catalog in declaration order against `text`. At most one hit per
/// slot (first match wins); slots with no matching pattern are simply absent
/// from the result. A pattern that fails to compile never matches.
pub fn match_catalog(text: &str, catalog: &[DishPattern]) -> Vec<PatternHit> {
    let mut hits: Vec<PatternHit> = Vec::new();

    for entry in catalog {
        if hits.iter().any(|h| h.slot == entry.slot) {
            continue;
        }
        let Ok(re) = Regex::new(&format!("(?i){}", entry.expr)) else {
            continue;
        };
        if re.is_match(text) {
            hits.push(PatternHit {
                slot: entry.slot,
                name: entry.name,
                ingredients: entry.ingredients,
                category: entry.category,
                price: entry.price,
                day: entry.day,
                weekly_special: entry.weekly_special,
            });
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &[DishPattern] = &[
        DishPattern::new("Suppe", r"Frittatensuppe", "Frittatensuppe").category("Suppe"),
        DishPattern::new("Suppe", r"[\w]+suppe", "Suppe des Tages").category("Suppe"),
        DishPattern::new("Daily", r"Wiener\s*Schnitzel", "Wiener Schnitzel mit Beilage nach Wahl"),
        DishPattern::new("Special", r"Hirschragout", "Hirschragout")
            .price("€9.80")
            .weekly_special(),
    ];

    #[test]
    fn first_match_per_slot_wins() {
        let hits = match_catalog("heute: Frittatensuppe und Gemüsesuppe", CATALOG);
        let soup: Vec<_> = hits.iter().filter(|h| h.slot == "Suppe").collect();
        assert_eq!(soup.len(), 1);
        assert_eq!(soup[0].name, "Frittatensuppe");
    }

    #[test]
    fn generic_fallback_catches_unknown_soups() {
        let hits = match_catalog("Paradeisercremesuppe mit Basilikum", CATALOG);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Suppe des Tages");
    }

    #[test]
    fn matching_is_case_insensitive_and_spacing_tolerant() {
        let hits = match_catalog("WIENERSCHNITZEL mit Pommes", CATALOG);
        assert_eq!(hits[0].name, "Wiener Schnitzel mit Beilage nach Wahl");
    }

    #[test]
    fn unmatched_slots_are_absent_not_errors() {
        let hits = match_catalog("nichts davon steht hier", CATALOG);
        assert!(hits.is_empty());
    }

    #[test]
    fn matching_is_deterministic() {
        let text = "Frittatensuppe, Wiener Schnitzel, Hirschragout";
        let first = match_catalog(text, CATALOG);
        for _ in 0..5 {
            assert_eq!(match_catalog(text, CATALOG), first);
        }
    }

    #[test]
    fn weekly_special_flag_carries_through() {
        let hits = match_catalog("dazu Hirschragout im Glas", CATALOG);
        assert!(hits.iter().any(|h| h.weekly_special && h.price == Some("€9.80")));
    }

    #[test]
    fn ocr_damaged_diacritics_still_match() {
        let catalog = &[DishPattern::new("II", r"[CĆČ]evap[cčće]i[cčć]i", "Cevapcici")];
        for variant in ["Cevapcici", "Ćevapčići", "cevapcici", "Cevapeici"] {
            assert_eq!(match_catalog(variant, catalog).len(), 1, "{variant}");
        }
    }
}
