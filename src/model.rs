use serde::Serialize;
use std::str::FromStr;

/// The five days a lunch menu covers. Weekend input is the caller's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn english(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    pub fn german(self) -> &'static str {
        match self {
            Weekday::Monday => "Montag",
            Weekday::Tuesday => "Dienstag",
            Weekday::Wednesday => "Mittwoch",
            Weekday::Thursday => "Donnerstag",
            Weekday::Friday => "Freitag",
        }
    }

    fn index(self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
        }
    }

    /// Today's weekday, with weekends mapped to Monday (next menu of interest).
    pub fn today_or_monday() -> Weekday {
        use chrono::Datelike;
        match chrono::Local::now().weekday() {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat | chrono::Weekday::Sun => Weekday::Monday,
        }
    }
}

impl FromStr for Weekday {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            _ => Err(()),
        }
    }
}

/// One dish on a day's menu.
///
/// `name_en` starts empty and is filled lazily by the translation
/// collaborator at the serving boundary, at most once per distinct German
/// string (the translator caches by source text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishRecord {
    pub name_de: String,
    pub name_en: String,
    pub price: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl DishRecord {
    pub fn new(name_de: impl Into<String>) -> Self {
        DishRecord {
            name_de: name_de.into(),
            name_en: String::new(),
            price: None,
            category: None,
            description: None,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The sentinel record a closed/holiday day carries instead of dishes.
    pub fn closure_sentinel() -> Self {
        DishRecord {
            name_de: "Feiertag - Geschlossen".to_string(),
            name_en: "Holiday - Closed".to_string(),
            price: None,
            category: None,
            description: None,
        }
    }
}

/// A single day's menu for one provider. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayMenu {
    pub day: Weekday,
    pub dishes: Vec<DishRecord>,
    pub provider: String,
    pub closed: bool,
}

impl WeekdayMenu {
    pub fn empty(day: Weekday, provider: &str) -> Self {
        WeekdayMenu {
            day,
            dishes: Vec::new(),
            provider: provider.to_string(),
            closed: false,
        }
    }

    /// A closed day holds exactly the sentinel record and nothing else.
    pub fn closed(day: Weekday, provider: &str) -> Self {
        WeekdayMenu {
            day,
            dishes: vec![DishRecord::closure_sentinel()],
            provider: provider.to_string(),
            closed: true,
        }
    }
}

/// A full Monday-to-Friday snapshot. Always carries all five days, possibly
/// with empty dish lists; a partial week never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyMenuSet {
    days: [WeekdayMenu; 5],
}

impl WeeklyMenuSet {
    pub fn empty(provider: &str) -> Self {
        WeeklyMenuSet {
            days: Weekday::ALL.map(|day| WeekdayMenu::empty(day, provider)),
        }
    }

    pub fn get(&self, day: Weekday) -> &WeekdayMenu {
        &self.days[day.index()]
    }

    pub fn set(&mut self, menu: WeekdayMenu) {
        let idx = menu.day.index();
        self.days[idx] = menu;
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeekdayMenu> {
        self.days.iter()
    }

    /// Append a dish to every day that is not flagged closed. Used for
    /// weekly specials that apply to the whole week.
    pub fn push_to_all_open(&mut self, dish: &DishRecord) {
        for menu in self.days.iter_mut() {
            if !menu.closed {
                menu.dishes.push(dish.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parses_english_names_case_insensitively() {
        assert_eq!("monday".parse(), Ok(Weekday::Monday));
        assert_eq!("FRIDAY".parse(), Ok(Weekday::Friday));
        assert_eq!("Wednesday".parse(), Ok(Weekday::Wednesday));
        assert!("Saturday".parse::<Weekday>().is_err());
        assert!("Montag".parse::<Weekday>().is_err());
    }

    #[test]
    fn empty_week_has_all_five_days() {
        let set = WeeklyMenuSet::empty("Test");
        for day in Weekday::ALL {
            let menu = set.get(day);
            assert_eq!(menu.day, day);
            assert!(menu.dishes.is_empty());
            assert!(!menu.closed);
        }
    }

    #[test]
    fn set_replaces_the_slot_for_the_menus_own_day() {
        let mut set = WeeklyMenuSet::empty("Test");
        let mut menu = WeekdayMenu::empty(Weekday::Wednesday, "Test");
        menu.dishes.push(DishRecord::new("Gulasch").with_price("€8.50"));
        set.set(menu);

        assert_eq!(set.get(Weekday::Wednesday).dishes.len(), 1);
        assert_eq!(set.get(Weekday::Wednesday).dishes[0].name_de, "Gulasch");
        assert!(set.get(Weekday::Tuesday).dishes.is_empty());
    }

    #[test]
    fn closed_day_is_a_single_unpriced_sentinel() {
        let menu = WeekdayMenu::closed(Weekday::Thursday, "Test");
        assert!(menu.closed);
        assert_eq!(menu.dishes.len(), 1);
        assert_eq!(menu.dishes[0].price, None);
        assert_eq!(menu.dishes[0].name_de, "Feiertag - Geschlossen");
    }

    #[test]
    fn weekly_special_skips_closed_days() {
        let mut set = WeeklyMenuSet::empty("Test");
        set.set(WeekdayMenu::closed(Weekday::Monday, "Test"));
        set.push_to_all_open(&DishRecord::new("Hirschragout").with_price("€9.80"));

        assert_eq!(set.get(Weekday::Monday).dishes.len(), 1);
        assert!(set.get(Weekday::Monday).closed);
        assert_eq!(set.get(Weekday::Tuesday).dishes.len(), 1);
        assert_eq!(set.get(Weekday::Tuesday).dishes[0].name_de, "Hirschragout");
    }
}
