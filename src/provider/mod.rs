//! Provider abstraction.
//!
//! The restaurants are a closed set: each `ProviderKind` carries its own
//! static configuration (URLs, timeouts, pattern catalogs, column tables)
//! and one extraction pipeline. A `Provider` instance owns the memoized
//! weekly snapshot; callers only ever see structurally-complete menus, no
//! matter what the pipeline ran into.

pub mod food_garden;
pub mod nice_guys;
pub mod t_marx;

use crate::acquire::Fetcher;
use crate::error::MenuError;
use crate::model::{Weekday, WeekdayMenu, WeeklyMenuSet};
use crate::ocr::DocumentAnalyzer;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    NiceGuys,
    FoodGarden,
    TMarx,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::NiceGuys,
        ProviderKind::FoodGarden,
        ProviderKind::TMarx,
    ];

    /// Stable identifier used in request paths and query strings.
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::NiceGuys => "nice-guys",
            ProviderKind::FoodGarden => "food-garden",
            ProviderKind::TMarx => "t-marx",
        }
    }

    pub fn from_id(id: &str) -> Option<ProviderKind> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::NiceGuys => nice_guys::NAME,
            ProviderKind::FoodGarden => food_garden::NAME,
            ProviderKind::TMarx => t_marx::NAME,
        }
    }

    pub fn homepage(self) -> &'static str {
        match self {
            ProviderKind::NiceGuys => nice_guys::HOMEPAGE,
            ProviderKind::FoodGarden => food_garden::HOMEPAGE,
            ProviderKind::TMarx => t_marx::HOMEPAGE,
        }
    }

    pub fn menu_url(self) -> &'static str {
        match self {
            ProviderKind::NiceGuys => nice_guys::MENU_URL,
            ProviderKind::FoodGarden => food_garden::MENU_URL,
            ProviderKind::TMarx => t_marx::MENU_URL,
        }
    }

    pub fn fetch_timeout(self) -> Duration {
        match self {
            ProviderKind::NiceGuys => Duration::from_secs(10),
            ProviderKind::FoodGarden | ProviderKind::TMarx => Duration::from_secs(15),
        }
    }
}

/// One restaurant with its memoized weekly snapshot.
///
/// The `OnceLock` cell gives the at-most-once fetch guarantee: concurrent
/// first callers race to initialize once, later callers observe the stored
/// set. A fresh snapshot requires a fresh instance.
pub struct Provider {
    kind: ProviderKind,
    fetcher: Arc<dyn Fetcher>,
    analyzer: Arc<dyn DocumentAnalyzer>,
    cell: OnceLock<WeeklyMenuSet>,
}

impl Provider {
    pub fn new(
        kind: ProviderKind,
        fetcher: Arc<dyn Fetcher>,
        analyzer: Arc<dyn DocumentAnalyzer>,
    ) -> Self {
        Provider {
            kind,
            fetcher,
            analyzer,
            cell: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn homepage(&self) -> &'static str {
        self.kind.homepage()
    }

    /// The menu for one day, from the memoized weekly snapshot. A day the
    /// extraction produced nothing for comes back as a valid empty menu.
    pub fn get_menu(&self, day: Weekday) -> WeekdayMenu {
        self.weekly().get(day).clone()
    }

    fn weekly(&self) -> &WeeklyMenuSet {
        self.cell.get_or_init(|| self.fetch_weekly_menu())
    }

    /// Run the full pipeline for this provider. Every pipeline failure is
    /// absorbed here: network errors, corrupt PDFs, missing OCR and locator
    /// failures all degrade to the empty week. By design a caller cannot
    /// tell "the source published nothing" from "extraction failed".
    pub fn fetch_weekly_menu(&self) -> WeeklyMenuSet {
        let result = match self.kind {
            ProviderKind::NiceGuys => nice_guys::fetch_weekly_menu(self.fetcher.as_ref()),
            ProviderKind::FoodGarden => {
                food_garden::fetch_weekly_menu(self.fetcher.as_ref(), self.analyzer.as_ref())
            }
            ProviderKind::TMarx => {
                t_marx::fetch_weekly_menu(self.fetcher.as_ref(), self.analyzer.as_ref())
            }
        };

        match result {
            Ok(set) => set,
            Err(MenuError::OcrUnavailable) => {
                warn!(provider = self.name(), "OCR unavailable, serving empty week");
                WeeklyMenuSet::empty(self.name())
            }
            Err(err) => {
                warn!(provider = self.name(), %err, "menu extraction failed, serving empty week");
                WeeklyMenuSet::empty(self.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::NoopAnalyzer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches and always fails, exercising the degradation path.
    struct FailingFetcher {
        calls: AtomicUsize,
    }

    impl Fetcher for FailingFetcher {
        fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, MenuError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MenuError::Network(format!("{url}: connection timed out")))
        }
    }

    fn provider_with_failing_fetch(kind: ProviderKind) -> (Provider, Arc<FailingFetcher>) {
        let fetcher = Arc::new(FailingFetcher {
            calls: AtomicUsize::new(0),
        });
        let provider = Provider::new(kind, fetcher.clone(), Arc::new(NoopAnalyzer));
        (provider, fetcher)
    }

    #[test]
    fn get_menu_fetches_at_most_once_per_instance() {
        let (provider, fetcher) = provider_with_failing_fetch(ProviderKind::NiceGuys);

        let monday = provider.get_menu(Weekday::Monday);
        let friday = provider.get_menu(Weekday::Friday);

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(monday.day, Weekday::Monday);
        assert_eq!(friday.day, Weekday::Friday);
    }

    #[test]
    fn acquisition_failure_degrades_to_a_full_empty_week() {
        for kind in [ProviderKind::NiceGuys, ProviderKind::FoodGarden, ProviderKind::TMarx] {
            let (provider, _) = provider_with_failing_fetch(kind);
            let set = provider.fetch_weekly_menu();
            for day in Weekday::ALL {
                let menu = set.get(day);
                assert_eq!(menu.day, day);
                assert!(menu.dishes.is_empty(), "{kind:?} {day:?}");
                assert_eq!(menu.provider, kind.name());
            }
        }
    }

    #[test]
    fn missing_ocr_is_a_configuration_state_not_a_crash() {
        // Food Garden needs OCR; with the noop analyzer the fetch is never
        // even attempted and the week comes back empty.
        let (provider, fetcher) = provider_with_failing_fetch(ProviderKind::FoodGarden);
        let set = provider.fetch_weekly_menu();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(set.iter().all(|menu| menu.dishes.is_empty()));
    }

    #[test]
    fn concurrent_first_callers_observe_one_fetch() {
        let (provider, fetcher) = provider_with_failing_fetch(ProviderKind::NiceGuys);
        let provider = Arc::new(provider);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let provider = provider.clone();
                std::thread::spawn(move || {
                    let day = Weekday::ALL[i % 5];
                    provider.get_menu(day)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn provider_ids_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(ProviderKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ProviderKind::from_id("unknown"), None);
    }
}
