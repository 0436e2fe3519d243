//! Provider-boundary behavior under upstream failure.
//!
//! Whatever goes wrong below the provider - network, corrupt bytes, missing
//! OCR - callers must still receive a structurally complete Monday-to-Friday
//! set, and never see an error.

use image::DynamicImage;
use lunch_finder_api::acquire::Fetcher;
use lunch_finder_api::error::MenuError;
use lunch_finder_api::ocr::{DocumentAnalyzer, NoopAnalyzer, OcrMode, WordBox};
use lunch_finder_api::pdf::PageImage;
use lunch_finder_api::provider::t_marx;
use lunch_finder_api::{Provider, ProviderKind, Weekday};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves fixed bytes, counting calls.
struct StubFetcher {
    bytes: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn failing() -> Self {
        StubFetcher {
            bytes: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn serving(bytes: &[u8]) -> Self {
        StubFetcher {
            bytes: Some(bytes.to_vec()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, MenuError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.bytes {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(MenuError::Network(format!("{url}: timed out"))),
        }
    }
}

fn assert_full_empty_week(provider: &Provider) {
    let set = provider.fetch_weekly_menu();
    for day in Weekday::ALL {
        let menu = set.get(day);
        assert_eq!(menu.day, day);
        assert!(menu.dishes.is_empty());
        assert!(!menu.closed);
        assert_eq!(menu.provider, provider.name());
    }
}

#[test]
fn network_timeout_degrades_every_provider_to_an_empty_week() {
    for kind in ProviderKind::ALL {
        let provider = Provider::new(
            kind,
            Arc::new(StubFetcher::failing()),
            Arc::new(NoopAnalyzer),
        );
        assert_full_empty_week(&provider);
    }
}

#[test]
fn corrupt_pdf_bytes_degrade_to_an_empty_week() {
    // Nice Guys goes through the text-layer extractor, which rejects these.
    let provider = Provider::new(
        ProviderKind::NiceGuys,
        Arc::new(StubFetcher::serving(b"<html>definitely not a pdf</html>")),
        Arc::new(NoopAnalyzer),
    );
    assert_full_empty_week(&provider);
}

#[test]
fn ocr_providers_without_an_engine_never_touch_the_network() {
    for kind in [ProviderKind::FoodGarden, ProviderKind::TMarx] {
        let fetcher = Arc::new(StubFetcher::serving(b"%PDF-1.4"));
        let provider = Provider::new(kind, fetcher.clone(), Arc::new(NoopAnalyzer));
        assert_full_empty_week(&provider);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0, "{kind:?}");
    }
}

/// An always-available engine that recognizes nothing but serves canned
/// word boxes, standing in for a scan with a damaged header row.
struct CannedWordsAnalyzer {
    words: Vec<WordBox>,
}

impl DocumentAnalyzer for CannedWordsAnalyzer {
    fn available(&self) -> bool {
        true
    }

    fn recognize(&self, _: &PageImage, _: &str, _: OcrMode) -> Result<String, MenuError> {
        Ok(String::new())
    }

    fn recognize_words(&self, _: &PageImage, _: &str) -> Result<Vec<WordBox>, MenuError> {
        Ok(self.words.clone())
    }
}

fn header_box(text: &str, center_x: u32) -> WordBox {
    WordBox {
        text: text.to_string(),
        x: center_x - 50,
        y: 380,
        w: 100,
        h: 40,
    }
}

fn blank_page() -> PageImage {
    PageImage {
        image: DynamicImage::new_rgb8(3508, 2480),
        dpi: 300,
    }
}

#[test]
fn too_few_day_headers_fail_column_location() {
    // Only two weekday headers survived the scan; the dynamic locator must
    // refuse to guess the remaining columns.
    let analyzer = CannedWordsAnalyzer {
        words: vec![header_box("MONTAG", 717), header_box("FREITAG", 2961)],
    };
    let result = t_marx::menu_from_pages(&[blank_page()], &analyzer, t_marx::DEFAULT_LOCATOR);
    assert!(matches!(result, Err(MenuError::InsufficientHeaders { found: 2 })));
}

#[test]
fn a_full_header_row_yields_a_complete_week() {
    let analyzer = CannedWordsAnalyzer {
        words: vec![
            header_box("MONTAG", 717),
            header_box("DIENSTAG", 1269),
            header_box("MITTWOCH", 1818),
            header_box("DONNERSTAG", 2352),
            header_box("FREITAG", 2961),
        ],
    };
    let set = t_marx::menu_from_pages(&[blank_page()], &analyzer, t_marx::DEFAULT_LOCATOR).unwrap();
    for day in Weekday::ALL {
        assert_eq!(set.get(day).day, day);
        assert!(!set.get(day).closed);
    }
}

#[test]
fn a_menu_for_any_weekday_is_always_answerable() {
    let provider = Provider::new(
        ProviderKind::TMarx,
        Arc::new(StubFetcher::failing()),
        Arc::new(NoopAnalyzer),
    );
    for day in Weekday::ALL {
        let menu = provider.get_menu(day);
        assert_eq!(menu.day, day);
        assert_eq!(menu.provider, "T-Marx by Eurest");
    }
}
