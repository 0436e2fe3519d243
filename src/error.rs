use std::fmt;

/// Failures the extraction pipeline can produce.
///
/// None of these escape the provider boundary: `Provider::fetch_weekly_menu`
/// converts every variant into a structurally-complete empty week. The only
/// thing a caller can do wrong is pass an invalid weekday, and that is
/// rejected at the HTTP layer before the core sees it.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("menu download failed: {0}")]
    Network(String),

    #[error("menu PDF could not be parsed: {0}")]
    CorruptDocument(String),

    #[error("OCR engine is not available (tesseract not installed or disabled)")]
    OcrUnavailable,

    #[error("pdftoppm not found. Install poppler-utils: apt install poppler-utils (Linux) or brew install poppler (macOS)")]
    RasterizerUnavailable,

    #[error("OCR run failed with exit code {code}: {stderr}")]
    OcrFailed { code: i32, stderr: String },

    #[error("only {found} of 5 weekday headers located, need at least 3")]
    InsufficientHeaders { found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimum weekday headers the dynamic locator must anchor before it is
/// willing to derive column geometry.
pub const MIN_HEADERS: usize = 3;

impl MenuError {
    pub fn network(err: impl fmt::Display) -> Self {
        MenuError::Network(err.to_string())
    }

    pub fn corrupt(err: impl fmt::Display) -> Self {
        MenuError::CorruptDocument(err.to_string())
    }
}
