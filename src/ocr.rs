//! Optical character recognition.
//!
//! OCR is an optional capability: the `tesseract` binary (plus the `deu`
//! language pack) may simply not be installed, and that is a configuration
//! state rather than an error. Providers that need OCR receive a
//! `DocumentAnalyzer` at construction; tests and OCR-less deployments get a
//! `NoopAnalyzer` and degrade to empty menus.

use crate::error::MenuError;
use crate::pdf::PageImage;
use std::process::Command;

/// Tesseract page-segmentation mode, reduced to the two layouts menus use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// One uniform block of text (PSM 6) - whole-page menus.
    Block,
    /// A single column of variable-height text (PSM 4) - day columns.
    Column,
}

impl OcrMode {
    fn psm(self) -> &'static str {
        match self {
            OcrMode::Block => "6",
            OcrMode::Column => "4",
        }
    }
}

/// One recognized word and its pixel bounding box on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBox {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// OCR capability injected into providers.
pub trait DocumentAnalyzer: Send + Sync {
    /// Whether recognition can run at all in this process.
    fn available(&self) -> bool;

    /// Recognize the text of an image region. Output is lossy; downstream
    /// matching must stay fuzzy.
    fn recognize(&self, page: &PageImage, lang: &str, mode: OcrMode) -> Result<String, MenuError>;

    /// Recognize individual words with their positions, for header location.
    fn recognize_words(&self, page: &PageImage, lang: &str) -> Result<Vec<WordBox>, MenuError>;
}

/// Shells out to the tesseract CLI.
pub struct TesseractAnalyzer;

impl TesseractAnalyzer {
    pub fn new() -> Self {
        TesseractAnalyzer
    }

    pub fn is_installed() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(
        &self,
        page: &PageImage,
        lang: &str,
        psm: &str,
        tsv: bool,
    ) -> Result<String, MenuError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("region.png");
        page.image
            .save(&input)
            .map_err(|e| MenuError::corrupt(format!("failed to write OCR input: {e}")))?;

        let mut cmd = Command::new("tesseract");
        cmd.arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .arg("--psm")
            .arg(psm);
        if tsv {
            cmd.arg("tsv");
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MenuError::OcrUnavailable
            } else {
                MenuError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(MenuError::OcrFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for TesseractAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAnalyzer for TesseractAnalyzer {
    fn available(&self) -> bool {
        Self::is_installed()
    }

    fn recognize(&self, page: &PageImage, lang: &str, mode: OcrMode) -> Result<String, MenuError> {
        self.run(page, lang, mode.psm(), false)
    }

    fn recognize_words(&self, page: &PageImage, lang: &str) -> Result<Vec<WordBox>, MenuError> {
        // PSM 11 (sparse text) finds header words regardless of surrounding
        // table structure.
        let tsv = self.run(page, lang, "11", true)?;
        Ok(parse_tsv_words(&tsv))
    }
}

/// Parse tesseract TSV output into word boxes. Word rows are level 5; the
/// columns are level, page, block, par, line, word, left, top, width,
/// height, conf, text.
pub fn parse_tsv_words(tsv: &str) -> Vec<WordBox> {
    let mut words = Vec::new();
    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
            cols[6].parse::<u32>(),
            cols[7].parse::<u32>(),
            cols[8].parse::<u32>(),
            cols[9].parse::<u32>(),
        ) else {
            continue;
        };
        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }
        words.push(WordBox {
            text: text.to_string(),
            x,
            y,
            w,
            h,
        });
    }
    words
}

/// Stand-in for deployments without tesseract. Always unavailable; any
/// recognition attempt reports `OcrUnavailable`.
pub struct NoopAnalyzer;

impl DocumentAnalyzer for NoopAnalyzer {
    fn available(&self) -> bool {
        false
    }

    fn recognize(&self, _: &PageImage, _: &str, _: OcrMode) -> Result<String, MenuError> {
        Err(MenuError::OcrUnavailable)
    }

    fn recognize_words(&self, _: &PageImage, _: &str) -> Result<Vec<WordBox>, MenuError> {
        Err(MenuError::OcrUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_word_rows_from_tsv() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t3508\t2480\t-1\t\n\
                   5\t1\t1\t1\t1\t1\t617\t410\t200\t42\t96.5\tMONTAG\n\
                   5\t1\t1\t1\t1\t2\t1169\t411\t210\t40\t91.0\tDIENSTAG\n\
                   5\t1\t1\t1\t2\t1\t640\t700\t180\t35\t88.2\tFrittatensuppe\n";
        let words = parse_tsv_words(tsv);
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "MONTAG");
        assert_eq!(words[0].x, 617);
        assert_eq!(words[0].h, 42);
    }

    #[test]
    fn skips_non_word_rows_and_blank_text() {
        let tsv = "header\n4\t1\t1\t1\t1\t0\t10\t10\t100\t20\t-1\t\n5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t80\t   \n";
        assert!(parse_tsv_words(tsv).is_empty());
    }

    #[test]
    fn noop_analyzer_reports_unavailable() {
        let analyzer = NoopAnalyzer;
        assert!(!analyzer.available());
        let page = PageImage {
            image: image::DynamicImage::new_rgb8(10, 10),
            dpi: 300,
        };
        assert!(matches!(
            analyzer.recognize(&page, "deu", OcrMode::Block),
            Err(MenuError::OcrUnavailable)
        ));
    }
}
