//! PDF content access.
//!
//! Two routes out of a menu PDF: the embedded text layer (Nice Guys publishes
//! real text) and page rasterization for the image-only sources that need
//! OCR. Rasterization shells out to `pdftoppm` from poppler-utils, which is
//! also what the usual Python pdf2image stack calls underneath.

use crate::error::MenuError;
use image::DynamicImage;
use std::io::Write;
use std::process::Command;

/// Extract the embedded text layer of all pages, in page order. Pages are
/// separated by the newlines `pdf_extract` already emits between them.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, MenuError> {
    pdf_extract::extract_text_from_mem(pdf_bytes).map_err(MenuError::corrupt)
}

/// One rasterized page plus the DPI it was rendered at. Column coordinates
/// are only meaningful relative to that DPI.
pub struct PageImage {
    pub image: DynamicImage,
    pub dpi: u32,
}

impl PageImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Crop a pixel rectangle, clamped to the page bounds.
    pub fn crop(&self, left: u32, top: u32, right: u32, bottom: u32) -> PageImage {
        let left = left.min(self.image.width());
        let top = top.min(self.image.height());
        let right = right.clamp(left, self.image.width());
        let bottom = bottom.clamp(top, self.image.height());
        PageImage {
            image: self.image.crop_imm(left, top, right - left, bottom - top),
            dpi: self.dpi,
        }
    }
}

/// Check whether `pdftoppm` is installed.
pub fn rasterizer_available() -> bool {
    Command::new("pdftoppm")
        .arg("-v")
        .output()
        .map(|o| o.status.success() || !o.stderr.is_empty())
        .unwrap_or(false)
}

/// Render every page of the PDF to an image at the given DPI.
pub fn rasterize(pdf_bytes: &[u8], dpi: u32) -> Result<Vec<PageImage>, MenuError> {
    let mut pdf_file = tempfile::NamedTempFile::new()?;
    pdf_file.write_all(pdf_bytes)?;

    let out_dir = tempfile::tempdir()?;
    let prefix = out_dir.path().join("page");

    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg(pdf_file.path())
        .arg(&prefix)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MenuError::RasterizerUnavailable
            } else {
                MenuError::corrupt(format!("pdftoppm failed: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MenuError::corrupt(format!("pdftoppm: {stderr}")));
    }

    // pdftoppm names pages page-1.png, page-2.png, ... sort paths to keep
    // page order (zero-padding is consistent within one run).
    let mut paths: Vec<_> = std::fs::read_dir(out_dir.path())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(MenuError::corrupt("pdftoppm produced no pages"));
    }

    let mut pages = Vec::with_capacity(paths.len());
    for path in paths {
        let image = image::open(&path).map_err(MenuError::corrupt)?;
        pages.push(PageImage { image, dpi });
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_rejects_non_pdf_bytes() {
        match extract_text(b"this is not a pdf") {
            Err(MenuError::CorruptDocument(_)) => {}
            other => panic!("expected CorruptDocument, got {other:?}"),
        }
    }

    #[test]
    fn crop_clamps_to_page_bounds() {
        let page = PageImage {
            image: DynamicImage::new_rgb8(100, 80),
            dpi: 300,
        };
        let cropped = page.crop(90, 70, 500, 500);
        assert_eq!(cropped.width(), 10);
        assert_eq!(cropped.height(), 10);

        let inverted = page.crop(60, 60, 40, 40);
        assert_eq!(inverted.width(), 0);
    }
}
