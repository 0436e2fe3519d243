//! Lunch menu extraction for a handful of Vienna restaurants.
//!
//! Every source publishes its weekly menu as a PDF, each with its own idea
//! of layout: some with a real text layer, some as scanned column tables
//! that need OCR. The pipeline here turns those PDFs into normalized
//! per-weekday dish lists; `main.rs` serves them over HTTP.

pub mod acquire;
pub mod assemble;
pub mod clean;
pub mod error;
pub mod image_search;
pub mod layout;
pub mod model;
pub mod ocr;
pub mod pattern;
pub mod pdf;
pub mod provider;
pub mod translate;

pub use error::MenuError;
pub use model::{DishRecord, Weekday, WeekdayMenu, WeeklyMenuSet};
pub use provider::{Provider, ProviderKind};
