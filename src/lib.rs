//! # Sheetcast
//!
//! Converts tabular text data (CSV "sheets") into structured JSON records
//! driven by a per-sheet field mapping, and consumes hand-written JSON into
//! typed in-memory records.
//!
//! ## Features
//!
//! - **Encoding normalization**: BOM sniffing for UTF-8 and UTF-16 LE/BE,
//!   structural UTF-8 validation, and an injectable legacy code-page decoder
//! - **CSV tokenizing**: double-quote quoting with `""` escapes
//! - **A1 cell references**: base-26 column codes resolved to zero-based
//!   (row, column) positions
//! - **JSON**: a tagged value model with a recursive-descent parser and a
//!   deterministic, sorted-key serializer
//! - **Table slicing**: configuration-driven record extraction with an
//!   empty-lead-column end-of-table sentinel
//! - **Batch conversion**: one `<sheet>.json` output per configured input
//!   file; per-file failures are logged and skipped
pub mod config;
pub mod convert;
pub mod error;
pub mod helpers;
pub mod items;
pub mod json;
pub mod sheet;

pub use crate::config::{Config, SheetConfig};
pub use crate::convert::{convert_dir, convert_sheet, read_file_text, Summary};
pub use crate::error::SheetcastError;
pub use crate::helpers::encoding::{CodePageDecoder, EncodingHint, LegacyDecoder};
pub use crate::items::{items_from_json, load_items, Item, ItemKind};
pub use crate::json::JsonValue;
pub use crate::sheet::reference::CellRef;
pub use crate::sheet::slicer::Record;
pub use crate::sheet::table::Table;
