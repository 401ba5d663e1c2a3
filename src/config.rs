//! Conversion configuration.
//! Defaults are caller-supplied; an optional JSON document overlays them.
//! Extraction is tolerant: unknown keys are ignored and absent keys leave the
//! defaults untouched.

use crate::helpers::encoding::EncodingHint;
use crate::json::JsonValue;
use std::collections::HashMap;
use tracing::warn;

/// Extraction settings for one sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetConfig {
    /// A1-notation start address
    pub start_cell: String,
    /// Field names in left-to-right column order
    pub columns: Vec<String>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            start_cell: "A1".to_owned(),
            columns: Vec::new(),
        }
    }
}

/// Settings for a whole conversion run. Built once, read-only afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    /// Sheet identifier (source file base name) to extraction settings
    pub sheets: HashMap<String, SheetConfig>,
    /// Treat an empty lead column as the end-of-table sentinel
    pub stop_on_empty_first_column: bool,
    /// Input byte interpretation override
    pub input_encoding: EncodingHint,
    /// Code page for the legacy decoder, when one is configured
    pub legacy_code_page: Option<u16>,
    /// Prefix output files with a UTF-8 byte-order mark
    pub output_utf8_bom: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sheets: HashMap::new(),
            stop_on_empty_first_column: true,
            input_encoding: EncodingHint::Auto,
            legacy_code_page: None,
            output_utf8_bom: true,
        }
    }
}

impl Config {
    /// Resolves a sheet identifier to its configuration.
    /// Absence means the sheet is unconfigured and should be skipped, never
    /// that the run should fail.
    pub fn sheet(&self, id: &str) -> Option<&SheetConfig> {
        self.sheets.get(id)
    }

    /// Overlays a parsed configuration document onto the current settings.
    ///
    /// Recognized keys: `stopOnEmptyFirstColumn`, `inputEncoding`,
    /// `outputUtf8Bom`, and `sheets` (identifier to `startCell`/`columns`).
    /// Anything else in the document is ignored.
    pub fn apply_json(&mut self, root: &JsonValue) {
        if let Some(flag) = root.get_bool("stopOnEmptyFirstColumn") {
            self.stop_on_empty_first_column = flag;
        }
        if let Some(flag) = root.get_bool("outputUtf8Bom") {
            self.output_utf8_bom = flag;
        }
        if let Some(name) = root.get_str("inputEncoding") {
            match EncodingHint::parse(name) {
                Some((hint, code_page)) => {
                    self.input_encoding = hint;
                    self.legacy_code_page = code_page;
                }
                None => warn!("Unknown inputEncoding '{}', keeping automatic detection", name),
            }
        }
        if let Some(sheets) = root.get("sheets").and_then(JsonValue::as_object) {
            for (id, entry) in sheets {
                let mut sheet = SheetConfig::default();
                if let Some(start_cell) = entry.get_str("startCell") {
                    sheet.start_cell = start_cell.to_owned();
                }
                if let Some(columns) = entry.get("columns").and_then(JsonValue::as_array) {
                    sheet.columns = columns
                        .iter()
                        .filter_map(JsonValue::as_str)
                        .map(str::to_owned)
                        .collect();
                }
                self.sheets.insert(id.to_owned(), sheet);
            }
        }
    }
}
