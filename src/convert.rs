//! The per-file conversion pipeline and the batch driver.
//! Raw bytes are normalized to UTF-8, tokenized into a table, sliced into
//! records, and serialized as one JSON array per sheet.

use crate::config::{Config, SheetConfig};
use crate::error::{ResultMessage, SheetcastError};
use crate::helpers::encoding::{self, CodePageDecoder, EncodingHint, LegacyDecoder};
use crate::json::writer::records_to_json;
use crate::sheet::reference::CellRef;
use crate::sheet::slicer::{slice_table, Record};
use crate::sheet::table::Table;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Outcome counts for one batch run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Reads a file and normalizes its bytes to UTF-8 text.
pub fn read_file_text(
    path: &Path,
    hint: EncodingHint,
    legacy: Option<&dyn LegacyDecoder>,
) -> Result<String, SheetcastError> {
    let bytes = fs::read(path)?;
    Ok(encoding::decode(&bytes, hint, legacy))
}

/// Extracts the configured records from a parsed table.
/// A malformed start address falls back to A1 with a diagnostic rather than
/// aborting the sheet.
pub fn convert_sheet(
    table: &Table,
    sheet: &SheetConfig,
    stop_on_empty_first_column: bool,
) -> Vec<Record> {
    let start = match CellRef::try_from(sheet.start_cell.as_str()) {
        Ok(start) => start,
        Err(error) => {
            warn!("{}; falling back to A1", error);
            CellRef { row: 0, col: 0 }
        }
    };
    slice_table(table, start, &sheet.columns, stop_on_empty_first_column)
}

/// Converts every configured `*.csv` sheet in `input_dir` into a
/// `<sheet>.json` file in `output_dir`.
///
/// The sheet identifier is the file's base name. Unconfigured sheets are
/// skipped with a diagnostic; read, parse, and write failures are reported
/// per file and never stop the batch. Only failure to create the output
/// directory is fatal.
pub fn convert_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: &Config,
) -> Result<Summary, SheetcastError> {
    fs::create_dir_all(output_dir)
        .map_err(SheetcastError::from)
        .with_prefix("Cannot create output directory")?;

    let legacy = match config.legacy_code_page {
        Some(code_page) => {
            let decoder = CodePageDecoder::new(code_page);
            if decoder.is_none() {
                warn!("Unknown code page {}, using lossy UTF-8 fallback", code_page);
            }
            decoder
        }
        None => None,
    };
    let legacy = legacy.as_ref().map(|decoder| decoder as &dyn LegacyDecoder);

    let pattern = input_dir.join("*.csv");
    let mut summary = Summary::default();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = match entry {
            Ok(path) => path,
            Err(error) => {
                warn!("Skipping unreadable entry: {}", error);
                summary.failed += 1;
                continue;
            }
        };
        let Some(sheet_id) = path.file_stem().and_then(OsStr::to_str) else {
            continue;
        };
        let Some(sheet) = config.sheet(sheet_id) else {
            warn!("Skipping '{}': no configuration for sheet", sheet_id);
            summary.skipped += 1;
            continue;
        };
        let output = output_dir.join(format!("{}.json", sheet_id));
        match convert_file(&path, &output, sheet, config, legacy) {
            Ok(count) => {
                info!("Converted '{}' -> '{}' ({} records)", path.display(), output.display(), count);
                summary.converted += 1;
            }
            Err(error) => {
                warn!("Failed to convert '{}': {}", path.display(), error);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn convert_file(
    path: &Path,
    output: &Path,
    sheet: &SheetConfig,
    config: &Config,
    legacy: Option<&dyn LegacyDecoder>,
) -> Result<usize, SheetcastError> {
    let text = read_file_text(path, config.input_encoding, legacy)?;
    let table = Table::parse(&text);
    let records = convert_sheet(&table, sheet, config.stop_on_empty_first_column);
    let json = records_to_json(&records);

    let mut content = Vec::with_capacity(json.len() + 4);
    if config.output_utf8_bom {
        content.extend_from_slice(&encoding::UTF8_BOM);
    }
    content.extend_from_slice(json.as_bytes());
    content.push(b'\n');
    fs::write(output, content)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_item_sheet() -> Config {
        let mut config = Config::default();
        config.sheets.insert(
            "Item".to_owned(),
            SheetConfig {
                start_cell: "A2".to_owned(),
                columns: ["Idx", "Name", "Effect", "Value"]
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            },
        );
        config
    }

    #[test]
    fn convert_dir_writes_configured_sheets_and_skips_others() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(
            input.path().join("Item.csv"),
            "Idx,Name,Effect,Value\n1,\"Po,tion\",heal,10\n,,,\n",
        )
        .unwrap();
        fs::write(input.path().join("Other.csv"), "a,b\n").unwrap();
        fs::write(input.path().join("notes.txt"), "ignored\n").unwrap();

        let summary = convert_dir(input.path(), output.path(), &config_with_item_sheet()).unwrap();
        assert_eq!(summary, Summary { converted: 1, skipped: 1, failed: 0 });

        let written = fs::read(output.path().join("Item.json")).unwrap();
        assert!(written.starts_with(&[0xEF, 0xBB, 0xBF]));
        assert_eq!(
            std::str::from_utf8(&written[3..]).unwrap(),
            "[{\"Effect\":\"heal\",\"Idx\":\"1\",\"Name\":\"Po,tion\",\"Value\":\"10\"}]\n"
        );
        assert!(!output.path().join("Other.json").exists());
    }

    #[test]
    fn convert_dir_can_omit_the_output_bom() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("Item.csv"), "1,Potion,heal,10\n").unwrap();

        let mut config = config_with_item_sheet();
        config.output_utf8_bom = false;
        config.sheets.get_mut("Item").unwrap().start_cell = "A1".to_owned();
        convert_dir(input.path(), output.path(), &config).unwrap();

        let written = fs::read(output.path().join("Item.json")).unwrap();
        assert!(written.starts_with(b"[{"));
    }

    #[test]
    fn convert_dir_on_empty_directory_is_a_no_op() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let summary = convert_dir(input.path(), output.path(), &Config::default()).unwrap();
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn convert_sheet_falls_back_to_a1_on_bad_start_address() {
        let table = Table::parse("1,Potion\n");
        let sheet = SheetConfig {
            start_cell: "not-a-cell".to_owned(),
            columns: vec!["Idx".to_owned(), "Name".to_owned()],
        };
        let records = convert_sheet(&table, &sheet, true);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Name"], "Potion");
    }

    #[test]
    fn read_file_text_normalizes_utf16_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Item.csv");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "1,물약\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&path, bytes).unwrap();
        let text = read_file_text(&path, EncodingHint::Auto, None).unwrap();
        assert_eq!(text, "1,물약\n");
    }
}
