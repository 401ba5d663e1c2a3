//! Table-to-record extraction.
//! Walks rows from a start cell and maps configured field names onto their
//! positional columns.

use crate::sheet::reference::CellRef;
use crate::sheet::table::Table;
use std::collections::BTreeMap;

/// One extracted row: field name to trimmed string value.
/// Sorted key storage gives the serializer its deterministic output order.
pub type Record = BTreeMap<String, String>;

/// Extracts records from `table` starting at `start`.
///
/// Each field name in `columns` reads the cell at its positional offset from
/// the start column; absent or blank cells yield empty strings. With
/// `stop_on_empty_first_column` set, an empty trimmed lead value or an
/// all-empty row ends the table there (the sentinel row is excluded); with it
/// clear, all-empty rows are skipped and extraction continues.
pub fn slice_table(
    table: &Table,
    start: CellRef,
    columns: &[String],
    stop_on_empty_first_column: bool,
) -> Vec<Record> {
    let mut records = Vec::new();
    for row in start.row..table.rows().len() {
        if stop_on_empty_first_column {
            let lead = table.cell(row, start.col).unwrap_or("");
            if lead.is_empty() {
                break;
            }
        }
        let mut record = Record::new();
        let mut all_empty = true;
        for (offset, column) in columns.iter().enumerate() {
            let value = table.cell(row, start.col + offset).unwrap_or("");
            if !value.is_empty() {
                all_empty = false;
            }
            record.insert(column.to_owned(), value.to_owned());
        }
        if all_empty {
            if stop_on_empty_first_column {
                break;
            }
            continue;
        }
        records.push(record);
    }
    records
}
