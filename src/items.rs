//! Typed consumer for item data documents.
//! Reads a top-level JSON array of item objects into owned records; malformed
//! or missing structure yields an empty set rather than an error.

use crate::error::SheetcastError;
use crate::helpers::encoding::{decode, EncodingHint};
use crate::json::JsonValue;
use std::path::Path;

/// Item categories. Unrecognized names fall back to `None`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ItemKind {
    #[default]
    None,
    Consume,
}

impl ItemKind {
    /// Case-insensitive parse with the unrecognized fallback.
    pub fn parse(name: &str) -> ItemKind {
        if name.eq_ignore_ascii_case("consume") {
            ItemKind::Consume
        } else {
            ItemKind::None
        }
    }
}

/// One item record from a data document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Item {
    pub idx: i64,
    pub kind: ItemKind,
    pub name: String,
    pub effect: String,
    pub value: i64,
}

/// Extracts items from a parsed document.
/// The expected shape is a top-level array of objects; anything else yields
/// an empty vector, and non-object elements are skipped.
pub fn items_from_json(root: &JsonValue) -> Vec<Item> {
    let Some(elements) = root.as_array() else {
        return Vec::new();
    };
    elements
        .iter()
        .filter_map(|element| {
            element.as_object()?;
            Some(Item {
                idx: integer_field(element, "Idx"),
                kind: element.get_str("Type").map(ItemKind::parse).unwrap_or_default(),
                name: element.get_str("Name").unwrap_or_default().to_owned(),
                effect: element.get_str("Effect").unwrap_or_default().to_owned(),
                value: integer_field(element, "Value"),
            })
        })
        .collect()
}

/// One-shot loader: reads a file, normalizes its encoding, parses it, and
/// returns the owned item set. Repeated calls re-read the file; there is no
/// process-wide state.
pub fn load_items(path: &Path, hint: EncodingHint) -> Result<Vec<Item>, SheetcastError> {
    let bytes = std::fs::read(path)?;
    let text = decode(&bytes, hint, None);
    let root = JsonValue::parse(&text)?;
    Ok(items_from_json(&root))
}

/// Reads a field that may be a number or a numeric string.
/// String values parse their leading integer digits only; anything else is 0.
fn integer_field(element: &JsonValue, key: &str) -> i64 {
    match element.get(key) {
        Some(JsonValue::Number(number)) => *number as i64,
        Some(JsonValue::String(text)) => leading_integer(text),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let mut end = 0;
    for (index, character) in text.char_indices() {
        if character.is_ascii_digit() || (index == 0 && character == '-') {
            end = index + character.len_utf8();
        } else {
            break;
        }
    }
    text[..end].parse().unwrap_or(0)
}
