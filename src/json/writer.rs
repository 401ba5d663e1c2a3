//! JSON serialization.
//! Renders extracted records and [`JsonValue`] trees as minimal single-line
//! JSON text with deterministic, lexicographically sorted object keys.

use crate::json::JsonValue;
use crate::sheet::slicer::Record;

/// Serializes one record as a JSON object literal.
/// Record storage is already key-sorted, so output order is stable.
pub fn record_to_json(record: &Record) -> String {
    let mut out = String::from("{");
    for (index, (key, value)) in record.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_string(&mut out, key);
        out.push(':');
        push_string(&mut out, value);
    }
    out.push('}');
    out
}

/// Serializes a record sequence as a JSON array literal.
pub fn records_to_json(records: &[Record]) -> String {
    let mut out = String::from("[");
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&record_to_json(record));
    }
    out.push(']');
    out
}

/// Serializes an arbitrary JSON value.
/// Object keys are sorted before writing; the value model's map storage is
/// unordered, so this keeps output diffable.
pub fn value_to_json(value: &JsonValue) -> String {
    let mut out = String::new();
    push_value(&mut out, value);
    out
}

fn push_value(out: &mut String, value: &JsonValue) {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(true) => out.push_str("true"),
        JsonValue::Bool(false) => out.push_str("false"),
        JsonValue::Number(number) => push_number(out, *number),
        JsonValue::String(text) => push_string(out, text),
        JsonValue::Array(elements) => {
            out.push('[');
            for (index, element) in elements.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                push_value(out, element);
            }
            out.push(']');
        }
        JsonValue::Object(members) => {
            let mut keys = members.keys().collect::<Vec<_>>();
            keys.sort();
            out.push('{');
            for (index, key) in keys.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                push_string(out, key);
                out.push(':');
                push_value(out, &members[key.as_str()]);
            }
            out.push('}');
        }
    }
}

/// JSON has no representation for non-finite numbers; they degrade to null.
fn push_number(out: &mut String, number: f64) {
    if number.is_finite() {
        out.push_str(&number.to_string());
    } else {
        out.push_str("null");
    }
}

fn push_string(out: &mut String, text: &str) {
    out.push('"');
    for character in text.chars() {
        match character {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            control if (control as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", control as u32));
            }
            character => out.push(character),
        }
    }
    out.push('"');
}
