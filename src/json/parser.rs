//! Recursive-descent JSON parser producing [`JsonValue`] trees.

use crate::json::JsonValue;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while parsing a JSON document.
/// Offsets are byte positions into the source text.
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("Expected '{expected}' at offset {offset}")]
    ExpectedCharacter { expected: char, offset: usize },

    #[error("Object key must be a string at offset {offset}")]
    NonStringKey { offset: usize },

    #[error("Malformed number at offset {offset}")]
    MalformedNumber { offset: usize },

    #[error("Unsupported escape sequence at offset {offset}")]
    UnsupportedEscape { offset: usize },

    #[error("Malformed unicode escape at offset {offset}")]
    MalformedUnicodeEscape { offset: usize },

    #[error("Trailing characters after top-level value at offset {offset}")]
    TrailingCharacters { offset: usize },
}

/// Single-pass parser over a text buffer.
///
/// Whitespace is skipped between tokens. Numbers follow the JSON grammar and
/// are stored as f64. `\uXXXX` escapes are decoded, including surrogate
/// pairs; a lone surrogate is an error.
pub struct JsonParser<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> JsonParser<'a> {
    pub fn new(text: &'a str) -> JsonParser<'a> {
        JsonParser { text, position: 0 }
    }

    /// Parses the buffer as a single top-level value.
    pub fn parse(mut self) -> Result<JsonValue, JsonError> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.position < self.text.len() {
            return Err(JsonError::TrailingCharacters { offset: self.position });
        }
        Ok(value)
    }

    fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => self.position += 1,
                _ => break,
            }
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), JsonError> {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else if self.position >= self.text.len() {
            Err(JsonError::UnexpectedEnd)
        } else {
            Err(JsonError::ExpectedCharacter {
                expected: expected as char,
                offset: self.position,
            })
        }
    }

    /// Consumes `expected` if it is the next non-whitespace byte.
    fn consume(&mut self, expected: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn parse_value(&mut self) -> Result<JsonValue, JsonError> {
        self.skip_whitespace();
        match self.peek().ok_or(JsonError::UnexpectedEnd)? {
            b'{' => self.parse_object(),
            b'[' => self.parse_array(),
            b'"' => Ok(JsonValue::String(self.parse_string()?)),
            b't' => self.parse_literal("true", JsonValue::Bool(true)),
            b'f' => self.parse_literal("false", JsonValue::Bool(false)),
            b'n' => self.parse_literal("null", JsonValue::Null),
            b'-' | b'0'..=b'9' => self.parse_number(),
            byte => Err(JsonError::UnexpectedCharacter {
                character: byte as char,
                offset: self.position,
            }),
        }
    }

    fn parse_object(&mut self) -> Result<JsonValue, JsonError> {
        self.expect(b'{')?;
        let mut members = HashMap::new();
        if self.consume(b'}') {
            return Ok(JsonValue::Object(members));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(JsonError::NonStringKey { offset: self.position });
            }
            let key = self.parse_string()?;
            self.expect(b':')?;
            let value = self.parse_value()?;
            members.insert(key, value);
            if self.consume(b'}') {
                break;
            }
            self.expect(b',')?;
        }
        Ok(JsonValue::Object(members))
    }

    fn parse_array(&mut self) -> Result<JsonValue, JsonError> {
        self.expect(b'[')?;
        let mut elements = Vec::new();
        if self.consume(b']') {
            return Ok(JsonValue::Array(elements));
        }
        loop {
            elements.push(self.parse_value()?);
            if self.consume(b']') {
                break;
            }
            self.expect(b',')?;
        }
        Ok(JsonValue::Array(elements))
    }

    fn parse_literal(&mut self, literal: &str, value: JsonValue) -> Result<JsonValue, JsonError> {
        if self.text[self.position..].starts_with(literal) {
            self.position += literal.len();
            Ok(value)
        } else {
            Err(JsonError::UnexpectedCharacter {
                character: self.bytes()[self.position] as char,
                offset: self.position,
            })
        }
    }

    fn parse_string(&mut self) -> Result<String, JsonError> {
        self.expect(b'"')?;
        let mut content = String::new();
        loop {
            let run_start = self.position;
            // Literal run up to the next quote or backslash; both are ASCII,
            // so slicing at them keeps UTF-8 boundaries intact
            while let Some(byte) = self.peek() {
                if byte == b'"' || byte == b'\\' {
                    break;
                }
                self.position += 1;
            }
            content.push_str(&self.text[run_start..self.position]);
            match self.peek().ok_or(JsonError::UnexpectedEnd)? {
                b'"' => {
                    self.position += 1;
                    return Ok(content);
                }
                _ => {
                    self.position += 1; // backslash
                    self.parse_escape(&mut content)?;
                }
            }
        }
    }

    fn parse_escape(&mut self, content: &mut String) -> Result<(), JsonError> {
        let escape = self.peek().ok_or(JsonError::UnexpectedEnd)?;
        self.position += 1;
        match escape {
            b'"' => content.push('"'),
            b'\\' => content.push('\\'),
            b'/' => content.push('/'),
            b'b' => content.push('\u{0008}'),
            b'f' => content.push('\u{000C}'),
            b'n' => content.push('\n'),
            b'r' => content.push('\r'),
            b't' => content.push('\t'),
            b'u' => content.push(self.parse_unicode_escape()?),
            _ => {
                return Err(JsonError::UnsupportedEscape {
                    offset: self.position - 2,
                })
            }
        }
        Ok(())
    }

    /// Decodes the `XXXX` of a `\uXXXX` escape, combining UTF-16 surrogate
    /// pairs into a single character.
    fn parse_unicode_escape(&mut self) -> Result<char, JsonError> {
        let offset = self.position - 2;
        let unit = self.parse_hex_unit(offset)?;
        let code = match unit {
            0xD800..=0xDBFF => {
                if !(self.peek() == Some(b'\\') && self.bytes().get(self.position + 1) == Some(&b'u')) {
                    return Err(JsonError::MalformedUnicodeEscape { offset });
                }
                self.position += 2;
                let low = self.parse_hex_unit(offset)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(JsonError::MalformedUnicodeEscape { offset });
                }
                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(JsonError::MalformedUnicodeEscape { offset }),
            _ => unit,
        };
        char::from_u32(code).ok_or(JsonError::MalformedUnicodeEscape { offset })
    }

    fn parse_hex_unit(&mut self, offset: usize) -> Result<u32, JsonError> {
        let digits = self
            .text
            .get(self.position..self.position + 4)
            .ok_or(JsonError::UnexpectedEnd)?;
        if !digits.bytes().all(|digit| digit.is_ascii_hexdigit()) {
            return Err(JsonError::MalformedUnicodeEscape { offset });
        }
        let unit = u32::from_str_radix(digits, 16)
            .map_err(|_| JsonError::MalformedUnicodeEscape { offset })?;
        self.position += 4;
        Ok(unit)
    }

    fn parse_number(&mut self) -> Result<JsonValue, JsonError> {
        let start = self.position;
        if self.peek() == Some(b'-') {
            self.position += 1;
        }
        if self.peek() == Some(b'0') {
            self.position += 1;
        } else {
            self.parse_digits(start)?;
        }
        if self.peek() == Some(b'.') {
            self.position += 1;
            self.parse_digits(start)?;
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.position += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.position += 1;
            }
            self.parse_digits(start)?;
        }
        let value = self.text[start..self.position]
            .parse::<f64>()
            .map_err(|_| JsonError::MalformedNumber { offset: start })?;
        Ok(JsonValue::Number(value))
    }

    /// Consumes one or more ASCII digits.
    fn parse_digits(&mut self, offset: usize) -> Result<(), JsonError> {
        let start = self.position;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        if self.position == start {
            Err(JsonError::MalformedNumber { offset })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<JsonValue, JsonError> {
        JsonParser::new(text).parse()
    }

    #[test]
    fn parse_scalars() {
        assert_eq!(parse("null").unwrap(), JsonValue::Null);
        assert_eq!(parse("true").unwrap(), JsonValue::Bool(true));
        assert_eq!(parse("false").unwrap(), JsonValue::Bool(false));
        assert_eq!(parse("\"hi\"").unwrap(), JsonValue::String("hi".to_owned()));
    }

    #[test]
    fn parse_numbers_as_f64() {
        assert_eq!(parse("0").unwrap(), JsonValue::Number(0.0));
        assert_eq!(parse("-12").unwrap(), JsonValue::Number(-12.0));
        assert_eq!(parse("3.25").unwrap(), JsonValue::Number(3.25));
        assert_eq!(parse("1e3").unwrap(), JsonValue::Number(1000.0));
        assert_eq!(parse("2.5E-1").unwrap(), JsonValue::Number(0.25));
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        assert!(parse("-").is_err());
        assert!(parse("1.").is_err());
        assert!(parse("1e").is_err());
        assert!(parse("1e+").is_err());
    }

    #[test]
    fn parse_nested_structures() {
        let value = parse(r#" { "a" : [ 1 , { "b" : null } ] , "c" : "d" } "#).unwrap();
        let elements = value.get("a").and_then(JsonValue::as_array).unwrap();
        assert_eq!(elements[0], JsonValue::Number(1.0));
        assert_eq!(elements[1].get("b"), Some(&JsonValue::Null));
        assert_eq!(value.get_str("c"), Some("d"));
    }

    #[test]
    fn parse_short_escapes() {
        let value = parse(r#""a\"b\\c\/d\n\t\r\b\f""#).unwrap();
        assert_eq!(
            value.as_str().unwrap(),
            "a\"b\\c/d\n\t\r\u{0008}\u{000C}"
        );
    }

    #[test]
    fn parse_unicode_escapes() {
        assert_eq!(parse(r#""\u0041""#).unwrap().as_str(), Some("A"));
        assert_eq!(parse(r#""\u00e9""#).unwrap().as_str(), Some("é"));
    }

    #[test]
    fn parse_unicode_surrogate_pair() {
        assert_eq!(parse(r#""\ud83d\ude00""#).unwrap().as_str(), Some("😀"));
    }

    #[test]
    fn parse_rejects_lone_surrogate() {
        assert!(parse(r#""\ud83d""#).is_err());
        assert!(parse(r#""\ude00""#).is_err());
        assert!(parse(r#""\ud83dx""#).is_err());
    }

    #[test]
    fn parse_rejects_unknown_escape() {
        assert!(matches!(
            parse(r#""\q""#),
            Err(JsonError::UnsupportedEscape { .. })
        ));
    }

    #[test]
    fn parse_rejects_structural_violations() {
        assert!(parse("").is_err());
        assert!(parse("{").is_err());
        assert!(parse("[1,").is_err());
        assert!(parse(r#"{"a" 1}"#).is_err());
        assert!(parse(r#"{1: 2}"#).is_err());
        assert!(parse("[1 2]").is_err());
        assert!(parse("truthy").is_err());
    }

    #[test]
    fn parse_rejects_trailing_content() {
        assert!(matches!(
            parse("{} x"),
            Err(JsonError::TrailingCharacters { .. })
        ));
    }

    #[test]
    fn parse_object_keeps_last_duplicate_key() {
        let value = parse(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(value.get("a"), Some(&JsonValue::Number(2.0)));
    }
}
