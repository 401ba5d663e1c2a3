//! Spreadsheet A1-notation cell references.

use crate::error::SheetcastError;
use regex::Regex;
use thiserror::Error;

/// Errors related to A1-notation reference parsing.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Invalid cell reference '{0}'")]
    FormatError(String),
}

/// A zero-based (row, column) cell position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl TryFrom<&str> for CellRef {
    type Error = SheetcastError;

    /// Parses an A1-notation reference (e.g. "G8" is row 7, column 6).
    /// Letters are a base-26 column code with digits 1-26 and no zero;
    /// the trailing number is the 1-based row. Letters are case-insensitive.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("Hardcode regex pattern");
        let captures = pattern
            .captures(value)
            .ok_or_else(|| ReferenceError::FormatError(value.to_owned()))?;
        let col = captures[1]
            .chars()
            .map(|letter| letter.to_ascii_uppercase() as usize - 'A' as usize + 1)
            .fold(0usize, |code, digit| code * 26 + digit);
        let row = captures[2]
            .parse::<usize>()
            .ok()
            .filter(|row| *row > 0)
            .ok_or_else(|| ReferenceError::FormatError(value.to_owned()))?;
        Ok(CellRef { row: row - 1, col: col - 1 })
    }
}

/// Converts a zero-based (row, column) position back to A1 notation.
pub fn index_to_reference(row: usize, col: usize) -> String {
    let mut col = col as u32 + 1;
    let mut reference = String::new();
    while col > 0 {
        col -= 1;
        let letter = char::from_u32(65 + col % 26).expect("Hardcode letters");
        col /= 26;
        reference.insert(0, letter);
    }
    reference.push_str(&(row + 1).to_string());
    reference
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_g8_is_zero_based() {
        let reference = CellRef::try_from("G8").unwrap();
        assert_eq!(reference, CellRef { row: 7, col: 6 });
    }

    #[test]
    fn reference_letters_are_base_26_without_zero() {
        assert_eq!(CellRef::try_from("A1").unwrap().col, 0);
        assert_eq!(CellRef::try_from("Z1").unwrap().col, 25);
        assert_eq!(CellRef::try_from("AA1").unwrap().col, 26);
        assert_eq!(CellRef::try_from("AZ1").unwrap().col, 51);
    }

    #[test]
    fn reference_letters_are_case_insensitive() {
        assert_eq!(CellRef::try_from("g8").unwrap(), CellRef::try_from("G8").unwrap());
    }

    #[test]
    fn reference_rejects_malformed_input() {
        for value in ["", "G", "8", "8G", "G8x", "G 8", "A0"] {
            assert!(CellRef::try_from(value).is_err(), "accepted '{}'", value);
        }
    }

    #[test]
    fn reference_round_trips_through_a1_notation() {
        for value in ["A1", "Z9", "AA27", "G8", "BC305"] {
            let reference = CellRef::try_from(value).unwrap();
            assert_eq!(index_to_reference(reference.row, reference.col), value);
        }
    }
}
