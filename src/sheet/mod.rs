//! Tabular data model: tables of string cells, A1-notation references, and
//! configuration-driven record extraction.

pub mod reference;
pub mod slicer;
pub mod table;
