pub mod csv;
pub mod encoding;
