//! File input and output.

pub mod csv;

pub use self::csv::{load_table, read_table, write_rows, LoadOptions};
