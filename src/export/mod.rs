//! Export module for ledgerview
//!
//! Canonical CSV rendering of an entry set, with a file name derived from
//! the filters that produced it.

pub mod csv;

pub use self::csv::{export_filename, parse_csv, to_csv, CsvExport, CsvRow, CSV_HEADER};
