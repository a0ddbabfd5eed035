//! tally-ingest: CSV statement import into typed rows.

pub mod csv_rows;
pub mod types;

pub use csv_rows::{parse_csv_path, parse_csv_reader, parse_date};
pub use types::ImportRow;
