//! Parse headerless `date,description,amount` CSV files.
//!
//!   2024-11-13,Biedronka,150.50
//!   2024-11-12,Orlen,200.00
//!
//! The whole file is validated before anything is returned: one bad row fails
//! the import and no rows are handed on.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

use crate::types::ImportRow;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an ISO-like date, taking the date part of a timestamp if given one.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

pub fn parse_csv_path(path: impl AsRef<Path>) -> Result<Vec<ImportRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_csv_reader(file).with_context(|| format!("importing {}", path.display()))
}

pub fn parse_csv_reader(reader: impl Read) -> Result<Vec<ImportRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("reading CSV")?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != 3 {
            bail!("line {line}: expected 3 columns (date,description,amount), found {}", record.len());
        }

        let date_str = &record[0];
        let Some(date) = parse_date(date_str) else {
            bail!("line {line}: unrecognized date {date_str:?}");
        };

        let description = record[1].to_string();
        if description.is_empty() {
            bail!("line {line}: empty description");
        }

        let amount_str = &record[2];
        let amount: f64 = amount_str
            .parse()
            .with_context(|| format!("line {line}: amount {amount_str:?} is not a number"))?;
        if !amount.is_finite() || amount < 0.0 {
            bail!("line {line}: amount must be a non-negative number, got {amount_str}");
        }

        rows.push(ImportRow {
            line,
            date,
            description,
            amount,
        });
    }

    Ok(rows)
}
