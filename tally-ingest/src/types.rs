use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One validated row of an imported file, not yet categorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based line in the source file
    pub line: u64,
    pub date: NaiveDate,
    pub description: String,
    /// Non-negative amount spent
    pub amount: f64,
}
