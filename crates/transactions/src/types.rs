//! Transaction record types.

use chrono::{Datelike, NaiveDateTime};

/// Date format used by the `transaction_date` column.
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Status value of a completed transaction.
pub const STATUS_SUCCESS: &str = "Success";

/// Status value of a failed transaction.
pub const STATUS_FAILED: &str = "Failed";

/// A single retail transaction.
///
/// The typed fields cover the columns the advisor reasons about; `fields`
/// keeps every cell of the original row so context tables can show all
/// columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDateTime,
    pub mall_name: String,
    pub amount: f64,
    pub status: String,
    pub kind: String,
    pub fields: Vec<String>,
}

impl Transaction {
    /// Calendar month (1-12) of the transaction.
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}
