//! Keyword filtering and sampling of transactions.

use crate::types::{Transaction, STATUS_FAILED, STATUS_SUCCESS};
use rand::Rng;

/// Maximum number of rows handed to the model as context.
pub const SAMPLE_LIMIT: usize = 20;

/// Mall names recognised in queries.
pub const MALLS: [&str; 3] = ["Y Mall", "Z Mall", "C Mall"];

/// English month names recognised in queries, with their month numbers.
pub const MONTHS: [(&str, u32); 12] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Apply the keyword filters to `transactions`.
///
/// Every keyword found narrows the previous result, so a query naming two
/// malls or two months matches nothing.
pub fn filter_transactions<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    let query = query.to_lowercase();
    let mut rows: Vec<&Transaction> = transactions.iter().collect();

    if query.contains("failed") {
        rows.retain(|t| t.status == STATUS_FAILED);
    }
    if query.contains("success") {
        rows.retain(|t| t.status == STATUS_SUCCESS);
    }

    for mall in MALLS {
        if query.contains(&mall.to_lowercase()) {
            rows.retain(|t| t.mall_name == mall);
        }
    }

    for (name, month) in MONTHS {
        if query.contains(name) {
            rows.retain(|t| t.month() == month);
        }
    }

    rows
}

/// Randomly keep at most `limit` rows, preserving their original order.
pub fn sample<'a, R: Rng + ?Sized>(
    rows: Vec<&'a Transaction>,
    limit: usize,
    rng: &mut R,
) -> Vec<&'a Transaction> {
    if rows.len() <= limit {
        return rows;
    }

    let mut picked = rand::seq::index::sample(rng, rows.len(), limit).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|idx| rows[idx]).collect()
}
