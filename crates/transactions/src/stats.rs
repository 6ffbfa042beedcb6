//! Dataset-wide summary statistics.

use crate::types::Transaction;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Ordered key/value pairs, serialized as a JSON object in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<V>(pub Vec<(String, V)>);

impl<V> Tally<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl<V: Serialize> Serialize for Tally<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Summary statistics handed to the model alongside every question.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStatistics {
    /// Transaction count per mall, most frequent first.
    pub transactions_by_mall: Tally<usize>,
    /// Summed transaction amount per mall, by mall name, rounded to cents
    /// so float noise from the summation never reaches the prompt.
    pub total_amount_by_mall: Tally<f64>,
    pub transaction_status_distribution: Tally<usize>,
    pub transaction_types: Tally<usize>,
    /// Transaction count per calendar month, keyed `Month N`.
    pub transactions_by_month: Tally<usize>,
}

impl SummaryStatistics {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut amounts: BTreeMap<&str, f64> = BTreeMap::new();
        let mut months: BTreeMap<u32, usize> = BTreeMap::new();
        for t in transactions {
            *amounts.entry(t.mall_name.as_str()).or_default() += t.amount;
            *months.entry(t.month()).or_default() += 1;
        }

        Self {
            transactions_by_mall: value_counts(transactions.iter().map(|t| t.mall_name.as_str())),
            total_amount_by_mall: Tally(
                amounts
                    .into_iter()
                    .map(|(mall, total)| (mall.to_string(), round_cents(total)))
                    .collect(),
            ),
            transaction_status_distribution: value_counts(
                transactions.iter().map(|t| t.status.as_str()),
            ),
            transaction_types: value_counts(transactions.iter().map(|t| t.kind.as_str())),
            transactions_by_month: Tally(
                months
                    .into_iter()
                    .map(|(month, count)| (format!("Month {}", month), count))
                    .collect(),
            ),
        }
    }
}

/// Count occurrences, most frequent first, ties broken by value.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Tally<usize> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    Tally(pairs)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use crate::TransactionSet;

    #[test]
    fn test_totals_are_rounded_to_cents() {
        let csv = "\
transaction_date,mall_name,transaction_amount,transaction_status,transaction_type
01/02/2025 10:15,C Mall,0.1,Success,Purchase
02/02/2025 11:00,C Mall,0.2,Success,Purchase
";
        let set = TransactionSet::from_reader(csv.as_bytes()).unwrap();
        let stats = set.statistics();

        assert_eq!(stats.total_amount_by_mall.get("C Mall"), Some(&0.3));
        assert!(set.summary_statistics().unwrap().contains("\"C Mall\": 0.3\n"));
    }
}
