//! CSV-backed transaction dataset.

use crate::error::TransactionError;
use crate::filter::{filter_transactions, sample, SAMPLE_LIMIT};
use crate::render::render_table;
use crate::stats::SummaryStatistics;
use crate::types::{Transaction, DATE_FORMAT};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Text returned when a query matches no transactions.
pub const NO_MATCHES: &str = "No transactions matching your query were found.";

/// Loaded transaction data, immutable after load.
#[derive(Debug, Clone)]
pub struct TransactionSet {
    headers: Vec<String>,
    transactions: Vec<Transaction>,
}

/// Positions of the typed columns within a row.
struct Columns {
    date: usize,
    mall_name: usize,
    amount: usize,
    status: usize,
    kind: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, TransactionError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(TransactionError::MissingColumn(name))
        };

        Ok(Self {
            date: find("transaction_date")?,
            mall_name: find("mall_name")?,
            amount: find("transaction_amount")?,
            status: find("transaction_status")?,
            kind: find("transaction_type")?,
        })
    }

    fn parse(&self, record: &csv::StringRecord, row: usize) -> Result<Transaction, TransactionError> {
        let cell = |idx: usize| record.get(idx).unwrap_or_default();

        let date = NaiveDateTime::parse_from_str(cell(self.date), DATE_FORMAT).map_err(|e| {
            TransactionError::InvalidRow {
                row,
                reason: format!("bad transaction_date '{}': {}", cell(self.date), e),
            }
        })?;

        let amount = cell(self.amount)
            .parse::<f64>()
            .map_err(|e| TransactionError::InvalidRow {
                row,
                reason: format!("bad transaction_amount '{}': {}", cell(self.amount), e),
            })?;

        Ok(Transaction {
            date,
            mall_name: cell(self.mall_name).to_string(),
            amount,
            status: cell(self.status).to_string(),
            kind: cell(self.kind).to_string(),
            fields: record.iter().map(String::from).collect(),
        })
    }
}

impl TransactionSet {
    /// Load transactions from a CSV file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TransactionError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TransactionError::Open {
            path: path.display().to_string(),
            source,
        })?;

        let set = Self::from_reader(file)?;
        info!(count = set.len(), "Loaded transaction data");
        Ok(set)
    }

    /// Parse transactions from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TransactionError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        let columns = Columns::locate(&headers)?;

        let mut transactions = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            // Row numbers are 1-based and exclude the header.
            transactions.push(columns.parse(&record?, idx + 1)?);
        }

        Ok(Self {
            headers,
            transactions,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Narrow transactions by the keywords found in `query`.
    pub fn filter(&self, query: &str) -> Vec<&Transaction> {
        filter_transactions(&self.transactions, query)
    }

    /// Filtered, sampled and rendered transactions for a question.
    pub fn relevant_context(&self, query: &str) -> String {
        let matched = self.filter(query);
        debug!(matched = matched.len(), "Filtered transactions for query");

        let rows = sample(matched, SAMPLE_LIMIT, &mut rand::thread_rng());
        self.render_context(&rows)
    }

    /// Render rows as a column-aligned table, or the no-match text.
    pub fn render_context(&self, rows: &[&Transaction]) -> String {
        if rows.is_empty() {
            return NO_MATCHES.to_string();
        }
        render_table(&self.headers, rows.iter().map(|t| t.fields.as_slice()))
    }

    /// Aggregate statistics over the whole dataset.
    pub fn statistics(&self) -> SummaryStatistics {
        SummaryStatistics::compute(&self.transactions)
    }

    /// Aggregate statistics as pretty-printed JSON.
    pub fn summary_statistics(&self) -> Result<String, TransactionError> {
        Ok(serde_json::to_string_pretty(&self.statistics())?)
    }
}
