//! Retail transaction dataset: CSV loading, keyword filtering, summary
//! statistics and context rendering for the advisor prompt.

mod dataset;
mod error;
mod filter;
mod render;
mod stats;
mod types;

pub use dataset::{TransactionSet, NO_MATCHES};
pub use error::TransactionError;
pub use filter::{filter_transactions, sample, MALLS, MONTHS, SAMPLE_LIMIT};
pub use render::render_table;
pub use stats::{SummaryStatistics, Tally};
pub use types::*;
