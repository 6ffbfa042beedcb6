//! Tools answering questions about the transaction data.

use crate::analyst::Analyst;
use crate::error::ToolError;
use crate::types::{Tool, ToolDefinition};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const MALL_SUMMARY_QUESTION: &str = "Give me a summary of transactions across all malls";
const ANOMALIES_QUESTION: &str = "Identify any unusual transaction patterns or anomalies in the data";

fn no_parameters() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {}
    })
}

/// Free-form question about the transaction data.
pub struct FinancialAnalysisTool {
    analyst: Arc<Analyst>,
}

#[derive(Deserialize)]
struct AnalysisArgs {
    question: String,
}

impl FinancialAnalysisTool {
    pub fn new(analyst: Arc<Analyst>) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for FinancialAnalysisTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_financial_analysis",
            "Query the Jordan retail transaction data and provide financial analysis. \
             Returns an answer with analysis based on the transaction data.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The finance-related question asked by the user"
                    }
                },
                "required": ["question"]
            }),
        )
    }

    fn name(&self) -> &str {
        "get_financial_analysis"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: AnalysisArgs = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let question = args.question.trim();
        if question.is_empty() {
            return Err(ToolError::InvalidArguments("Empty question".into()));
        }

        self.analyst.ask(question).await
    }
}

/// Summary of activity across every mall.
pub struct MallSummaryTool {
    analyst: Arc<Analyst>,
}

impl MallSummaryTool {
    pub fn new(analyst: Arc<Analyst>) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for MallSummaryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_mall_summary",
            "Get a summary of all mall transaction statistics",
            no_parameters(),
        )
    }

    fn name(&self) -> &str {
        "get_mall_summary"
    }

    async fn execute(&self, _arguments: &str) -> Result<String, ToolError> {
        self.analyst.ask(MALL_SUMMARY_QUESTION).await
    }
}

pub struct TransactionAnomaliesTool {
    analyst: Arc<Analyst>,
}

impl TransactionAnomaliesTool {
    pub fn new(analyst: Arc<Analyst>) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for TransactionAnomaliesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_transaction_anomalies",
            "Identify potential anomalies or unusual patterns in the transaction data",
            no_parameters(),
        )
    }

    fn name(&self) -> &str {
        "get_transaction_anomalies"
    }

    async fn execute(&self, _arguments: &str) -> Result<String, ToolError> {
        self.analyst.ask(ANOMALIES_QUESTION).await
    }
}

/// Financial performance report for one month.
pub struct MonthlyReportTool {
    analyst: Arc<Analyst>,
}

#[derive(Deserialize)]
struct MonthlyReportArgs {
    month: String,
}

impl MonthlyReportTool {
    pub fn new(analyst: Arc<Analyst>) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for MonthlyReportTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "generate_monthly_report",
            "Generate a financial performance report for a specific month",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "month": {
                        "type": "string",
                        "description": "Month to report on (e.g., 'February')"
                    }
                },
                "required": ["month"]
            }),
        )
    }

    fn name(&self) -> &str {
        "generate_monthly_report"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: MonthlyReportArgs = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        self.analyst
            .ask(&format!("Generate a detailed financial report for {}", args.month))
            .await
    }
}
