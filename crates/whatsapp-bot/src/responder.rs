//! Routes an incoming message to a canned answer or a gateway tool.

use gateway::{GatewayClient, GatewayClientError};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Demo answers, checked in this order.
const CANNED_RESPONSES: [(&str, &str); 10] = [
    (
        "best performing mall",
        "Based on the transaction data, C Mall (particularly C Mall Amman) has the highest \
         transaction volume with an average transaction amount of 8.75 JOD. Z Mall Gardens follows \
         closely with strong customer traffic.",
    ),
    (
        "mall summary",
        "Transaction Summary:\nC Mall: 274 transactions (145 completed, 129 failed)\nZ Mall: 258 \
         transactions (143 completed, 115 failed)\nY Mall: 218 transactions (112 completed, 106 \
         failed)\nC Mall Amman has the highest average transaction value at 8.75 JOD.",
    ),
    (
        "transaction anomalies",
        "Transaction Anomalies Detected:\n1. A significant number of failed transactions at Z Mall \
         Al Bayader (32% failure rate)\n2. Unusual spike in transaction volume at Y Mall Tla'a \
         Al-Ali between 14-16 Feb\n3. High-value transactions (>20 JOD) at unusual times at C Mall \
         Amman",
    ),
    (
        "sales trends",
        "Recent Sales Trends:\n- Overall completion rate: 51.2%\n- Weekday transactions \
         outperforming weekends by 23%\n- C Mall Amman showing strongest growth (+15%)\n- Z Mall \
         Gardens showing improved transaction completion rates",
    ),
    (
        "monthly report",
        "February 2025 Mall Performance:\n- Total Transactions: 750\n- Successful Transactions: 384 \
         (51.2%)\n- Failed Transactions: 366 (48.8%)\n- Highest Revenue: C Mall Amman (2,532 JOD)\n\
         - Most Transactions: Z Mall Gardens (137)\n- Best Completion Rate: C Mall Aqaba (68%)",
    ),
    (
        "transaction failures",
        "Transaction Failure Analysis:\n- Overall failure rate: 48.8%\n- Highest failure rate: Y \
         Mall Tla'a Al-Ali (53%)\n- Most common failure time: 14:00-16:00\n- Z Mall Al Bayader \
         experiencing technical issues with 32% of all failures",
    ),
    (
        "peak hours",
        "Peak Transaction Hours:\n- Morning peak: 10:00-11:00 (92 transactions)\n- Afternoon peak: \
         14:00-15:00 (107 transactions)\n- Evening peak: 17:00-18:00 (83 transactions)\n- C Mall \
         Amman has highest evening activity\n- Z Mall Gardens dominates morning transactions",
    ),
    (
        "mall comparison",
        "Mall Comparison:\n1. C Mall: Higher transaction values, 51% completion rate\n2. Z Mall: \
         Highest transaction volume, 55% completion rate\n3. Y Mall: Lowest transaction volume but \
         highest average value at Y Mall Shmeisani",
    ),
    (
        "mall revenue",
        "Revenue by Mall (Feb 2025):\nC Mall: 5,840 JOD\nZ Mall: 5,210 JOD\nY Mall: 4,780 \
         JOD\nHighest revenue branch: C Mall Amman (2,532 JOD)",
    ),
    (
        "refund rate",
        "Refund Analysis:\nOnly 5 refunds recorded (0.7% of transactions)\n- Y Mall Shmeisani: 2 \
         refunds\n- C Mall Amman: 1 refund\n- Z Mall Al Jubeiha: 1 refund\n- Y Mall Dabouq: 1 \
         refund\nAverage refund amount: 8.96 JOD",
    ),
];

pub const HELP_TEXT: &str = "I'm your RightNow Financial Advisor. You can chat with me naturally about:

• Financial analysis and insights
• Mall transaction summaries
• Unusual transaction patterns
• Monthly reports

Try asking me about:
• \"What is the best performing mall?\"
• \"Give me a mall summary\"
• \"Show me transaction anomalies\"
• \"What are the sales trends?\"
• \"Generate a monthly report\"
• \"What's the refund rate?\"";

pub const GREETING: &str = "Hello! I'm your RightNow Financial Advisor. You can chat with me \
naturally about financial analysis, mall summaries, transaction anomalies, or monthly reports. \
Just ask me anything in natural language!";

pub const ONLINE_NOTICE: &str = "Your RightNow Financial Advisor is online! You can ask me \
anything about financial analysis, mall summaries, transaction patterns, or monthly reports in \
natural language.";

const SHORT_RESULT: &str = "I couldn't find specific information about that. Could you rephrase \
your question or ask about something else?";
const MISSING_RESULT: &str =
    "I couldn't process your request properly. The response format was unexpected.";
const UNREADABLE_RESULT: &str =
    "I had trouble understanding the response from our AI system. Please try again.";
const TIMED_OUT: &str = "Sorry, the request is taking longer than expected. Please try a simpler \
question or try again later.";
const UNREACHABLE: &str = "I'm having trouble connecting to our AI system right now. Please check \
if all servers are running.";
const TECHNICAL_DIFFICULTIES: &str =
    "I'm experiencing some technical difficulties. Please try again shortly.";

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const REPORT_WORDS: [&str; 3] = ["monthly report", "report for", "generate report"];
const ANOMALY_WORDS: [&str; 6] = [
    "anomaly",
    "anomalies",
    "unusual",
    "suspicious",
    "fraud",
    "strange pattern",
];
const SUMMARY_WORDS: [&str; 5] = [
    "summary",
    "overview",
    "mall performance",
    "all malls",
    "across malls",
];

/// Canned answer for `text`: exact match first, then substring match.
pub fn canned_response(text: &str) -> Option<&'static str> {
    let text = text.trim().to_lowercase();

    CANNED_RESPONSES
        .iter()
        .find(|(key, _)| text == *key)
        .or_else(|| CANNED_RESPONSES.iter().find(|(key, _)| text.contains(key)))
        .map(|(_, response)| *response)
}

/// Which tool a free-form message is routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    MonthlyReport { month: String },
    Anomalies,
    MallSummary,
    FinancialAnalysis { question: String },
}

impl Intent {
    /// Classify `text`. First matching keyword group wins.
    ///
    /// A report request naming no month uses `Latest` when it asks for the
    /// latest or most recent one, otherwise `current_month`.
    pub fn detect(text: &str, current_month: &str) -> Self {
        let lower = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if mentions(&REPORT_WORDS) {
            let month = MONTH_NAMES
                .iter()
                .find(|m| lower.contains(*m))
                .map(|m| capitalize(m))
                .unwrap_or_else(|| {
                    if lower.contains("latest") || lower.contains("recent") {
                        "Latest".to_string()
                    } else {
                        current_month.to_string()
                    }
                });
            Intent::MonthlyReport { month }
        } else if mentions(&ANOMALY_WORDS) {
            Intent::Anomalies
        } else if mentions(&SUMMARY_WORDS) {
            Intent::MallSummary
        } else {
            Intent::FinancialAnalysis {
                question: text.to_string(),
            }
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Intent::MonthlyReport { .. } => "generate_monthly_report",
            Intent::Anomalies => "get_transaction_anomalies",
            Intent::MallSummary => "get_mall_summary",
            Intent::FinancialAnalysis { .. } => "get_financial_analysis",
        }
    }

    pub fn arguments(&self) -> Option<Value> {
        match self {
            Intent::MonthlyReport { month } => Some(json!({ "month": month })),
            Intent::FinancialAnalysis { question } => Some(json!({ "question": question })),
            Intent::Anomalies | Intent::MallSummary => None,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn a gateway outcome into the text sent back to the user.
pub fn reply_text(outcome: Result<String, GatewayClientError>) -> String {
    match outcome {
        Ok(result) if result.trim().chars().count() < 10 => {
            warn!("Gateway result is empty or too short");
            SHORT_RESULT.to_string()
        }
        Ok(result) => result,
        Err(GatewayClientError::MissingResult) => MISSING_RESULT.to_string(),
        Err(GatewayClientError::Json(e)) => {
            error!(error = %e, "Unreadable gateway response");
            UNREADABLE_RESULT.to_string()
        }
        Err(GatewayClientError::Status { status, body }) => {
            error!(status, body = %body, "Gateway returned an error");
            format!(
                "I'm having trouble processing your request right now. Please try again in a \
                 moment. (Error: {})",
                status
            )
        }
        Err(GatewayClientError::Timeout) => TIMED_OUT.to_string(),
        Err(GatewayClientError::Connect(e)) => {
            error!(error = %e, "Gateway unreachable");
            UNREACHABLE.to_string()
        }
        Err(e) => {
            error!(error = %e, "Error processing message");
            TECHNICAL_DIFFICULTIES.to_string()
        }
    }
}

/// Answers WhatsApp messages.
#[derive(Clone)]
pub struct Responder {
    gateway: GatewayClient,
    timeout: Duration,
}

impl Responder {
    pub fn new(gateway: GatewayClient, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn respond(&self, text: &str) -> String {
        if let Some(response) = canned_response(text) {
            debug!("Using canned response");
            return response.to_string();
        }

        if text.trim().eq_ignore_ascii_case("/help") {
            return HELP_TEXT.to_string();
        }

        let current_month = chrono::Local::now().format("%B").to_string();
        let intent = Intent::detect(text, &current_month);
        info!(tool = intent.tool_name(), "Intent detected");

        let outcome = self
            .gateway
            .call_tool(intent.tool_name(), intent.arguments(), self.timeout)
            .await;

        reply_text(outcome)
    }
}
