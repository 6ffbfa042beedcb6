//! Question answering over the transaction dataset.

use crate::error::ToolError;
use openai_client::{Message, OpenAiClient};
use std::sync::Arc;
use tracing::{debug, instrument};
use transactions::TransactionSet;

const PROMPT_TEMPLATE: &str = "
You are a Smart Financial Advisor specialized in analyzing retail transaction data from multiple mall locations in Jordan.
Your goal is to provide accurate, insightful analysis of financial transactions based on the data provided.

Question: {question}
Relevant Transaction Data:
{context}

Additional Statistics:
{statistics}

Please provide a comprehensive answer with specific data points to support your analysis.
If appropriate, suggest potential business actions based on the insights.
Answer:
";

/// Answers questions by handing the model matching transactions and
/// dataset-wide statistics.
pub struct Analyst {
    client: Arc<OpenAiClient>,
    data: Arc<TransactionSet>,
}

impl Analyst {
    pub fn new(client: Arc<OpenAiClient>, data: Arc<TransactionSet>) -> Self {
        Self { client, data }
    }

    /// Build the full prompt for `question`.
    pub fn prompt(&self, question: &str) -> Result<String, ToolError> {
        let context = self.data.relevant_context(question);
        let statistics = self.data.summary_statistics()?;

        Ok(fill_template(question, &context, &statistics))
    }

    /// Answer `question` with a single model call, retried on transient
    /// failures.
    #[instrument(skip(self), fields(model = %self.client.model()))]
    pub async fn ask(&self, question: &str) -> Result<String, ToolError> {
        let prompt = self.prompt(question)?;
        debug!(prompt_len = prompt.len(), "Prompt built");

        let answer = self
            .client
            .chat_with_retry(&[Message::user(prompt)], None, None, None)
            .await?;
        Ok(answer)
    }
}

/// Substitute the template slots in a single pass, so placeholder-like
/// text inside a value is left alone.
fn fill_template(question: &str, context: &str, statistics: &str) -> String {
    let slots = [
        ("{question}", question),
        ("{context}", context),
        ("{statistics}", statistics),
    ];

    let mut prompt = String::with_capacity(
        PROMPT_TEMPLATE.len() + question.len() + context.len() + statistics.len(),
    );
    let mut rest = PROMPT_TEMPLATE;
    for (slot, value) in slots {
        if let Some(idx) = rest.find(slot) {
            prompt.push_str(&rest[..idx]);
            prompt.push_str(value);
            rest = &rest[idx + slot.len()..];
        }
    }
    prompt.push_str(rest);
    prompt
}
