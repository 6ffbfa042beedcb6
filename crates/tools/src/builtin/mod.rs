//! Built-in advisor tools.

mod analysis;
mod email;

pub use analysis::{FinancialAnalysisTool, MallSummaryTool, MonthlyReportTool, TransactionAnomaliesTool};
pub use email::SendEmailTool;

use crate::analyst::Analyst;
use crate::registry::ToolRegistry;
use mailer::EmailSender;
use std::sync::Arc;

/// Register every advisor tool with `registry`.
pub fn register_advisor_tools(
    registry: &mut ToolRegistry,
    analyst: Arc<Analyst>,
    mailer: Option<Arc<dyn EmailSender>>,
) {
    registry.register(Arc::new(FinancialAnalysisTool::new(analyst.clone())));
    registry.register(Arc::new(MallSummaryTool::new(analyst.clone())));
    registry.register(Arc::new(TransactionAnomaliesTool::new(analyst.clone())));
    registry.register(Arc::new(MonthlyReportTool::new(analyst)));
    registry.register(Arc::new(SendEmailTool::new(mailer)));
}
