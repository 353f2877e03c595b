use async_trait::async_trait;
use std::fmt::Write;

use super::ai_model::AiMemory;
use super::ai_traits::SummaryWriterTrait;
use crate::errors::Result;
use crate::reports::MonthlyReport;

/// Deterministic summary used when no LLM provider is configured.
#[derive(Debug, Default, Clone)]
pub struct TemplateSummaryWriter;

impl TemplateSummaryWriter {
    pub fn render(report: &MonthlyReport) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "In {}-{:02} you earned {} and spent {} across {} transactions, ",
            report.year,
            report.month,
            report.total_income,
            report.total_expenses,
            report.transaction_count
        );
        if report.net.is_sign_negative() {
            let _ = write!(out, "a shortfall of {}.", report.net.abs());
        } else {
            let _ = write!(
                out,
                "leaving {} ({}% savings rate).",
                report.net, report.savings_rate
            );
        }
        if let Some(top) = report.categories.first() {
            let _ = write!(
                out,
                " Your largest category was {} at {} ({}% of spending).",
                top.category_name, top.total, top.percent
            );
        }
        if let Some(change) = report.expense_change_percent {
            let direction = if change.is_sign_negative() { "down" } else { "up" };
            let _ = write!(
                out,
                " Spending was {} {}% from the previous month.",
                direction,
                change.abs()
            );
        }
        if let Some(merchant) = report.top_merchants.first() {
            let _ = write!(
                out,
                " You visited {} most ({} times).",
                merchant.merchant, merchant.count
            );
        }
        out
    }
}

#[async_trait]
impl SummaryWriterTrait for TemplateSummaryWriter {
    async fn write_summary(&self, report: &MonthlyReport, _memories: &[AiMemory]) -> Result<String> {
        Ok(Self::render(report))
    }
}
