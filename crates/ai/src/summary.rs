//! Monthly summary generation backed by the configured LLM.
//!
//! Falls back to the deterministic template when the provider is unavailable
//! or returns nothing usable.

use async_trait::async_trait;
use log::{debug, warn};
use rig::{client::CompletionClient, completion::Prompt};
use std::fmt::Write;

use pocketpilot_core::ai::{AiMemory, SummaryWriterTrait, TemplateSummaryWriter};
use pocketpilot_core::errors::Result;
use pocketpilot_core::reports::MonthlyReport;

use crate::error::AiError;
use crate::providers::{create_client, LlmConfig};

const SUMMARY_PREAMBLE: &str = "You write short, encouraging monthly money recaps for a \
personal finance app. Use only the figures provided. Write 3 to 5 sentences of plain text \
with no markdown, no headings and no lists.";

const MAX_SUMMARY_TOKENS: u64 = 400;

pub struct LlmSummaryWriter {
    config: LlmConfig,
}

impl LlmSummaryWriter {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, AiError> {
        let client = create_client(&self.config)?;
        let text = client
            .agent(self.config.model())
            .preamble(SUMMARY_PREAMBLE)
            .max_tokens(MAX_SUMMARY_TOKENS)
            .build()
            .prompt(prompt)
            .await
            .map_err(|e| AiError::provider(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

/// Renders the report figures and user memories into the model prompt.
pub fn build_summary_prompt(report: &MonthlyReport, memories: &[AiMemory]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Month: {}-{:02}", report.year, report.month);
    let _ = writeln!(prompt, "Income: {}", report.total_income);
    let _ = writeln!(prompt, "Expenses: {}", report.total_expenses);
    let _ = writeln!(prompt, "Net: {}", report.net);
    let _ = writeln!(prompt, "Savings rate: {}%", report.savings_rate);
    let _ = writeln!(prompt, "Transactions: {}", report.transaction_count);
    if let Some(change) = report.expense_change_percent {
        let _ = writeln!(prompt, "Expense change vs previous month: {}%", change);
    }

    if !report.categories.is_empty() {
        prompt.push_str("Top categories:\n");
        for category in report.categories.iter().take(5) {
            let _ = writeln!(
                prompt,
                "- {}: {} ({}%)",
                category.category_name, category.total, category.percent
            );
        }
    }
    if !report.top_merchants.is_empty() {
        prompt.push_str("Top merchants:\n");
        for merchant in report.top_merchants.iter().take(3) {
            let _ = writeln!(
                prompt,
                "- {}: {} over {} visits",
                merchant.merchant, merchant.total, merchant.count
            );
        }
    }
    if !memories.is_empty() {
        prompt.push_str("About the user:\n");
        for memory in memories {
            let _ = writeln!(prompt, "- {}: {}", memory.key, memory.value);
        }
    }
    prompt
}

#[async_trait]
impl SummaryWriterTrait for LlmSummaryWriter {
    async fn write_summary(&self, report: &MonthlyReport, memories: &[AiMemory]) -> Result<String> {
        let prompt = build_summary_prompt(report, memories);
        debug!(
            "Generating summary for {}-{:02} with model {}",
            report.year,
            report.month,
            self.config.model()
        );

        match self.generate(&prompt).await {
            Ok(text) if !text.is_empty() => Ok(text),
            Ok(_) => {
                warn!("Summary model returned no text, using template");
                Ok(TemplateSummaryWriter::render(report))
            }
            Err(e) => {
                warn!("Summary generation failed, using template: {}", e);
                Ok(TemplateSummaryWriter::render(report))
            }
        }
    }
}
