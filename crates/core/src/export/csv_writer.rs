use csv::{QuoteStyle, WriterBuilder};

use crate::errors::{Error, Result};
use crate::transactions::TransactionWithDetails;

pub const CSV_HEADER: [&str; 9] = [
    "date",
    "description",
    "merchant",
    "amount",
    "type",
    "account",
    "category",
    "tags",
    "notes",
];

/// Renders transactions as CSV with a header row. Tags are joined with `;`.
pub fn write_transactions_csv(rows: &[TransactionWithDetails]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for row in rows {
        let t = &row.transaction;
        let tags = row
            .tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        writer.write_record([
            t.date.to_string(),
            t.description.clone(),
            t.merchant.clone().unwrap_or_default(),
            t.amount.to_string(),
            t.transaction_type.to_string(),
            row.account_name.clone(),
            row.category_name.clone().unwrap_or_default(),
            tags,
            t.notes.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("Failed to flush CSV export: {}", e)))
}
