//! Export module - CSV of filtered transactions and a full JSON backup.

mod csv_writer;
mod export_model;
mod export_service;


pub use csv_writer::{write_transactions_csv, CSV_HEADER};
pub use export_model::FullExport;
pub use export_service::{ExportService, ExportServiceTrait};
