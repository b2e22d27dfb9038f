//! Core library for receipt extraction and spending tracking.
//!
//! This crate provides:
//! - Heuristic field extraction (vendor, total amount, date, category)
//! - Entry adapters for images (via OCR), PDFs and plain text
//! - A deduplicating SQLite receipt store
//! - Spending aggregates over stored receipts

pub mod error;
pub mod ingest;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod receipt;
pub mod report;
pub mod storage;

pub use error::{IngestError, OcrError, PdfError, ReceiptError, Result, StorageError};
pub use ingest::{ContentKind, IngestOutcome, Ingestor, UploadedFile};
pub use models::config::{AppConfig, DateOrder};
pub use models::receipt::{Category, ExtractedRecord, NewReceipt, StoredReceipt};
pub use ocr::{OcrBackend, OcrResult, TextBox};
#[cfg(feature = "ocr")]
pub use ocr::PureOcrEngine;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use receipt::{HeuristicReceiptParser, ReceiptExtractor, ReceiptParser};
pub use report::SpendingReport;
pub use storage::ReceiptStore;
