//! File ingestion: pick an adapter, extract, apply the date fallback, store.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::IngestError;
use crate::models::receipt::{ExtractedRecord, NewReceipt};
use crate::receipt::ReceiptExtractor;
use crate::storage::ReceiptStore;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Warning attached to receipts stored with a substituted date.
pub const MISSING_DATE_WARNING: &str = "Could not extract date. Using today's date.";

/// Broad kind of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Image,
    Pdf,
    Text,
}

impl ContentKind {
    /// Classify a MIME content type such as `image/png` or `application/pdf`.
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains("image") {
            Ok(Self::Image)
        } else if lowered.contains("pdf") {
            Ok(Self::Pdf)
        } else if lowered.contains("text") {
            Ok(Self::Text)
        } else {
            Err(IngestError::UnsupportedType(content_type.to_string()))
        }
    }
}

/// An uploaded file awaiting ingestion.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub filename: String,
    /// The receipt as stored (or as it would have been, for duplicates).
    pub receipt: NewReceipt,
    /// `false` when an identical receipt was already stored.
    pub inserted: bool,
    /// Data-quality warnings, e.g. a substituted date.
    pub warnings: Vec<String>,
}

impl IngestOutcome {
    /// Human-readable summary line.
    pub fn message(&self) -> String {
        if self.inserted {
            format!(
                "Successfully processed and stored receipt from '{}'.",
                self.filename
            )
        } else {
            format!(
                "Receipt from '{}' is already stored; duplicate skipped.",
                self.filename
            )
        }
    }
}

/// Run the adapter matching the file's content type.
///
/// This step is pure and can run concurrently for independent files.
pub fn extract_file(extractor: &ReceiptExtractor, file: &UploadedFile) -> Result<ExtractedRecord> {
    let kind = ContentKind::from_content_type(&file.content_type)?;

    let extracted = match kind {
        ContentKind::Image => extractor.extract_from_image(&file.content),
        ContentKind::Pdf => extractor.extract_from_pdf(&file.content),
        ContentKind::Text => {
            let text = std::str::from_utf8(&file.content).map_err(|source| {
                IngestError::Decode {
                    filename: file.filename.clone(),
                    source,
                }
            })?;
            Some(extractor.extract_from_text(text))
        }
    };

    extracted.ok_or_else(|| {
        warn!("No data extracted from file: {}", file.filename);
        IngestError::NoData(file.filename.clone())
    })
}

/// Ingestion pipeline over an extractor and a store.
pub struct Ingestor {
    extractor: ReceiptExtractor,
    store: ReceiptStore,
}

impl Ingestor {
    pub fn new(extractor: ReceiptExtractor, store: ReceiptStore) -> Self {
        Self { extractor, store }
    }

    pub fn extractor(&self) -> &ReceiptExtractor {
        &self.extractor
    }

    pub fn store(&self) -> &ReceiptStore {
        &self.store
    }

    /// Extract and store a file, substituting today's date when none is found.
    pub fn ingest_file(&self, file: &UploadedFile) -> Result<IngestOutcome> {
        self.ingest_file_on(file, Local::now().date_naive())
    }

    /// Like [`Self::ingest_file`] with an explicit fallback date.
    pub fn ingest_file_on(&self, file: &UploadedFile, today: NaiveDate) -> Result<IngestOutcome> {
        let record = extract_file(&self.extractor, file)?;
        commit_record(&self.store, &file.filename, record, today)
    }
}

/// Apply the date fallback and write a record to the store.
pub fn commit_record(
    store: &ReceiptStore,
    filename: &str,
    record: ExtractedRecord,
    today: NaiveDate,
) -> Result<IngestOutcome> {
    let mut warnings = Vec::new();
    if record.date.is_none() {
        warn!("{}: {}", filename, MISSING_DATE_WARNING);
        warnings.push(MISSING_DATE_WARNING.to_string());
    }

    let receipt = NewReceipt::from_record(record, today);
    let inserted = store
        .add_receipt(&receipt)
        .map_err(|source| IngestError::Storage {
            filename: filename.to_string(),
            source,
        })?;

    if inserted {
        info!("Receipt processed successfully: {}", filename);
    }

    Ok(IngestOutcome {
        filename: filename.to_string(),
        receipt,
        inserted,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::Category;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ingestor() -> Ingestor {
        Ingestor::new(
            ReceiptExtractor::default(),
            ReceiptStore::open_in_memory().unwrap(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    #[test]
    fn test_content_kind() {
        assert_eq!(ContentKind::from_content_type("image/png").unwrap(), ContentKind::Image);
        assert_eq!(ContentKind::from_content_type("application/pdf").unwrap(), ContentKind::Pdf);
        assert_eq!(ContentKind::from_content_type("text/plain").unwrap(), ContentKind::Text);
        assert_eq!(ContentKind::from_content_type("IMAGE/JPEG").unwrap(), ContentKind::Image);
        assert!(matches!(
            ContentKind::from_content_type("application/zip"),
            Err(IngestError::UnsupportedType(ct)) if ct == "application/zip"
        ));
    }

    #[test]
    fn test_ingest_text_receipt() {
        let ingestor = ingestor();
        let file = UploadedFile::new(
            "acme.txt",
            "Acme Store\nDate: 05/06/2024\nItem A  50\nItem B  20\nTotal: ₹120.50",
            "text/plain",
        );

        let outcome = ingestor.ingest_file_on(&file, today()).unwrap();

        assert!(outcome.inserted);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.receipt.vendor, "Acme Store");
        assert_eq!(outcome.receipt.date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(outcome.receipt.amount, Decimal::from_str("120.50").unwrap());
        assert_eq!(outcome.receipt.category, Category::Groceries);
        assert_eq!(
            outcome.message(),
            "Successfully processed and stored receipt from 'acme.txt'."
        );
        assert_eq!(ingestor.store().count().unwrap(), 1);
    }

    #[test]
    fn test_missing_date_uses_today_and_warns() {
        let ingestor = ingestor();
        let file = UploadedFile::new("nodate.txt", "Zzz Co\nTotal 10.00", "text/plain");

        let outcome = ingestor.ingest_file_on(&file, today()).unwrap();

        assert_eq!(outcome.receipt.date, today());
        assert_eq!(outcome.warnings, vec![MISSING_DATE_WARNING.to_string()]);
    }

    #[test]
    fn test_same_file_twice_stores_one_row() {
        let ingestor = ingestor();
        let file = UploadedFile::new("a.txt", "Zzz Co\n01/01/2024\nTotal 10.00", "text/plain");

        assert!(ingestor.ingest_file_on(&file, today()).unwrap().inserted);
        let second = ingestor.ingest_file_on(&file, today()).unwrap();
        assert!(!second.inserted);
        assert!(second.message().contains("duplicate skipped"));
        assert_eq!(ingestor.store().count().unwrap(), 1);
    }

    #[test]
    fn test_empty_text_still_stores_defaults() {
        let ingestor = ingestor();
        let file = UploadedFile::new("blank.txt", "", "text/plain");

        let outcome = ingestor.ingest_file_on(&file, today()).unwrap();
        assert_eq!(outcome.receipt.vendor, "Unknown");
        assert_eq!(outcome.receipt.amount, Decimal::ZERO);
        assert_eq!(outcome.receipt.category, Category::Uncategorized);
        assert_eq!(outcome.receipt.date, today());
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let ingestor = ingestor();
        let file = UploadedFile::new("archive.zip", vec![0u8; 4], "application/zip");

        let err = ingestor.ingest_file_on(&file, today()).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: application/zip");
        assert_eq!(ingestor.store().count().unwrap(), 0);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let ingestor = ingestor();
        let file = UploadedFile::new("bad.txt", vec![0xff, 0xfe, 0x41], "text/plain");

        let err = ingestor.ingest_file_on(&file, today()).unwrap_err();
        assert!(matches!(err, IngestError::Decode { ref filename, .. } if filename == "bad.txt"));
    }

    #[test]
    fn test_broken_pdf_is_total_failure() {
        let ingestor = ingestor();
        let file = UploadedFile::new("scan.pdf", b"garbage".to_vec(), "application/pdf");

        let err = ingestor.ingest_file_on(&file, today()).unwrap_err();
        assert_eq!(err.to_string(), "Could not extract any data from 'scan.pdf'.");
        assert_eq!(ingestor.store().count().unwrap(), 0);
    }

    #[test]
    fn test_unreadable_pdf_text_is_total_failure() {
        let ingestor = ingestor();
        let pdf = crate::pdf::single_page_pdf(Some("BT /F1 12 Tf 72 712 Td (Acme Store) Tj ET"));
        let file = UploadedFile::new("nofont.pdf", pdf, "application/pdf");

        let err = ingestor.ingest_file_on(&file, today()).unwrap_err();
        assert_eq!(err.to_string(), "Could not extract any data from 'nofont.pdf'.");
    }

    #[test]
    fn test_image_without_ocr_is_total_failure() {
        let ingestor = ingestor();
        let file = UploadedFile::new("photo.png", vec![1u8, 2, 3], "image/png");

        let err = ingestor.ingest_file_on(&file, today()).unwrap_err();
        assert!(matches!(err, IngestError::NoData(name) if name == "photo.png"));
    }
}
