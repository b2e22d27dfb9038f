//! Error types for the receipts-core library.

use thiserror::Error;

/// Main error type for the receipts library.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// Receipt storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A spending total exceeded the decimal range.
    #[error("spending total overflowed: {0}")]
    Overflow(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors that reject an uploaded file before or after extraction.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The content type is not an image, PDF or text.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// A text upload was not valid UTF-8.
    #[error("'{filename}' is not valid UTF-8 text: {source}")]
    Decode {
        filename: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The adapter produced no data at all.
    #[error("Could not extract any data from '{0}'.")]
    NoData(String),

    /// The extracted record could not be stored.
    #[error("failed to store receipt from '{filename}': {source}")]
    Storage {
        filename: String,
        #[source]
        source: StorageError,
    },
}

/// Errors raised by the SQLite receipt store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row holds a value that does not map back to a receipt.
    #[error("corrupt row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

/// Result type for the receipts library.
pub type Result<T> = std::result::Result<T, ReceiptError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ingest_messages() {
        assert_eq!(
            IngestError::UnsupportedType("application/zip".into()).to_string(),
            "Unsupported file type: application/zip"
        );
        assert_eq!(
            IngestError::NoData("scan.pdf".into()).to_string(),
            "Could not extract any data from 'scan.pdf'."
        );
    }

    #[test]
    fn test_storage_wrapping_keeps_inner_message() {
        let err: ReceiptError = StorageError::CorruptRow {
            id: 3,
            reason: "bad amount".into(),
        }
        .into();
        assert_eq!(err.to_string(), "storage error: corrupt row 3: bad amount");
    }
}
