//! Vendor extraction.

use super::{ExtractionMatch, FieldExtractor, ReceiptText};

/// Takes the first non-blank line verbatim as the merchant name.
#[derive(Debug, Default, Clone, Copy)]
pub struct VendorExtractor;

impl VendorExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = String;

    fn extract(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<String>> {
        let first = text.lines().first()?;
        Some(ExtractionMatch::new(first.to_string(), *first).with_line(0))
    }
}
