//! Rule-based field extractors for receipts.

pub mod amounts;
pub mod categories;
pub mod dates;
pub mod patterns;
pub mod vendor;

pub use amounts::{parse_amount, AmountExtractor};
pub use categories::{categorize, CategoryExtractor, CATEGORY_KEYWORDS, CATEGORY_TABLE_VERSION};
pub use dates::{resolve_date, DateExtractor};
pub use patterns::*;
pub use vendor::VendorExtractor;

/// Line terminators recognised when splitting receipt text.
///
/// OCR engines and PDF text layers emit form feeds and other separators
/// between blocks, so `\n` alone is not enough.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Receipt text normalized into trimmed, non-empty lines.
#[derive(Debug, Clone)]
pub struct ReceiptText<'a> {
    raw: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> ReceiptText<'a> {
    pub fn new(raw: &'a str) -> Self {
        let lines = raw
            .split(LINE_BREAKS)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        Self { raw, lines }
    }

    /// The text exactly as received.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Non-empty trimmed lines in document order.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field, or `None` when nothing matches.
    fn extract(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<Self::Output>>;
}

/// A matched field together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index into [`ReceiptText::lines`], if the match is line-based.
    pub line: Option<usize>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            line: None,
            source: source.into(),
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_are_trimmed_and_non_empty() {
        let text = ReceiptText::new("  Acme Store  \n\n   \r\n\tItem A 50\t\n");
        assert_eq!(text.lines(), &["Acme Store", "Item A 50"]);
    }

    #[test]
    fn test_form_feed_splits_lines() {
        let text = ReceiptText::new("Page one\u{0c}Page two\rPage three");
        assert_eq!(text.lines(), &["Page one", "Page two", "Page three"]);
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert!(ReceiptText::new("").is_empty());
        assert!(ReceiptText::new(" \n\t\n ").is_empty());
    }
}
