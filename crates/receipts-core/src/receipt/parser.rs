//! Heuristic receipt parser combining the field rules.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::DateOrder;
use crate::models::receipt::{Category, ExtractedRecord, UNKNOWN_VENDOR};

use super::rules::{
    AmountExtractor, CategoryExtractor, DateExtractor, FieldExtractor, ReceiptText,
    VendorExtractor,
};

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse a receipt from text. Missing fields fall back to defaults.
    fn parse(&self, text: &str) -> ExtractedRecord;
}

/// Rule-based parser: first line as vendor, bottom-most amount, top-most date
/// and keyword category.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicReceiptParser {
    vendor: VendorExtractor,
    amount: AmountExtractor,
    date: DateExtractor,
    category: CategoryExtractor,
}

impl HeuristicReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpretation of ambiguous numeric dates.
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date = self.date.with_order(order);
        self
    }
}

impl ReceiptParser for HeuristicReceiptParser {
    fn parse(&self, text: &str) -> ExtractedRecord {
        let text = ReceiptText::new(text);

        let vendor = self.vendor.extract(&text);
        let amount = self.amount.extract(&text);
        let date = self.date.extract(&text);
        let category = self.category.extract(&text);

        debug!(
            "Parsed {} lines: vendor={:?} amount={:?} date={:?} category={:?}",
            text.lines().len(),
            vendor.as_ref().map(|m| m.source.as_str()),
            amount.as_ref().map(|m| m.source.as_str()),
            date.as_ref().map(|m| m.source.as_str()),
            category.as_ref().map(|m| m.source.as_str()),
        );

        ExtractedRecord {
            vendor: vendor
                .map(|m| m.value)
                .unwrap_or_else(|| UNKNOWN_VENDOR.to_string()),
            amount: amount.map(|m| m.value).unwrap_or(Decimal::ZERO),
            date: date.map(|m| m.value),
            category: category
                .map(|m| m.value)
                .unwrap_or(Category::Uncategorized),
        }
    }
}
