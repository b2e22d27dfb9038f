//! Receipt data models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vendor used when the text has no non-blank line.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Best-effort structured record extracted from receipt text.
///
/// Every field carries a value; only `date` may be absent, in which case the
/// caller decides on a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Merchant name (first non-blank line).
    pub vendor: String,

    /// Amount found nearest the bottom of the receipt.
    pub amount: Decimal,

    /// Receipt date, if any token resolved to a calendar date.
    pub date: Option<NaiveDate>,

    /// Spending category.
    pub category: Category,
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self {
            vendor: UNKNOWN_VENDOR.to_string(),
            amount: Decimal::ZERO,
            date: None,
            category: Category::Uncategorized,
        }
    }
}

/// Spending category assigned by keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Electronics,
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    Clothing,
    Pharmacy,
    Entertainment,
    Utilities,
    #[serde(rename = "Home & Kitchen")]
    HomeAndKitchen,
    Transport,
    Others,
    Uncategorized,
}

impl Category {
    /// All categories, `Uncategorized` last.
    pub const ALL: [Category; 11] = [
        Category::Groceries,
        Category::Electronics,
        Category::FoodAndDrink,
        Category::Clothing,
        Category::Pharmacy,
        Category::Entertainment,
        Category::Utilities,
        Category::HomeAndKitchen,
        Category::Transport,
        Category::Others,
        Category::Uncategorized,
    ];

    /// Human-readable label, as stored in the database.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Electronics => "Electronics",
            Category::FoodAndDrink => "Food & Drink",
            Category::Clothing => "Clothing",
            Category::Pharmacy => "Pharmacy",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::HomeAndKitchen => "Home & Kitchen",
            Category::Transport => "Transport",
            Category::Others => "Others",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Look up a category by its label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Uncategorized
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// A receipt ready to be written to the store.
///
/// Unlike [`ExtractedRecord`] the date is always resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReceipt {
    pub vendor: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: Category,
}

impl NewReceipt {
    /// Build a storable receipt, substituting `fallback_date` when the record has none.
    pub fn from_record(record: ExtractedRecord, fallback_date: NaiveDate) -> Self {
        Self {
            vendor: record.vendor,
            date: record.date.unwrap_or(fallback_date),
            amount: record.amount,
            category: record.category,
        }
    }
}

/// A receipt row read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReceipt {
    /// Surrogate key assigned by the store.
    pub id: i64,
    pub vendor: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_record() {
        let record = ExtractedRecord::default();
        assert_eq!(record.vendor, "Unknown");
        assert_eq!(record.amount, Decimal::ZERO);
        assert_eq!(record.date, None);
        assert_eq!(record.category, Category::Uncategorized);
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("food & drink"), Some(Category::FoodAndDrink));
        assert_eq!(Category::from_label("Gardening"), None);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::HomeAndKitchen).unwrap();
        assert_eq!(json, "\"Home & Kitchen\"");
        let parsed: Category = serde_json::from_str("\"Food & Drink\"").unwrap();
        assert_eq!(parsed, Category::FoodAndDrink);
    }

    #[test]
    fn test_new_receipt_fallback_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let receipt = NewReceipt::from_record(ExtractedRecord::default(), today);
        assert_eq!(receipt.date, today);

        let dated = ExtractedRecord {
            date: NaiveDate::from_ymd_opt(2023, 12, 24),
            ..ExtractedRecord::default()
        };
        let receipt = NewReceipt::from_record(dated, today);
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2023, 12, 24).unwrap());
    }
}
