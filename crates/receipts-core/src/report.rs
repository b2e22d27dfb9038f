//! Spending aggregates over stored receipts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{ReceiptError, Result};
use crate::models::receipt::{Category, StoredReceipt};
use crate::storage::ReceiptStore;

/// Aggregate spending figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingReport {
    /// Number of receipts.
    pub receipt_count: usize,
    /// Sum of all amounts.
    pub total_spend: Decimal,
    /// Mean amount per receipt, `None` when there are no receipts.
    pub average_per_receipt: Option<Decimal>,
    /// Most frequent vendor; ties go to the alphabetically first name.
    pub top_vendor: Option<String>,
    /// Spend per calendar month, keyed `YYYY-MM`.
    pub monthly: BTreeMap<String, Decimal>,
    /// Spend per category.
    pub by_category: BTreeMap<Category, Decimal>,
    /// Spend per vendor.
    pub by_vendor: BTreeMap<String, Decimal>,
}

impl SpendingReport {
    /// Build a report over everything in `store`.
    pub fn from_store(store: &ReceiptStore) -> Result<Self> {
        let receipts = store.all_receipts()?;
        Self::from_receipts(&receipts)
    }

    /// Build a report from stored receipts.
    ///
    /// Fails with [`ReceiptError::Overflow`] when a sum leaves the decimal range.
    pub fn from_receipts(receipts: &[StoredReceipt]) -> Result<Self> {
        let mut total_spend = Decimal::ZERO;
        let mut monthly: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
        let mut by_vendor: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut vendor_counts: BTreeMap<&str, usize> = BTreeMap::new();

        for receipt in receipts {
            accumulate(&mut total_spend, receipt.amount, "total spend")?;
            accumulate(
                monthly.entry(receipt.date.format("%Y-%m").to_string()).or_default(),
                receipt.amount,
                "monthly spend",
            )?;
            accumulate(
                by_category.entry(receipt.category).or_default(),
                receipt.amount,
                "category spend",
            )?;
            accumulate(
                by_vendor.entry(receipt.vendor.clone()).or_default(),
                receipt.amount,
                "vendor spend",
            )?;
            *vendor_counts.entry(receipt.vendor.as_str()).or_default() += 1;
        }

        let average_per_receipt = if receipts.is_empty() {
            None
        } else {
            Some((total_spend / Decimal::from(receipts.len())).round_dp(2))
        };

        // BTreeMap iterates in name order, so the first maximum is the
        // alphabetically smallest among ties.
        let mut top_vendor: Option<(&str, usize)> = None;
        for (vendor, count) in vendor_counts {
            if top_vendor.is_none_or(|(_, best)| count > best) {
                top_vendor = Some((vendor, count));
            }
        }

        Ok(Self {
            receipt_count: receipts.len(),
            total_spend,
            average_per_receipt,
            top_vendor: top_vendor.map(|(vendor, _)| vendor.to_string()),
            monthly,
            by_category,
            by_vendor,
        })
    }
}

fn accumulate(sum: &mut Decimal, amount: Decimal, what: &str) -> Result<()> {
    *sum = sum
        .checked_add(amount)
        .ok_or_else(|| ReceiptError::Overflow(format!("{} exceeds {}", what, Decimal::MAX)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::NewReceipt;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn stored(id: i64, vendor: &str, date: (i32, u32, u32), amount: &str, category: Category) -> StoredReceipt {
        StoredReceipt {
            id,
            vendor: vendor.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount: Decimal::from_str(amount).unwrap(),
            category,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let report = SpendingReport::from_receipts(&[]).unwrap();
        assert_eq!(report.receipt_count, 0);
        assert_eq!(report.total_spend, Decimal::ZERO);
        assert_eq!(report.average_per_receipt, None);
        assert_eq!(report.top_vendor, None);
        assert!(report.monthly.is_empty());
        assert!(report.by_category.is_empty());
        assert!(report.by_vendor.is_empty());
    }

    #[test]
    fn test_aggregates() {
        let receipts = vec![
            stored(1, "Acme Store", (2024, 6, 5), "120.50", Category::Groceries),
            stored(2, "Corner Cafe", (2024, 6, 20), "80.00", Category::FoodAndDrink),
            stored(3, "Acme Store", (2024, 7, 1), "50", Category::Groceries),
        ];

        let report = SpendingReport::from_receipts(&receipts).unwrap();

        assert_eq!(report.receipt_count, 3);
        assert_eq!(report.total_spend, dec("250.50"));
        assert_eq!(report.average_per_receipt, Some(dec("83.50")));
        assert_eq!(report.top_vendor.as_deref(), Some("Acme Store"));
        assert_eq!(
            report.monthly.into_iter().collect::<Vec<_>>(),
            vec![
                ("2024-06".to_string(), dec("200.50")),
                ("2024-07".to_string(), dec("50")),
            ]
        );
        assert_eq!(report.by_category[&Category::Groceries], dec("170.50"));
        assert_eq!(report.by_category[&Category::FoodAndDrink], dec("80.00"));
        assert_eq!(report.by_vendor["Corner Cafe"], dec("80.00"));
    }

    #[test]
    fn test_top_vendor_tie_breaks_alphabetically() {
        let receipts = vec![
            stored(1, "Zephyr Taxi", (2024, 1, 1), "10", Category::Transport),
            stored(2, "Apollo Pharmacy", (2024, 1, 2), "20", Category::Pharmacy),
        ];
        let report = SpendingReport::from_receipts(&receipts).unwrap();
        assert_eq!(report.top_vendor.as_deref(), Some("Apollo Pharmacy"));
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let receipts = vec![
            stored(1, "Big Spender", (2024, 1, 1), "1", Category::Others),
            stored(2, "Big Spender", (2024, 1, 2), "1", Category::Others),
        ]
        .into_iter()
        .map(|r| StoredReceipt {
            amount: Decimal::MAX,
            ..r
        })
        .collect::<Vec<_>>();

        let err = SpendingReport::from_receipts(&receipts).unwrap_err();
        assert!(matches!(err, ReceiptError::Overflow(_)));
        assert!(err.to_string().starts_with("spending total overflowed: total spend"));
    }

    #[test]
    fn test_from_store() {
        let store = ReceiptStore::open_in_memory().unwrap();
        store
            .add_receipt(&NewReceipt {
                vendor: "Metro Cab".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
                amount: dec("250"),
                category: Category::Transport,
            })
            .unwrap();

        let report = SpendingReport::from_store(&store).unwrap();
        assert_eq!(report.receipt_count, 1);
        assert_eq!(report.by_category[&Category::Transport], dec("250"));
    }
}
