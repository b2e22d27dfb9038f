//! Date extraction for receipts.

use chrono::NaiveDate;
use tracing::trace;

use super::patterns::DATE_TOKEN;
use super::{ExtractionMatch, FieldExtractor, ReceiptText};
use crate::models::config::DateOrder;

/// Date field extractor.
///
/// Dates are printed near the top of a receipt, so lines are scanned from the
/// first one down. Only the first date-like token of each line is tried; a
/// token that is not a valid calendar date moves the scan to the next line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateExtractor {
    order: DateOrder,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpretation of ambiguous day/month tokens.
    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<NaiveDate>> {
        for (idx, line) in text.lines().iter().enumerate() {
            let Some(token) = DATE_TOKEN.find(line) else {
                continue;
            };

            if let Some(date) = resolve_date(token.as_str(), self.order) {
                return Some(ExtractionMatch::new(date, token.as_str()).with_line(idx));
            }
            trace!("Date token {:?} on line {} did not resolve", token.as_str(), idx);
        }

        None
    }
}

/// Resolve a numeric date token such as `05/06/2024` or `2024-06-05`.
///
/// A leading part of three or more digits is read as year-month-day.
/// Otherwise `order` decides between day-month-year and month-day-year.
/// Out-of-range values yield `None`; day and month are never swapped to
/// rescue an invalid date.
pub fn resolve_date(token: &str, order: DateOrder) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split(['-', '/']).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };

    let (year, month, day) = if first.len() >= 3 {
        (parse_year(first)?, second.parse().ok()?, third.parse().ok()?)
    } else {
        match order {
            DateOrder::DayFirst => (parse_year(third)?, second.parse().ok()?, first.parse().ok()?),
            DateOrder::MonthFirst => (parse_year(third)?, first.parse().ok()?, second.parse().ok()?),
        }
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        // Two-digit year: 00-68 is 2000s, 69-99 is 1900s
        if year <= 68 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        // There is no year zero.
        (year >= 1).then_some(year)
    }
}
