//! Amount extraction for receipts.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::patterns::AMOUNT_PATTERN;
use super::{ExtractionMatch, FieldExtractor, ReceiptText};

/// Amount field extractor.
///
/// Totals are printed at the bottom of a receipt, so lines are scanned from
/// the last one upwards and the first amount-like token wins. There is no
/// "total" keyword anchoring: a trailing quantity line will be picked up too.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<Decimal>> {
        for (idx, line) in text.lines().iter().enumerate().rev() {
            let Some(caps) = AMOUNT_PATTERN.captures(line) else {
                continue;
            };

            match parse_amount(&caps[2]) {
                Some(amount) => {
                    trace!(
                        "Amount {} (symbol {:?}) on line {}",
                        amount,
                        caps.get(1).map(|m| m.as_str()),
                        idx
                    );
                    return Some(ExtractionMatch::new(amount, &caps[0]).with_line(idx));
                }
                None => {
                    trace!("Unparseable amount {:?} on line {}", &caps[2], idx);
                }
            }
        }

        None
    }
}

/// Parse an amount with optional comma thousands separators (e.g. "1,234.56").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(',', "");
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn amount_of(text: &str) -> Option<Decimal> {
        AmountExtractor::new()
            .extract(&ReceiptText::new(text))
            .map(|m| m.value)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("120"), Some(Decimal::from(120)));
        assert_eq!(parse_amount("12,345,678.90"), Some(Decimal::from_str("12345678.90").unwrap()));
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_total_at_bottom_wins() {
        let text = "Acme Store\nItem A  50\nItem B  20\nTotal: ₹120.50";
        assert_eq!(amount_of(text), Some(Decimal::from_str("120.50").unwrap()));
    }

    #[test]
    fn test_dollar_with_thousands() {
        let text = "Best Buy\nSubtotal $1,100.00\nGrand total: $1,234.56";
        assert_eq!(amount_of(text), Some(Decimal::from_str("1234.56").unwrap()));
    }

    #[test]
    fn test_line_index_reported() {
        let text = "Vendor\nTotal 99.00\nThank you!";
        let found = AmountExtractor::new().extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(found.line, Some(1));
        assert_eq!(found.value, Decimal::from_str("99.00").unwrap());
    }

    #[test]
    fn test_trailing_quantity_is_picked_up() {
        // Known imprecision: nothing anchors the match to a total label.
        let text = "Chai Point\nTotal 80.00\n2 cups served";
        assert_eq!(amount_of(text), Some(Decimal::from(2)));
    }

    #[test]
    fn test_ungrouped_long_number_is_truncated() {
        // Without separators only the first three digits form a group.
        assert_eq!(amount_of("Paid 1234.56"), Some(Decimal::from(123)));
    }

    #[test]
    fn test_unparseable_match_falls_back_to_earlier_line() {
        let text = "Vendor\nTotal 99.00\nRef 111,111,111,111,111,111,111,111,111,111,111";
        assert_eq!(amount_of(text), Some(Decimal::from_str("99.00").unwrap()));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(amount_of("Vendor\nThank you for shopping"), None);
        assert_eq!(amount_of(""), None);
    }
}
