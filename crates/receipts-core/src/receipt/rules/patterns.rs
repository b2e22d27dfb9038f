//! Regex patterns shared by the receipt field extractors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Optional currency symbol, then 120 / 1,234 / 1,234.56. Group 1 is the
    // symbol, group 2 the number.
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(₹|\$)?\s?([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)"
    ).unwrap();

    // 05/06/2024, 2024-06-05, 5-6-24. Both separators must agree.
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b[0-9]{1,4}-[0-9]{1,2}-[0-9]{1,4}\b|\b[0-9]{1,4}/[0-9]{1,2}/[0-9]{1,4}\b"
    ).unwrap();
}
