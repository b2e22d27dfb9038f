//! Receipt field extraction module.

mod extractor;
mod parser;
pub mod rules;

pub use extractor::ReceiptExtractor;
pub use parser::{HeuristicReceiptParser, ReceiptParser};
