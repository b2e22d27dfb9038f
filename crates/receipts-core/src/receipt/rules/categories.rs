//! Keyword-based category assignment.

use super::{ExtractionMatch, FieldExtractor, ReceiptText};
use crate::models::receipt::Category;

/// Version of [`CATEGORY_KEYWORDS`]. Bump whenever the table changes.
pub const CATEGORY_TABLE_VERSION: u32 = 1;

/// Category keywords in priority order.
///
/// The first category with any keyword found in the text wins, regardless of
/// where in the text the keyword appears. Entries are only ever appended.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Groceries,
        &[
            "grocery", "supermart", "supermarket", "mart", "store", "bazaar", "provision",
            "kirana", "vegetable", "fruit", "ration",
        ],
    ),
    (
        Category::Electronics,
        &[
            "laptop", "electronics", "mobile", "tv", "charger", "usb", "mouse", "headphones",
            "earbuds", "tablet", "smartwatch", "battery", "device",
        ],
    ),
    (
        Category::FoodAndDrink,
        &[
            "cafe", "coffee", "restaurant", "burger", "food", "tea", "snacks", "meal", "pizza",
            "pasta", "sandwich", "noodles", "biryani", "chai", "lunch", "dinner", "zomato",
            "swiggy",
        ],
    ),
    (
        Category::Clothing,
        &[
            "shirt", "dress", "jeans", "apparel", "wear", "fashion", "boutique", "kurta",
            "saree", "salwar", "lehenga", "ethnic", "pants", "clothes", "garments",
        ],
    ),
    (
        Category::Pharmacy,
        &[
            "pharmacy", "medicine", "chemist", "drug", "tablet", "capsule", "clinic", "doctor",
            "prescription", "hospital", "meds",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie", "book", "game", "cinema", "netflix", "ticket", "concert", "event",
            "theatre", "show", "pvr", "inox",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electricity", "water", "gas", "internet", "bill", "postpaid", "recharge",
            "broadband", "wifi", "mobile bill", "data plan", "airtel", "jio", "bsnl",
        ],
    ),
    (
        Category::HomeAndKitchen,
        &[
            "furniture", "kitchen", "bed", "sofa", "utensils", "cooker", "mixer", "home",
            "interior", "decor", "vase", "light", "bulb",
        ],
    ),
    (
        Category::Transport,
        &[
            "uber", "ola", "fuel", "petrol", "diesel", "bus", "cab", "auto", "ride", "metro",
            "train", "taxi",
        ],
    ),
    (
        Category::Others,
        &["misc", "unknown", "general", "service", "repair", "custom", "charges"],
    ),
];

/// Category extractor over the whole raw text.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryExtractor;

impl CategoryExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for CategoryExtractor {
    type Output = Category;

    fn extract(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<Category>> {
        let lowered = text.raw().to_lowercase();

        CATEGORY_KEYWORDS.iter().find_map(|(category, keywords)| {
            keywords
                .iter()
                .find(|kw| lowered.contains(*kw))
                .map(|kw| ExtractionMatch::new(*category, *kw))
        })
    }
}

/// Categorize raw text, falling back to [`Category::Uncategorized`].
pub fn categorize(text: &str) -> Category {
    CategoryExtractor::new()
        .extract(&ReceiptText::new(text))
        .map(|m| m.value)
        .unwrap_or(Category::Uncategorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_version_and_order() {
        assert_eq!(CATEGORY_TABLE_VERSION, 1);

        let order: Vec<Category> = CATEGORY_KEYWORDS.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
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
            ]
        );
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for (_, keywords) in CATEGORY_KEYWORDS {
            for kw in *keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }

    #[test]
    fn test_priority_order_beats_text_position() {
        // "shirt" appears first in the text but Food & Drink ranks above Clothing.
        assert_eq!(categorize("Cotton shirt\nChicken Biryani"), Category::FoodAndDrink);
        assert_eq!(categorize("Chicken BIRYANI\nCotton shirt"), Category::FoodAndDrink);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(categorize("CITY PHARMACY"), Category::Pharmacy);
        assert_eq!(categorize("Reliance Fresh SUPERMARKET"), Category::Groceries);
        assert_eq!(categorize("Trip via Uber"), Category::Transport);
    }

    #[test]
    fn test_shared_keyword_resolves_to_earlier_category() {
        // "tablet" is listed under Electronics and Pharmacy.
        assert_eq!(categorize("Paracetamol tablet"), Category::Electronics);
    }

    #[test]
    fn test_matched_keyword_reported() {
        let found = CategoryExtractor::new()
            .extract(&ReceiptText::new("Madras Coffee House"))
            .unwrap();
        assert_eq!(found.value, Category::FoodAndDrink);
        assert_eq!(found.source, "coffee");
    }

    #[test]
    fn test_uncategorized() {
        assert_eq!(categorize("Zzz Co\n42"), Category::Uncategorized);
        assert_eq!(categorize(""), Category::Uncategorized);
    }
}
