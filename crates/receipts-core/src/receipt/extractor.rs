//! Entry adapters: image, PDF and plain text all funnel into one parser.

use std::fmt;

use tracing::warn;

use crate::models::config::AppConfig;
use crate::models::receipt::ExtractedRecord;
use crate::ocr::OcrBackend;
use crate::pdf;

use super::parser::{HeuristicReceiptParser, ReceiptParser};

/// Receipt extractor with one adapter per input source.
///
/// Collaborator failures (undecodable image, OCR error, malformed PDF) are
/// logged and reported as `None`, never as a panic or error. A parse that
/// finds nothing is still a record, filled with defaults.
pub struct ReceiptExtractor {
    parser: HeuristicReceiptParser,
    ocr: Option<Box<dyn OcrBackend>>,
}

impl ReceiptExtractor {
    /// Create an extractor without an OCR engine.
    pub fn new(parser: HeuristicReceiptParser) -> Self {
        Self { parser, ocr: None }
    }

    /// Attach an OCR engine used by [`Self::extract_from_image`].
    pub fn with_ocr(mut self, ocr: impl OcrBackend + 'static) -> Self {
        self.ocr = Some(Box::new(ocr));
        self
    }

    /// Build an extractor from configuration.
    ///
    /// The OCR engine is loaded only when the model files exist; without it,
    /// image uploads yield no data.
    pub fn from_config(config: &AppConfig) -> Self {
        let parser = HeuristicReceiptParser::new().with_date_order(config.extraction.date_order);
        let extractor = Self::new(parser);

        #[cfg(feature = "ocr")]
        {
            if config.has_ocr_models() {
                match crate::ocr::PureOcrEngine::from_config(&config.ocr) {
                    Ok(engine) => return extractor.with_ocr(engine),
                    Err(e) => warn!("OCR engine unavailable: {}", e),
                }
            } else {
                tracing::debug!(
                    "OCR models not found in {}, image extraction disabled",
                    config.ocr.model_dir.display()
                );
            }
        }

        extractor
    }

    /// Whether an OCR engine is attached.
    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Decode an image, run OCR and parse the recognized text.
    pub fn extract_from_image(&self, image_bytes: &[u8]) -> Option<ExtractedRecord> {
        let Some(ocr) = self.ocr.as_deref() else {
            warn!("Image extraction error: no OCR engine configured");
            return None;
        };

        let image = match image::load_from_memory(image_bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("Image extraction error: {}", e);
                return None;
            }
        };

        match ocr.extract_text(&image) {
            Ok(text) => Some(self.parser.parse(&text)),
            Err(e) => {
                warn!("Image extraction error: {}", e);
                None
            }
        }
    }

    /// Read the text layer of a PDF and parse it.
    pub fn extract_from_pdf(&self, pdf_bytes: &[u8]) -> Option<ExtractedRecord> {
        match pdf::extract_text_from_bytes(pdf_bytes) {
            Ok(text) => Some(self.parser.parse(&text)),
            Err(e) => {
                warn!("PDF extraction error: {}", e);
                None
            }
        }
    }

    /// Parse already-decoded text.
    pub fn extract_from_text(&self, text: &str) -> ExtractedRecord {
        self.parser.parse(text)
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new(HeuristicReceiptParser::new())
    }
}

impl fmt::Debug for ReceiptExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptExtractor")
            .field("parser", &self.parser)
            .field("ocr", &self.ocr.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::models::receipt::Category;
    use crate::ocr::OcrResult;
    use chrono::NaiveDate;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::str::FromStr;

    /// OCR stand-in returning canned text.
    struct CannedOcr(Result<String, String>);

    impl OcrBackend for CannedOcr {
        fn process(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
            match &self.0 {
                Ok(text) => Ok(OcrResult {
                    boxes: Vec::new(),
                    text: text.clone(),
                    processing_time_ms: 0,
                    image_size: (image.width(), image.height()),
                }),
                Err(msg) => Err(OcrError::Recognition(msg.clone())),
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(8, 8, Rgba([255u8, 255, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_text_adapter() {
        let record = ReceiptExtractor::default()
            .extract_from_text("Corner Cafe\n12/01/2024\nTotal $8.50");
        assert_eq!(record.vendor, "Corner Cafe");
        assert_eq!(record.amount, Decimal::from_str("8.50").unwrap());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 12));
        assert_eq!(record.category, Category::FoodAndDrink);
    }

    #[test]
    fn test_image_adapter_uses_ocr_text() {
        let extractor = ReceiptExtractor::default()
            .with_ocr(CannedOcr(Ok("City Pharmacy\nTotal 45.00".to_string())));

        let record = extractor.extract_from_image(&png_bytes()).unwrap();
        assert_eq!(record.vendor, "City Pharmacy");
        assert_eq!(record.amount, Decimal::from_str("45.00").unwrap());
        assert_eq!(record.category, Category::Pharmacy);
    }

    #[test]
    fn test_image_adapter_blank_ocr_text_still_parses() {
        let extractor = ReceiptExtractor::default().with_ocr(CannedOcr(Ok(String::new())));
        assert_eq!(
            extractor.extract_from_image(&png_bytes()),
            Some(ExtractedRecord::default())
        );
    }

    #[test]
    fn test_image_adapter_swallows_ocr_failure() {
        let extractor =
            ReceiptExtractor::default().with_ocr(CannedOcr(Err("model crashed".to_string())));
        assert_eq!(extractor.extract_from_image(&png_bytes()), None);
    }

    #[test]
    fn test_image_adapter_swallows_decode_failure() {
        let extractor = ReceiptExtractor::default().with_ocr(CannedOcr(Ok("x".to_string())));
        assert_eq!(extractor.extract_from_image(b"not an image"), None);
    }

    #[test]
    fn test_image_adapter_without_engine() {
        let extractor = ReceiptExtractor::default();
        assert!(!extractor.has_ocr());
        assert_eq!(extractor.extract_from_image(&png_bytes()), None);
    }

    #[test]
    fn test_pdf_adapter_swallows_malformed_pdf() {
        let extractor = ReceiptExtractor::default();
        assert_eq!(extractor.extract_from_pdf(b"%PDF-1.4 truncated"), None);
        assert_eq!(extractor.extract_from_pdf(&[]), None);
    }

    #[test]
    fn test_pdf_adapter_swallows_text_layer_failure() {
        let pdf = crate::pdf::single_page_pdf(Some("BT /F1 12 Tf 72 712 Td (Acme Store) Tj ET"));
        assert_eq!(ReceiptExtractor::default().extract_from_pdf(&pdf), None);
    }

    #[test]
    fn test_from_config_without_models() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.ocr.model_dir = dir.path().to_path_buf();

        let extractor = ReceiptExtractor::from_config(&config);
        assert!(!extractor.has_ocr());
    }
}
