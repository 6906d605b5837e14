use std::path::Path;
use std::sync::Arc;

use super::ExtractionError;

/// First-page text extraction abstraction (allows mocking for tests).
///
/// Implementations treat the document as untrusted: they may fail, but must
/// not hang indefinitely or leave scratch files behind.
pub trait FirstPageExtractor {
    fn extract_first_page(&self, path: &Path) -> Result<String, ExtractionError>;
}

impl<T: FirstPageExtractor + ?Sized> FirstPageExtractor for &T {
    fn extract_first_page(&self, path: &Path) -> Result<String, ExtractionError> {
        (**self).extract_first_page(path)
    }
}

impl<T: FirstPageExtractor + ?Sized> FirstPageExtractor for Arc<T> {
    fn extract_first_page(&self, path: &Path) -> Result<String, ExtractionError> {
        (**self).extract_first_page(path)
    }
}
