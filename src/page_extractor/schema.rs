use serde::{Deserialize, Serialize};

/// Content image discovered on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Absolute image URL
    pub url: String,
    /// Alt text, empty when absent
    #[serde(default)]
    pub alt: String,
    /// 1 when the class attribute matches the content-image vocabulary, else 0
    pub priority: u8,
}

/// Output of the HTML extractor for a single document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
    pub images: Vec<ImageRef>,
}

/// A successfully fetched and extracted page
///
/// Immutable once appended to a crawl result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    /// Document title, or the URL when the document has none
    pub title: String,
    /// Plain text, never empty
    pub text: String,
    /// Highest priority first
    pub images: Vec<ImageRef>,
    pub depth: u8,
}

impl PageRecord {
    /// Build a record from extractor output, falling back to the URL for the title
    #[must_use]
    pub fn from_extracted(url: impl Into<String>, depth: u8, extracted: ExtractedPage) -> Self {
        let url = url.into();
        let title = if extracted.title.trim().is_empty() {
            url.clone()
        } else {
            extracted.title
        };
        Self {
            url,
            title,
            text: extracted.text,
            images: extracted.images,
            depth,
        }
    }
}
