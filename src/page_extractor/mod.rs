pub mod extractors;
pub mod images;
pub mod schema;

pub use extractors::{
    extract_links, extract_page, extract_page_and_links, extract_text, extract_title,
};
pub use images::{class_priority, is_excluded_image_url};
pub use schema::{ExtractedPage, ImageRef, PageRecord};
