pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{netloc, normalize_url, resolve_link};
