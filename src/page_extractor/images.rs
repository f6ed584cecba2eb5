//! Content-image discovery
//!
//! Decorative, tracking and UI images are dropped outright; the rest are
//! ranked so that listing/product/gallery photos come first.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use super::schema::ImageRef;

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("BUG: hardcoded CSS selector 'img' is invalid")
});

/// Attributes holding a single image URL, in lookup order
const DIRECT_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];

/// Attributes holding a responsive candidate list
const SRCSET_ATTRS: &[&str] = &["srcset", "data-srcset"];

/// Images smaller than this on either explicit dimension are decorative
pub const MIN_IMAGE_DIMENSION: u32 = 100;

/// URL fragments of tracking pixels, icons and UI chrome
pub const EXCLUDED_IMAGE_PATTERNS: &[&str] = &[
    "favicon",
    "sprite",
    "pixel",
    "tracking",
    "tracker",
    "spacer",
    "1x1",
    "blank.gif",
    "icon",
    "badge",
    "avatar",
    "emoji",
    "loader",
    "spinner",
    "doubleclick",
    "analytics",
    "facebook.com/tr",
];

/// Class-name vocabulary of content images
pub const CONTENT_IMAGE_CLASSES: &[&str] = &[
    "listing",
    "product",
    "gallery",
    "property",
    "photo",
    "hero",
    "carousel",
    "slide",
    "main-image",
    "feature",
];

/// Split a `srcset` value into `(url, size)` candidates
///
/// Candidates are separated by a comma that ends a descriptor or a
/// whitespace-delimited URL, so commas inside URLs such as
/// `/w_640,h_480/x.jpg` survive. Missing descriptors count as `1x`.
fn srcset_candidates(srcset: &str) -> Vec<(&str, f64)> {
    let mut candidates = Vec::new();
    let mut pending_url: Option<&str> = None;

    for mut token in srcset.split_whitespace() {
        loop {
            match pending_url.take() {
                None => {
                    let url = token.trim_matches(',');
                    if !url.is_empty() {
                        if token.ends_with(',') {
                            candidates.push((url, 1.0));
                        } else {
                            pending_url = Some(url);
                        }
                    }
                    break;
                }
                Some(url) => {
                    let (descriptor, rest) = token.split_once(',').unwrap_or((token, ""));
                    candidates.push((url, descriptor_size(descriptor)));
                    if rest.is_empty() {
                        break;
                    }
                    token = rest;
                }
            }
        }
    }
    if let Some(url) = pending_url {
        candidates.push((url, 1.0));
    }
    candidates
}

/// Width (`640w`) or density (`2x`) descriptor as a plain number
fn descriptor_size(descriptor: &str) -> f64 {
    descriptor
        .trim_end_matches(['w', 'x', 'W', 'X'])
        .parse::<f64>()
        .unwrap_or(1.0)
}

/// Pick the largest candidate of a `srcset` value
///
/// Width and density descriptors are compared numerically as written.
fn largest_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset_candidates(srcset)
        .into_iter()
        .fold(None, |best: Option<(&str, f64)>, (url, size)| match best {
            Some((_, best_size)) if best_size >= size => best,
            _ => Some((url, size)),
        })
        .map(|(url, _)| url)
}

fn raw_source<'a>(img: &ElementRef<'a>) -> Option<&'a str> {
    let element = img.value();
    DIRECT_SOURCE_ATTRS
        .iter()
        .filter_map(|attr| element.attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .or_else(|| {
            SRCSET_ATTRS
                .iter()
                .filter_map(|attr| element.attr(attr))
                .find_map(largest_srcset_candidate)
        })
}

/// Parse a dimension attribute such as `"120"` or `"120px"`
///
/// Percentages say nothing about pixel size and yield `None`.
fn parse_dimension(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    if value.ends_with('%') {
        return None;
    }
    let digits: String = value
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn is_too_small(img: &ElementRef<'_>) -> bool {
    let element = img.value();
    match (
        parse_dimension(element.attr("width")),
        parse_dimension(element.attr("height")),
    ) {
        (Some(w), Some(h)) => w < MIN_IMAGE_DIMENSION || h < MIN_IMAGE_DIMENSION,
        _ => false,
    }
}

/// Whether the resolved URL looks like a tracking pixel, icon or UI asset
#[must_use]
pub fn is_excluded_image_url(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    EXCLUDED_IMAGE_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Priority from the class attribute: 1 for content images, else 0
#[must_use]
pub fn class_priority(class_attr: Option<&str>) -> u8 {
    let Some(class_attr) = class_attr else {
        return 0;
    };
    let lowered = class_attr.to_ascii_lowercase();
    u8::from(CONTENT_IMAGE_CLASSES.iter().any(|c| lowered.contains(c)))
}

/// Collect ranked content images of `document`
pub(crate) fn collect_images(document: &Html, base_url: &Url) -> Vec<ImageRef> {
    let mut seen = HashSet::new();
    let mut images: Vec<ImageRef> = document
        .select(&IMG_SELECTOR)
        .filter_map(|img| {
            let source = raw_source(&img)?;
            if source.starts_with("data:") {
                return None;
            }
            let resolved = base_url.join(source).ok()?;
            if !matches!(resolved.scheme(), "http" | "https") {
                return None;
            }
            if is_too_small(&img) || is_excluded_image_url(resolved.as_str()) {
                return None;
            }
            Some(ImageRef {
                url: resolved.to_string(),
                alt: img.value().attr("alt").unwrap_or_default().trim().to_string(),
                priority: class_priority(img.value().attr("class")),
            })
        })
        .filter(|image| seen.insert(image.url.clone()))
        .collect();

    // sort_by_key is stable: input order survives within a priority tier
    images.sort_by_key(|image| std::cmp::Reverse(image.priority));
    images
}
