//! Filename parsing for the `YYYY-MM-DD-slug.ext` convention.
//!
//! Every photo carries its publication date and slug in its filename, the same
//! way blog posts do:
//!
//! ```text
//! 2011-06-01-bay-to-breakers.jpg
//! └───┬────┘ └──────┬──────┘└┬─┘
//!    date         slug      ext
//! ```
//!
//! Leading directories are ignored, so `_photos/2011-06-01-x.jpg` parses the
//! same as `2011-06-01-x.jpg`. Names that do not match are not an error here;
//! callers get `None` and decide what to do.
//!
//! ## Display Titles
//!
//! A photo without an explicit title is titled from its slug: dashes become
//! spaces and each word is capitalized (`bay-to-breakers` → "Bay To Breakers").

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static PHOTO_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+/)*(\d+-\d+-\d+)-(.*)(\.[^.]+)$").expect("photo name pattern is valid")
});

/// Result of parsing a photo filename like `2011-06-01-bay-to-breakers.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoName {
    pub date: NaiveDate,
    /// Everything between the date and the extension, dashes preserved.
    pub slug: String,
    /// Extension including its leading dot (`.jpg`).
    pub ext: String,
}

/// Whether `name` follows the `YYYY-MM-DD-slug.ext` convention.
pub fn is_valid(name: &str) -> bool {
    parse_photo_name(name).is_some()
}

/// Parse a photo filename.
///
/// - `"2011-06-01-bay-to-breakers.jpg"` → 2011-06-01, `bay-to-breakers`, `.jpg`
/// - `"_photos/2011-06-01-bay.jpg"` → 2011-06-01, `bay`, `.jpg`
/// - `"2011-06-01-archive.tar.gz"` → slug `archive.tar`, ext `.gz`
/// - `"bay-to-breakers.jpg"` → `None` (no date)
/// - `"2011-13-45-nope.jpg"` → `None` (not a calendar date)
pub fn parse_photo_name(name: &str) -> Option<PhotoName> {
    let caps = PHOTO_NAME.captures(name)?;
    let date = NaiveDate::parse_from_str(&caps[2], "%Y-%m-%d").ok()?;
    Some(PhotoName {
        date,
        slug: caps[3].to_string(),
        ext: caps[4].to_string(),
    })
}

/// Title a slug: split on dashes, capitalize each word, join with spaces.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
