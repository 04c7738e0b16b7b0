//! URL templates and destination paths.
//!
//! A photo's URL comes from a template such as
//! `/photos/:year-:month-:day-:title.jpg`. Each `:token` is replaced with a
//! value derived from the photo, then the result is normalized (single
//! slashes, leading slash) and percent-escaped. The destination path on disk
//! is the percent-*decoded* URL under the output directory.
//!
//! | Token | Value for 2011-06-01, `bay-to-breakers` |
//! |-------|------------------------------------------|
//! | `:year` | `2011` |
//! | `:month` | `06` |
//! | `:day` | `01` |
//! | `:i_month` | `6` |
//! | `:i_day` | `1` |
//! | `:short_year` | `11` |
//! | `:y_day` | `152` |
//! | `:title` | `bay-to-breakers` |
//! | `:categories` | categories joined with `/` |

use chrono::{Datelike, NaiveDate};
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z_]+)").expect("token pattern is valid"));

/// Characters escaped in URL paths: everything but unreserved, sub-delims,
/// `:`, `@` and `/`.
const PATH_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@')
    .remove(b'/');

/// Characters escaped in explicit permalinks: controls, space, quotes, angle
/// brackets, backtick and braces.
const PERMALINK_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Build the URL template for a photo published under `dir` with `ext`.
///
/// `template("/photos", ".jpg")` → `/photos/:year-:month-:day-:title.jpg`
pub fn template(dir: &str, ext: &str) -> String {
    format!("{}/:year-:month-:day-:title{}", dir.trim_end_matches('/'), ext)
}

/// Values substituted into a URL template.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    pub date: NaiveDate,
    pub title: &'a str,
    pub categories: &'a [String],
}

impl Placeholders<'_> {
    /// Value for a token name (without the colon), `None` if unknown.
    fn value(&self, token: &str) -> Option<String> {
        let date = self.date;
        Some(match token {
            "year" => format!("{:04}", date.year()),
            "month" => format!("{:02}", date.month()),
            "day" => format!("{:02}", date.day()),
            "i_month" => date.month().to_string(),
            "i_day" => date.day().to_string(),
            "short_year" => format!("{:02}", date.year().rem_euclid(100)),
            "y_day" => format!("{:03}", date.ordinal()),
            "title" => self.title.to_string(),
            "categories" => self.categories.join("/"),
            _ => return None,
        })
    }
}

/// Fill `template` with `placeholders` and normalize the result into a URL.
///
/// Substitution is a single pass, so values are never re-expanded. Unknown
/// tokens are left in place.
pub fn url_from_template(template: &str, placeholders: &Placeholders<'_>) -> String {
    let filled = TOKEN.replace_all(template, |caps: &Captures<'_>| {
        placeholders
            .value(&caps[1])
            .unwrap_or_else(|| caps[0].to_string())
    });
    escape_path(&sanitize(&filled))
}

/// Collapse repeated slashes, drop `.` and `..` segments, and make sure the
/// URL starts with a slash. A trailing slash is kept.
pub fn sanitize(url: &str) -> String {
    let segments: Vec<&str> = url.split('/').filter(|s| is_path_segment(s)).collect();
    let mut out = format!("/{}", segments.join("/"));
    if url.ends_with('/') && !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// Whether a URL segment may become a path component: not empty and not made
/// of dots only.
fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.chars().all(|c| c == '.')
}

/// Percent-escape everything outside the path-safe character set.
pub fn escape_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ESCAPE).to_string()
}

/// Escape an explicit permalink for use in markup and templates.
///
/// Only characters that cannot appear literally in a URL are touched; `%` is
/// left alone, so an already-escaped permalink is not escaped twice.
pub fn escape_permalink(url: &str) -> String {
    utf8_percent_encode(url, PERMALINK_ESCAPE).to_string()
}

/// Reverse [`escape_path`]. Invalid UTF-8 sequences are replaced.
pub fn unescape_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Path on disk a URL is written to under `dest`.
///
/// URLs ending in `/` are directory-style and get an `index.html`. Dot
/// segments are dropped after decoding, so the path never leaves `dest`.
pub fn destination(dest: &Path, url: &str) -> PathBuf {
    let decoded = unescape_path(url);
    let mut path = dest.to_path_buf();
    for segment in decoded.split('/').filter(|s| is_path_segment(s)) {
        path.push(segment);
    }
    if decoded.ends_with('/') {
        path.push("index.html");
    }
    path
}
