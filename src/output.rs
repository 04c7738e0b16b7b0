//! CLI output formatting.
//!
//! Output is information-first: each photo leads with its positional index
//! and title, with the source file and published URL as indented context.
//!
//! ## Build
//!
//! ```text
//! Photos
//! 001 Golden Gate
//!     Source: 2010-12-24-golden-gate.jpg
//!     URL: /photos/2010-12-24-golden-gate.jpg
//! 002 Bay To Breakers
//!     Source: 2011-06-01-bay-to-breakers.jpg
//!     URL: /photos/2011-06-01-bay-to-breakers.jpg
//!
//! Skipped
//!     holiday.jpg: name is not YYYY-MM-DD-slug.ext
//!
//! Index → _site/photos/index.html
//! Published 2 photos
//! ```
//!
//! ## Check
//!
//! Same photo listing, with invalid names collected under `Invalid`.
//!
//! Each command has a `format_*` function returning lines (pure, tested) and
//! a `print_*` wrapper that writes them to stdout.

use crate::photo::Photo;
use crate::site::{BuildReport, Site};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn photo_lines(index: usize, photo: &Photo) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", format_index(index), photo.title()),
        format!("    Source: {}", photo.name()),
    ];
    if let Ok(url) = photo.url() {
        lines.push(format!("    URL: {}", url));
    }
    lines
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format the result of a build.
pub fn format_build_output(site: &Site, report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Photos".to_string()];
    for (i, photo) in site.posts.iter().enumerate() {
        lines.extend(photo_lines(i + 1, photo));
    }

    if !site.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for (name, reason) in &site.skipped {
            lines.push(format!("    {}: {}", name, reason));
        }
    }

    lines.push(String::new());
    if !report.pages.is_empty() {
        lines.push(format!("Pages: {}", report.pages.len()));
    }
    if let Some(index) = &report.index {
        lines.push(format!("Index → {}", relative(index, &site.dest)));
    }
    let n = site.posts.len();
    lines.push(format!("Published {} photo{}", n, plural(n)));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(site: &Site, report: &BuildReport) {
    for line in format_build_output(site, report) {
        println!("{}", line);
    }
}

/// Format the result of checking discovered photos without writing.
pub fn format_check_output(photos: &[Photo]) -> Vec<String> {
    let (valid, invalid): (Vec<&Photo>, Vec<&Photo>) =
        photos.iter().partition(|p| p.url().is_ok());

    let mut lines = vec!["Photos".to_string()];
    for (i, photo) in valid.iter().enumerate() {
        lines.extend(photo_lines(i + 1, photo));
    }
    if !invalid.is_empty() {
        lines.push(String::new());
        lines.push("Invalid".to_string());
        for photo in &invalid {
            lines.push(format!("    {} (expected YYYY-MM-DD-slug.ext)", photo.name()));
        }
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(photos: &[Photo]) {
    for line in format_check_output(photos) {
        println!("{}", line);
    }
}

/// `path` relative to `base` when it lies inside it, for shorter output.
fn relative(path: &Path, base: &Path) -> String {
    let shown = match (base.parent(), path.strip_prefix(base)) {
        (Some(parent), Ok(_)) => path.strip_prefix(parent).unwrap_or(path),
        _ => path,
    };
    shown.display().to_string()
}
