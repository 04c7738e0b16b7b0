//! Shared test utilities for the photo-dump test suite.
//!
//! Builds throwaway site trees in temp directories and looks things up in a
//! generated [`Site`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! let mut site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
//! PhotoDump.generate(&mut site).unwrap();
//!
//! let photo = find_post(&site, "bay-to-breakers");
//! assert_eq!(photo.title(), "Bay To Breakers");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::photo::Photo;
use crate::site::Site;

/// The smallest byte sequence that still starts and ends like a JPEG.
pub const SAMPLE_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

// =========================================================================
// Fixture setup
// =========================================================================

/// A site with three dated photos, one undated photo and one non-photo:
///
/// ```text
/// _photos/
/// ├── 2010-12-24-golden-gate.jpg
/// ├── 2011-06-01-bay-to-breakers.jpg
/// ├── 2012-02-29-fog.jpg
/// ├── holiday.jpg          # no date: skipped
/// └── notes.txt            # not a photo
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in [
        "2011-06-01-bay-to-breakers.jpg",
        "2012-02-29-fog.jpg",
        "2010-12-24-golden-gate.jpg",
        "holiday.jpg",
    ] {
        write_photo_file(tmp.path(), name, SAMPLE_JPEG);
    }
    write_photo_file(tmp.path(), "notes.txt", b"not a photo");
    tmp
}

/// Write `bytes` to `{root}/_photos/{name}`, creating directories.
pub fn write_photo_file(root: &Path, name: &str, bytes: &[u8]) {
    write_file(&root.join("_photos").join(name), bytes);
}

/// Write a sidecar to `{root}/_photos/{name}`.
pub fn write_sidecar(root: &Path, name: &str, toml: &str) {
    write_file(&root.join("_photos").join(name), toml.as_bytes());
}

/// Write a layout to `{root}/_layouts/{name}`.
pub fn write_layout(root: &Path, name: &str, source: &str) {
    write_file(&root.join("_layouts").join(name), source.as_bytes());
}

fn write_file(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

// =========================================================================
// Site lookups (panic with a clear message on miss)
// =========================================================================

/// Find a generated post by slug. Panics if not found.
pub fn find_post<'a>(site: &'a Site, slug: &str) -> &'a Photo {
    site.posts
        .iter()
        .find(|p| p.slug.as_deref() == Some(slug))
        .unwrap_or_else(|| {
            let slugs: Vec<_> = site.posts.iter().map(|p| p.slug.as_deref()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}
