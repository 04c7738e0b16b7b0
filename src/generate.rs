//! Photo generation.
//!
//! [`PhotoDump`] turns every photo in the site's photos directory into a post:
//!
//! ```text
//! for each _photos/*.jpg, by name:
//!     build Photo   (date, slug, ext from the filename; sidecar front matter)
//!     render        (content + layout against the site payload)
//!     write         (byte copy to {dest}/photos/YYYY-MM-DD-slug.jpg)
//!     append to site.posts
//! ```
//!
//! Discovery is not recursive and only looks at the configured extensions.
//! Files whose names do not follow `YYYY-MM-DD-slug.ext` have no URL to be
//! published at; they are skipped with a warning and recorded in
//! [`Site::skipped`] unless their sidecar sets a `permalink`.

use crate::config::SiteConfig;
use crate::photo::{Photo, PhotoError};
use crate::site::{Site, SiteError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Something that adds pages to a site during a build.
pub trait Generator {
    fn generate(&self, site: &mut Site) -> Result<(), SiteError>;
}

/// Publishes the photos directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhotoDump;

impl Generator for PhotoDump {
    fn generate(&self, site: &mut Site) -> Result<(), SiteError> {
        for path in discover(&site.photos_dir(), &site.config)? {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            match write_photo(&name, site) {
                Ok(photo) => site.posts.push(photo),
                Err(SiteError::Photo(PhotoError::Unparsed(name))) => {
                    tracing::warn!(file = %name, "skipping photo: name is not YYYY-MM-DD-slug.ext");
                    site.skipped
                        .push((name, "name is not YYYY-MM-DD-slug.ext".to_string()));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Build, render and write one photo.
pub fn write_photo(name: &str, site: &Site) -> Result<Photo, SiteError> {
    let mut photo = Photo::new(&site.source, &site.config.photos.dir, name, &site.config.photos)?;
    // Surface an unusable name before rendering against the payload.
    photo.url()?;
    photo.render(&site.layouts, &site.site_payload())?;
    let written = photo.write(&site.dest)?;
    tracing::debug!(photo = %photo, dest = %written.display(), "wrote photo");
    Ok(photo)
}

/// Photo files directly inside `dir`, sorted by name.
///
/// Hidden files and files with other extensions are ignored. A missing
/// directory has no photos.
pub fn discover(dir: &Path, config: &SiteConfig) -> Result<Vec<PathBuf>, SiteError> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "no photos directory");
        return Ok(Vec::new());
    }
    let mut photos = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_photo = path
            .extension()
            .map(|e| config.is_photo_extension(&e.to_string_lossy()))
            .unwrap_or(false);
        if !hidden && is_photo {
            photos.push(path.to_path_buf());
        }
    }
    Ok(photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn discover_finds_jpgs_sorted() {
        let tmp = setup_site();
        let found = discover(&tmp.path().join("_photos"), &SiteConfig::default()).unwrap();
        assert_eq!(
            names(&found),
            vec![
                "2010-12-24-golden-gate.jpg",
                "2011-06-01-bay-to-breakers.jpg",
                "2012-02-29-fog.jpg",
                "holiday.jpg",
            ]
        );
    }

    #[test]
    fn discover_respects_configured_extensions() {
        let tmp = setup_site();
        write_photo_file(tmp.path(), "2013-01-01-chart.png", b"png");
        let mut config = SiteConfig::default();
        config.photos.extensions = vec!["png".to_string()];
        let found = discover(&tmp.path().join("_photos"), &config).unwrap();
        assert_eq!(names(&found), vec!["2013-01-01-chart.png"]);
    }

    #[test]
    fn discover_is_not_recursive_and_skips_hidden() {
        let tmp = setup_site();
        write_photo_file(tmp.path(), "nested/2013-01-01-deep.jpg", SAMPLE_JPEG);
        write_photo_file(tmp.path(), ".2013-01-01-hidden.jpg", SAMPLE_JPEG);
        let found = discover(&tmp.path().join("_photos"), &SiteConfig::default()).unwrap();
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn discover_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let found = discover(&tmp.path().join("_photos"), &SiteConfig::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn generate_writes_and_registers_photos() {
        let tmp = setup_site();
        let mut site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
        PhotoDump.generate(&mut site).unwrap();

        assert_eq!(site.posts.len(), 3);
        let copy = tmp.path().join("_site/photos/2011-06-01-bay-to-breakers.jpg");
        assert_eq!(fs::read(copy).unwrap(), SAMPLE_JPEG);

        let photo = find_post(&site, "bay-to-breakers");
        assert_eq!(
            photo.output.as_deref(),
            Some("<img src=\"/photos/2011-06-01-bay-to-breakers.jpg\" />\n")
        );
    }

    #[test]
    fn generate_skips_unparsed_names() {
        let tmp = setup_site();
        let mut site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
        PhotoDump.generate(&mut site).unwrap();

        assert_eq!(site.skipped.len(), 1);
        assert_eq!(site.skipped[0].0, "holiday.jpg");
        assert!(!tmp.path().join("_site/photos/holiday.jpg").exists());
    }

    #[test]
    fn generate_publishes_unparsed_name_with_permalink() {
        let tmp = setup_site();
        write_sidecar(tmp.path(), "holiday.toml", "permalink = \"/photos/holiday.jpg\"\n");
        let mut site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
        PhotoDump.generate(&mut site).unwrap();

        assert!(site.skipped.is_empty());
        assert!(tmp.path().join("_site/photos/holiday.jpg").exists());
    }

    #[test]
    fn generate_twice_gives_identical_output() {
        let tmp = setup_site();
        let copy = tmp.path().join("_site/photos/2012-02-29-fog.jpg");

        let mut site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
        PhotoDump.generate(&mut site).unwrap();
        let first = fs::read(&copy).unwrap();

        let mut site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
        PhotoDump.generate(&mut site).unwrap();
        assert_eq!(fs::read(&copy).unwrap(), first);
    }

    #[test]
    fn write_photo_renders_with_layout() {
        let tmp = setup_site();
        write_layout(tmp.path(), "photo.html", "<figure>{{ content }}</figure>");
        let site = Site::new(tmp.path(), SiteConfig::default()).unwrap();
        let photo = write_photo("2012-02-29-fog.jpg", &site).unwrap();
        assert_eq!(
            photo.output.as_deref(),
            Some("<figure><img src=\"/photos/2012-02-29-fog.jpg\" />\n</figure>")
        );
    }
}
