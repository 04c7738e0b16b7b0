//! The site a generator publishes into.
//!
//! [`Site`] is the small host the photo generator plugs into: it owns the
//! configuration, the loaded layouts, the destination directory, and the post
//! collection every generated photo is appended to. It also builds the
//! payload templates render against:
//!
//! ```text
//! {
//!   "site": { "title": ..., "time": ..., "posts": [page, page, ...] },
//!   "page": { ...the page being rendered... }
//! }
//! ```
//!
//! [`Site::process`] runs one build: generators first, then post ordering and
//! previous/next linking, then the optional per-photo pages and the listing.

use crate::config::{ConfigError, SiteConfig};
use crate::generate::Generator;
use crate::index;
use crate::layout::{LayoutError, Layouts};
use crate::permalink;
use crate::photo::{Photo, PhotoError};
use chrono::{DateTime, Local};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not read photos directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Photo error: {0}")]
    Photo(#[from] PhotoError),
}

/// What a build wrote, for reporting.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Photo pages written with `photos.write_pages`.
    pub pages: Vec<PathBuf>,
    /// The listing page, when enabled.
    pub index: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    /// Source root; photo and layout directories resolve against it.
    pub source: PathBuf,
    /// Output root.
    pub dest: PathBuf,
    pub layouts: Layouts,
    /// Every generated photo, in date order after [`Site::process`].
    pub posts: Vec<Photo>,
    /// Files that were found but not published, with the reason.
    pub skipped: Vec<(String, String)>,
    /// Build start time, exposed as `site.time`.
    pub time: DateTime<Local>,
}

impl Site {
    /// Set up a site rooted at `source`, loading its layouts.
    ///
    /// The destination is `config.destination` resolved against `source`.
    pub fn new(source: &Path, config: SiteConfig) -> Result<Self, SiteError> {
        let layouts = Layouts::load(&source.join(&config.layouts_dir))?;
        let dest = source.join(&config.destination);
        Ok(Self {
            config,
            source: source.to_path_buf(),
            dest,
            layouts,
            posts: Vec::new(),
            skipped: Vec::new(),
            time: Local::now(),
        })
    }

    /// Override the output root.
    pub fn with_destination(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = dest.into();
        self
    }

    /// Directory photos are discovered in.
    pub fn photos_dir(&self) -> PathBuf {
        self.source.join(&self.config.photos.dir)
    }

    /// Template payload describing the whole site.
    pub fn site_payload(&self) -> Value {
        let posts: Vec<Value> = self.posts.iter().map(Photo::to_context).collect();
        json!({
            "site": {
                "title": self.config.title,
                "time": self.time.to_rfc3339(),
                "posts": posts,
            }
        })
    }

    /// Run a full build.
    pub fn process(&mut self, generators: &[&dyn Generator]) -> Result<BuildReport, SiteError> {
        for generator in generators {
            generator.generate(self)?;
        }
        self.link_posts();

        let mut report = BuildReport::default();
        if self.config.photos.write_pages {
            report.pages = self.write_pages()?;
        }
        if self.config.index.enabled {
            report.index = Some(self.write_index()?);
        }
        Ok(report)
    }

    /// Sort posts by date (then slug) and point each at its neighbors.
    pub fn link_posts(&mut self) {
        self.posts
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.slug.cmp(&b.slug)));
        let neighbors: Vec<_> = self.posts.iter().map(Photo::neighbor).collect();
        for (i, post) in self.posts.iter_mut().enumerate() {
            post.previous = i.checked_sub(1).and_then(|p| neighbors[p].clone());
            post.next = neighbors.get(i + 1).cloned().flatten();
        }
    }

    /// Render every post again, now that neighbors are linked, and write the
    /// result as a page.
    fn write_pages(&mut self) -> Result<Vec<PathBuf>, SiteError> {
        let payload = self.site_payload();
        let mut written = Vec::with_capacity(self.posts.len());
        for post in &mut self.posts {
            post.render(&self.layouts, &payload)?;
            written.push(post.write_page(&self.dest)?);
        }
        Ok(written)
    }

    /// Write the listing page at `{permalink_dir}/index.html`.
    fn write_index(&self) -> Result<PathBuf, SiteError> {
        let url = format!("{}/", self.config.photos.permalink_dir.trim_end_matches('/'));
        let path = permalink::destination(&self.dest, &url);

        let html = if self.layouts.contains(&self.config.index.layout) {
            let mut payload = self.site_payload();
            if let Some(map) = payload.as_object_mut() {
                map.insert(
                    "page".to_string(),
                    json!({ "title": self.config.index.title, "url": url }),
                );
            }
            self.layouts
                .render(Some(&self.config.index.layout), "", &payload)?
        } else {
            index::render_index(&self.config.index.title, &self.posts).into_string()
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        tracing::debug!(path = %path.display(), "wrote photo index");
        Ok(path)
    }
}
