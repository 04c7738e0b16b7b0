//! The photo page model.
//!
//! A [`Photo`] is a lightweight post built from one image file. Everything it
//! knows comes from the filename (see [`crate::naming`]) plus an optional
//! sidecar:
//!
//! ```text
//! _photos/
//! ├── 2011-06-01-bay-to-breakers.jpg    # the photo
//! └── 2011-06-01-bay-to-breakers.toml   # optional front matter
//! ```
//!
//! The sidecar is merged into the photo's data the way front matter is merged
//! into a post: it may set `title`, `permalink`, `layout`, `tags`,
//! `categories`, or any key a layout wants to read through `page.*`.
//!
//! A photo's body is a single `<img>` pointing at its own URL, so a layout
//! decides everything else about how the page looks.
//!
//! ## Lifecycle
//!
//! Built once from a file, rendered once against the site payload, written
//! once (a byte-for-byte copy of the image), then kept in the site's post list
//! for listings.

use crate::config::PhotosConfig;
use crate::layout::{LayoutError, Layouts};
use crate::naming::{self, PhotoName};
use crate::permalink::{self, Placeholders};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid sidecar {}: {}", .path.display(), .source)]
    Sidecar {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0} does not match YYYY-MM-DD-slug.ext and has no permalink")]
    Unparsed(String),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("{0} has not been rendered")]
    NotRendered(String),
    #[error("Refusing to overwrite source {} with its own copy", .0.display())]
    SameFile(PathBuf),
}

/// Title and URL of an adjacent photo, for previous/next links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Photo {
    name: String,
    base: PathBuf,
    dir: String,
    /// Front matter: `layout` plus anything the sidecar sets.
    pub data: Map<String, Value>,
    pub date: Option<NaiveDate>,
    pub slug: Option<String>,
    pub ext: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Page body before rendering.
    pub content: String,
    /// Page body after rendering, once [`Photo::render`] has run.
    pub output: Option<String>,
    pub previous: Option<Neighbor>,
    pub next: Option<Neighbor>,
}

impl Photo {
    /// Build a photo from `{source}/{dir}/{name}`.
    ///
    /// A name that does not parse still yields a photo; its date, slug and
    /// extension are `None`. Only a malformed sidecar is an error.
    pub fn new(
        source: &Path,
        dir: &str,
        name: &str,
        config: &PhotosConfig,
    ) -> Result<Self, PhotoError> {
        let mut photo = Self {
            name: name.to_string(),
            base: source.join(dir),
            dir: config.permalink_dir.clone(),
            data: Map::from_iter([("layout".to_string(), json!(config.layout))]),
            date: None,
            slug: None,
            ext: None,
            categories: Vec::new(),
            tags: Vec::new(),
            content: String::new(),
            output: None,
            previous: None,
            next: None,
        };
        photo.process(name);
        photo.read_sidecar()?;
        if let Ok(id) = photo.id() {
            photo.content = format!("<img src=\"{id}\" />\n");
        }
        Ok(photo)
    }

    /// Fill date, slug and extension from the filename.
    fn process(&mut self, name: &str) {
        if let Some(PhotoName { date, slug, ext }) = naming::parse_photo_name(name) {
            self.date = Some(date);
            self.slug = Some(slug);
            self.ext = Some(ext);
        }
    }

    fn read_sidecar(&mut self) -> Result<(), PhotoError> {
        let path = self.source_path().with_extension("toml");
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let table: toml::Table = toml::from_str(&text).map_err(|source| PhotoError::Sidecar {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(sidecar = %path.display(), "merging front matter");

        let front = match serde_json::to_value(table) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self.categories = string_list(front.get("categories"));
        self.tags = string_list(front.get("tags"));
        merge_json(&mut self.data, front);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the image being published.
    pub fn source_path(&self) -> PathBuf {
        self.base.join(&self.name)
    }

    /// URL directory every photo is published under.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Explicit URL from the front matter, if any.
    pub fn permalink(&self) -> Option<&str> {
        self.data.get("permalink").and_then(Value::as_str)
    }

    /// URL template, e.g. `/photos/:year-:month-:day-:title.jpg`.
    pub fn template(&self) -> String {
        permalink::template(&self.dir, self.ext.as_deref().unwrap_or_default())
    }

    pub fn url(&self) -> Result<String, PhotoError> {
        if let Some(permalink) = self.permalink() {
            return Ok(permalink::escape_permalink(&permalink::sanitize(permalink)));
        }
        let (Some(date), Some(slug)) = (self.date, self.slug.as_deref()) else {
            return Err(PhotoError::Unparsed(self.name.clone()));
        };
        Ok(permalink::url_from_template(
            &self.template(),
            &Placeholders {
                date,
                title: slug,
                categories: &self.categories,
            },
        ))
    }

    /// Unique id, used in feeds. Same as the URL.
    pub fn id(&self) -> Result<String, PhotoError> {
        self.url()
    }

    /// Front matter title, else the slug titled, else the filename.
    pub fn title(&self) -> String {
        if let Some(title) = self.data.get("title").and_then(Value::as_str) {
            return title.to_string();
        }
        match &self.slug {
            Some(slug) => naming::title_from_slug(slug),
            None => self.name.clone(),
        }
    }

    /// Where the image copy lands under `dest`.
    pub fn destination(&self, dest: &Path) -> Result<PathBuf, PhotoError> {
        Ok(permalink::destination(dest, &self.url()?))
    }

    /// Render the body against `payload` (typically the site payload) and
    /// the photo's layout. The result is kept in [`Photo::output`].
    pub fn render(&mut self, layouts: &Layouts, payload: &Value) -> Result<(), PhotoError> {
        let mut payload = payload.clone();
        if let Some(map) = payload.as_object_mut() {
            map.insert("page".to_string(), self.to_context());
        }
        let layout = self.data.get("layout").and_then(Value::as_str);
        self.output = Some(layouts.render(layout, &self.content, &payload)?);
        Ok(())
    }

    /// Copy the image to its destination under `dest`, creating parent
    /// directories. Returns the written path.
    ///
    /// Fails if the destination is the source file itself, which happens when
    /// the output directory overlaps the photos directory.
    pub fn write(&self, dest: &Path) -> Result<PathBuf, PhotoError> {
        let path = self.destination(dest)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let source = self.source_path();
        if let (Ok(from), Ok(to)) = (fs::canonicalize(&source), fs::canonicalize(&path)) {
            if from == to {
                return Err(PhotoError::SameFile(source));
            }
        }
        fs::copy(source, &path)?;
        Ok(path)
    }

    /// Write the rendered page next to the image copy, as `{url}.html`.
    pub fn write_page(&self, dest: &Path) -> Result<PathBuf, PhotoError> {
        let output = self
            .output
            .as_deref()
            .ok_or_else(|| PhotoError::NotRendered(self.name.clone()))?;
        let mut path = self.destination(dest)?.into_os_string();
        path.push(".html");
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, output)?;
        Ok(path)
    }

    /// Title and URL for a neighbor's previous/next link.
    pub fn neighbor(&self) -> Option<Neighbor> {
        Some(Neighbor {
            title: self.title(),
            url: self.url().ok()?,
        })
    }

    /// Template context for this photo: the front matter with the derived
    /// fields layered on top.
    pub fn to_context(&self) -> Value {
        let url = self.url().ok();
        let mut ctx = self.data.clone();
        merge_json(
            &mut ctx,
            Map::from_iter([
                ("title".to_string(), json!(self.title())),
                ("url".to_string(), json!(url)),
                ("date".to_string(), json!(self.date)),
                ("id".to_string(), json!(url)),
                ("slug".to_string(), json!(self.slug)),
                ("categories".to_string(), json!(self.categories)),
                ("next".to_string(), json!(self.next)),
                ("previous".to_string(), json!(self.previous)),
                ("tags".to_string(), json!(self.tags)),
                ("content".to_string(), json!(self.content)),
            ]),
        );
        Value::Object(ctx)
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Ok(id) => write!(f, "<Photo: {id}>"),
            Err(_) => write!(f, "<Photo: {}>", self.name),
        }
    }
}

/// Recursively merge `overlay` into `base`. Nested objects merge key by key;
/// anything else in `overlay` replaces the base value.
pub fn merge_json(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(base_obj)), Value::Object(overlay_obj)) => {
                merge_json(base_obj, overlay_obj)
            }
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// A front matter list of strings; a bare string is split on whitespace.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => s.split_whitespace().map(String::from).collect(),
        _ => Vec::new(),
    }
}
