//! Layout templates.
//!
//! Layouts live in `_layouts/` as `*.html` files and are addressed by file
//! stem: `_layouts/photo.html` is the `photo` layout. They use
//! [minijinja](https://docs.rs/minijinja) syntax and see the render payload
//! (`site`, `page`) plus `content`, the page's own rendered body.
//!
//! Rendering is two steps:
//!
//! 1. The page content is itself rendered as a template against the payload.
//! 2. If the page names a layout that exists, the result is wrapped in it.
//!    A missing layout is not an error; the rendered content is the output.
//!
//! Layouts may build on each other with `{% extends "base" %}`.

use minijinja::{AutoEscape, Environment, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not read layouts directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Named layout templates.
pub struct Layouts {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl Default for Layouts {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Layouts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layouts").field("names", &self.names).finish()
    }
}

impl Layouts {
    /// A set with no layouts; every page renders as its bare content.
    pub fn empty() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        // Page content is HTML already; layouts insert it verbatim.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self {
            env,
            names: BTreeSet::new(),
        }
    }

    /// Load every `*.html` file directly inside `dir`.
    ///
    /// A missing directory yields an empty set.
    pub fn load(dir: &Path) -> Result<Self, LayoutError> {
        let mut layouts = Self::empty();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "no layouts directory");
            return Ok(layouts);
        }
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_html = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("html"))
                .unwrap_or(false);
            if !entry.file_type().is_file() || !is_html {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let source = fs::read_to_string(path)?;
            layouts.add(name, source)?;
        }
        tracing::debug!(count = layouts.names.len(), "loaded layouts");
        Ok(layouts)
    }

    /// Register a layout under `name`, replacing any previous one.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<(), LayoutError> {
        let name = name.into();
        self.env.add_template_owned(name.clone(), source.into())?;
        self.names.insert(name);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Render `content` against `payload`, then wrap it in `layout` if that
    /// layout exists.
    pub fn render(
        &self,
        layout: Option<&str>,
        content: &str,
        payload: &serde_json::Value,
    ) -> Result<String, LayoutError> {
        let ctx = Value::from_serialize(payload);
        let rendered = self.env.render_str(content, ctx)?;

        let Some(name) = layout.filter(|name| self.contains(name)) else {
            if let Some(name) = layout {
                tracing::debug!(layout = name, "layout not found, using bare content");
            }
            return Ok(rendered);
        };

        let mut payload = payload.clone();
        if let Some(map) = payload.as_object_mut() {
            map.insert("content".to_string(), serde_json::Value::String(rendered));
        }
        let template = self.env.get_template(name)?;
        Ok(template.render(Value::from_serialize(&payload))?)
    }
}
