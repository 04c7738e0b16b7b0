//! # Photo Dump
//!
//! Publishes a directory of dated photos as site pages. Every image named
//! like a blog post becomes a lightweight post of its own:
//!
//! ```text
//! _photos/2011-06-01-bay-to-breakers.jpg
//!     date      2011-06-01
//!     slug      bay-to-breakers
//!     title     Bay To Breakers
//!     url       /photos/2011-06-01-bay-to-breakers.jpg
//!     written   _site/photos/2011-06-01-bay-to-breakers.jpg   (byte copy)
//! ```
//!
//! # Build
//!
//! ```text
//! 1. Discover   _photos/*.jpg               (non-recursive, sorted by name)
//! 2. Generate   each file → Photo           (parse, render, copy, append to site.posts)
//! 3. Link       site.posts by date          (previous/next)
//! 4. Publish    photos/index.html           (and optional per-photo pages)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `YYYY-MM-DD-slug.ext` filename parser and slug titles |
//! | [`permalink`] | URL templates, token substitution, destination paths |
//! | [`photo`] | The photo page model: metadata, context, render, write |
//! | [`layout`] | Runtime layout templates from `_layouts/` |
//! | [`site`] | The host: config, layouts, post collection, payload, build |
//! | [`generate`] | The [`generate::Generator`] seam and the photo generator |
//! | [`index`] | Built-in listing page |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The filename is the metadata
//!
//! Date and slug come from the filename, the same convention blog posts use.
//! There is no EXIF reading and no database. A sidecar `.toml` next to an image
//! can add front matter (title, permalink, tags) when the filename is not
//! enough.
//!
//! ## Bad names do not stop a build
//!
//! A file that does not parse becomes a photo with no date, slug, or
//! extension. It has no URL, so the generator skips it with a warning instead
//! of aborting. A missing source file, on the other hand, is an I/O error and
//! does abort: the output would be incomplete.
//!
//! ## Layouts are runtime templates
//!
//! Layouts belong to the site, not the binary, so they are minijinja templates
//! loaded at build time. The built-in listing page has no such constraint and
//! is rendered with maud.

pub mod config;
pub mod generate;
pub mod index;
pub mod layout;
pub mod naming;
pub mod output;
pub mod permalink;
pub mod photo;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
