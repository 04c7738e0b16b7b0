//! Built-in photo listing page.
//!
//! Used for `{permalink_dir}/index.html` when the site has no listing layout.
//! Rendered with [maud](https://maud.lambda.xyz/), so every title and URL is
//! escaped.

use crate::photo::Photo;
use maud::{DOCTYPE, Markup, html};

const CSS: &str = "\
body { font-family: system-ui, sans-serif; margin: 2rem; }
ul.photos { list-style: none; padding: 0; display: grid; gap: 1rem; \
grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); }
ul.photos img { width: 100%; height: auto; display: block; }
ul.photos time { color: #666; font-size: 0.875rem; }";

/// Render the listing for `photos`, newest last, as posts are ordered.
pub fn render_index(title: &str, photos: &[Photo]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                h1 { (title) }
                ul.photos {
                    @for photo in photos {
                        @if let Ok(url) = photo.url() {
                            (photo_card(photo, &url))
                        }
                    }
                }
            }
        }
    }
}

fn photo_card(photo: &Photo, url: &str) -> Markup {
    let title = photo.title();
    html! {
        li {
            a href=(url) {
                img src=(url) alt=(title) loading="lazy";
            }
            span.title { (title) }
            @if let Some(date) = photo.date {
                " "
                time datetime=(date.format("%Y-%m-%d")) { (date.format("%B %-d, %Y")) }
            }
        }
    }
}
