//! Text helpers shared by the store and the command-line front end.
//!
//! - **Slugs**: URL-safe identifiers derived from article titles
//! - **Read time**: word-count estimate over an HTML body
//! - **Terminal width**: Unicode-aware measuring and truncation for listings

mod text;

pub use text::{
    display_width, estimate_read_time, slugify, strip_html_tags, truncate_to_width,
    WORDS_PER_MINUTE,
};
