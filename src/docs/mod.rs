//! Markdown helpers for the project documents copied into the site
//! (README, CONTRIBUTING).

pub mod readme;

pub use readme::{extract_headings, from_first_section, Heading};
