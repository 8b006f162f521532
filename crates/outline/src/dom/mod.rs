// ABOUTME: DOM helpers shared by the contents and sidebar transformations.
// ABOUTME: Wraps scraper parsing with a node-keyed rewriter that serializes documents with edits applied.

//! DOM utilities for HTML document rewriting.
//!
//! scraper gives us a parsed, read-only tree. Transformations record their
//! changes in a [`Rewriter`] keyed by node id and then serialize the whole
//! document once, so callers never re-query the output by class name.

pub mod rewrite;

pub use rewrite::{escape_attr, escape_text, Rewriter};

use scraper::Selector;

use crate::error::ContentsError;

/// Compile a CSS selector, keeping the source text in the error.
pub fn compile_selector(css: &str) -> Result<Selector, ContentsError> {
    Selector::parse(css).map_err(|e| ContentsError::invalid_selector(css, e))
}
