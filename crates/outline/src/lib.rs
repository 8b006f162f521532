// ABOUTME: Main library entry point for folio's contents-list generation.
// ABOUTME: Re-exports the outline model, the hierarchy builder, widget rendering and the page plugin.

//! Folio outline - nested contents lists for blog posts.
//!
//! The crate reads the `h2`/`h3`/`h4` headings of a post, nests them into an
//! [`OutlineTree`] and renders that tree as the theme's collapsible contents
//! widget, either standalone or injected back into the page.
//!
//! # Example
//!
//! ```
//! use folio_outline::{ContentsPlugin, Outcome};
//!
//! let page = r#"<html><body><div class="blog-item-content">
//!   <div class="html-block"><h2>Setup</h2><h3>Install</h3></div>
//! </div></body></html>"#;
//!
//! let plugin = ContentsPlugin::builder().build().unwrap();
//! match plugin.apply(page) {
//!     Outcome::Inserted(report) => {
//!         assert_eq!(report.outline.roots.len(), 1);
//!         assert!(report.html.contains(r##"<a href="#heading-1">Install</a>"##));
//!     }
//!     other => panic!("unexpected outcome: {}", other.kind()),
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extract;
pub mod options;
pub mod outline;
pub mod plugin;
pub mod render;

pub use crate::error::ContentsError;
pub use crate::extract::{extract_headings, ExtractedHeading};
pub use crate::options::{ContentsOptions, ContentsOverrides};
pub use crate::outline::{
    anchor_id, build_outline, HeadingLevel, HeadingRecord, OutlineNode, OutlineTree,
};
pub use crate::plugin::{ContentsPlugin, ContentsPluginBuilder, ContentsReport, Outcome};
pub use crate::render::{render_contents, render_list, RenderedContents};
