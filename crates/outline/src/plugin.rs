// ABOUTME: Page-level contents insertion: opt-out check, #contents lookup or creation, heading tagging, widget render.
// ABOUTME: ContentsPluginBuilder configures selectors and option overrides in the style of a client builder.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::dom::{compile_selector, Rewriter};
use crate::error::ContentsError;
use crate::extract::{
    extract_headings, heading_selector_source, DEFAULT_CONTENT_SELECTOR, DEFAULT_HEADING_SCOPE,
};
use crate::options::{ContentsOptions, ContentsOverrides};
use crate::outline::{build_outline, OutlineTree};
use crate::render::render_contents;

static NO_CONTENTS: Lazy<Selector> = Lazy::new(|| Selector::parse("#no-contents").unwrap());
static CONTENTS_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("#contents").unwrap());

/// What happened to a page passed through [`ContentsPlugin::apply`].
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The page carries a `#no-contents` marker; nothing was built.
    OptedOut,
    /// The page has no content region to read headings from.
    NoContentRegion,
    /// The widget was inserted.
    Inserted(ContentsReport),
}

impl Outcome {
    /// The rewritten page, if the widget was inserted.
    pub fn html(&self) -> Option<&str> {
        match self {
            Outcome::Inserted(report) => Some(&report.html),
            _ => None,
        }
    }

    /// Short machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::OptedOut => "opted-out",
            Outcome::NoContentRegion => "no-content-region",
            Outcome::Inserted(_) => "inserted",
        }
    }
}

/// Details of a successful insertion.
#[derive(Debug, Clone, Serialize)]
pub struct ContentsReport {
    /// The full rewritten document.
    pub html: String,
    pub outline: OutlineTree,
    /// Options in effect after attribute resolution and overrides.
    pub options: ContentsOptions,
    /// True when the page had no `#contents` block and one was created.
    pub created_block: bool,
}

/// Builds and inserts a contents list into blog post pages.
#[derive(Debug, Clone)]
pub struct ContentsPlugin {
    content_selector: Selector,
    heading_selector: Selector,
    overrides: ContentsOverrides,
}

impl ContentsPlugin {
    /// Create a new ContentsPluginBuilder.
    pub fn builder() -> ContentsPluginBuilder {
        ContentsPluginBuilder::new()
    }

    /// Build the outline of a page without rewriting it.
    ///
    /// Returns `None` when the page has no content region.
    pub fn outline(&self, html: &str) -> Option<OutlineTree> {
        let doc = Html::parse_document(html);
        let region = doc.select(&self.content_selector).next()?;
        let headings = extract_headings(region, &self.heading_selector);
        Some(build_outline(headings.into_iter().map(|h| h.record)))
    }

    /// Insert the contents widget into a page.
    ///
    /// Headings get `id` and `class` set to their anchor before the outline is
    /// built. The widget goes into the page's `#contents` block, whose `data-*`
    /// attributes configure it; without one, a block is created as the first
    /// child of the content region.
    pub fn apply(&self, html: &str) -> Outcome {
        let doc = Html::parse_document(html);

        if doc.select(&NO_CONTENTS).next().is_some() {
            tracing::debug!("page opted out of contents list");
            return Outcome::OptedOut;
        }

        let Some(region) = doc.select(&self.content_selector).next() else {
            tracing::debug!("no content region found");
            return Outcome::NoContentRegion;
        };

        let block = doc.select(&CONTENTS_BLOCK).next();
        let options = match block {
            Some(el) => ContentsOptions::from_attrs(|name| el.value().attr(name)),
            None => ContentsOptions::default(),
        }
        .with_overrides(&self.overrides);

        let mut rewriter = Rewriter::new();
        let headings = extract_headings(region, &self.heading_selector);
        for heading in &headings {
            rewriter
                .set_attr(heading.node, "id", heading.record.id.as_str())
                .set_attr(heading.node, "class", heading.record.id.as_str());
        }

        let outline = build_outline(headings.into_iter().map(|h| h.record));
        let rendered = render_contents(&outline, &options);

        let created_block = block.is_none();
        match block {
            Some(el) => {
                rewriter
                    .prepend_html(el.id(), &rendered.head)
                    .append_html(el.id(), &rendered.body);
            }
            None => {
                rewriter.prepend_html(region.id(), &rendered.into_block());
            }
        }

        tracing::info!(
            headings = outline.node_count(),
            top_level = outline.roots.len(),
            created_block,
            "inserted contents list"
        );

        Outcome::Inserted(ContentsReport {
            html: rewriter.render_document(&doc),
            outline,
            options,
            created_block,
        })
    }
}

impl Default for ContentsPlugin {
    fn default() -> Self {
        Self {
            content_selector: Selector::parse(DEFAULT_CONTENT_SELECTOR).unwrap(),
            heading_selector: Selector::parse(&heading_selector_source(DEFAULT_HEADING_SCOPE))
                .unwrap(),
            overrides: ContentsOverrides::default(),
        }
    }
}

/// Builder for constructing ContentsPlugin instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ContentsPluginBuilder {
    content_selector: String,
    heading_scope: String,
    overrides: ContentsOverrides,
}

impl ContentsPluginBuilder {
    /// Create a new ContentsPluginBuilder with default selectors and no overrides.
    pub fn new() -> Self {
        Self {
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            heading_scope: DEFAULT_HEADING_SCOPE.to_string(),
            overrides: ContentsOverrides::default(),
        }
    }

    /// Set the selector of the element holding the post body.
    pub fn content_selector(mut self, css: impl Into<String>) -> Self {
        self.content_selector = css.into();
        self
    }

    /// Set the selector of the blocks whose headings are listed. Empty means anywhere.
    pub fn heading_scope(mut self, css: impl Into<String>) -> Self {
        self.heading_scope = css.into();
        self
    }

    /// Replace all option overrides.
    pub fn overrides(mut self, overrides: ContentsOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Force the title on or off.
    pub fn title_enabled(mut self, enabled: bool) -> Self {
        self.overrides.title_enabled = Some(enabled);
        self
    }

    /// Force the title text.
    pub fn title_text(mut self, text: impl Into<String>) -> Self {
        self.overrides.title_text = Some(text.into());
        self
    }

    /// Force the main dropdown on or off.
    pub fn main_dropdown_enabled(mut self, enabled: bool) -> Self {
        self.overrides.main_dropdown_enabled = Some(enabled);
        self
    }

    /// Force the per-heading dropdowns on or off.
    pub fn individual_dropdowns_enabled(mut self, enabled: bool) -> Self {
        self.overrides.individual_dropdowns_enabled = Some(enabled);
        self
    }

    /// Force the initial state of the main dropdown.
    pub fn open_by_default(mut self, open: bool) -> Self {
        self.overrides.open_by_default = Some(open);
        self
    }

    /// Build the plugin, compiling its selectors.
    pub fn build(self) -> Result<ContentsPlugin, ContentsError> {
        Ok(ContentsPlugin {
            content_selector: compile_selector(&self.content_selector)?,
            heading_selector: compile_selector(&heading_selector_source(&self.heading_scope))?,
            overrides: self.overrides,
        })
    }
}

impl Default for ContentsPluginBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_bad_selector() {
        let err = ContentsPlugin::builder()
            .content_selector("[[[nope")
            .build()
            .unwrap_err();
        assert!(matches!(err, ContentsError::InvalidSelector { ref selector, .. } if selector == "[[[nope"));
    }

    #[test]
    fn test_outcome_kind_labels() {
        assert_eq!(Outcome::OptedOut.kind(), "opted-out");
        assert_eq!(Outcome::NoContentRegion.html(), None);
    }

    #[test]
    fn test_outline_without_region_is_none() {
        let plugin = ContentsPlugin::default();
        assert!(plugin.outline("<html><body><h2>x</h2></body></html>").is_none());
    }
}
