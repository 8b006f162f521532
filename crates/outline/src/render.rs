// ABOUTME: Renders an outline tree into the contents widget markup (title, main dropdown, nested list).
// ABOUTME: Walks the tree directly; dropdown affordances only appear on nodes that have children.

use crate::dom::{escape_attr, escape_text};
use crate::options::ContentsOptions;
use crate::outline::{OutlineNode, OutlineTree};

/// Chevron used by both the main and the per-heading dropdown buttons.
const CHEVRON_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 140 240" fill="none">"#,
    r#"<path d="M15 15L125 120L15 225" stroke="currentColor" stroke-width="30" stroke-linecap="round" stroke-linejoin="round"/>"#,
    "</svg>"
);

/// Widget markup split by where it goes in the contents block.
///
/// `head` is inserted before the block's existing children, `body` after them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContents {
    pub head: String,
    pub body: String,
}

impl RenderedContents {
    /// The widget wrapped in a fresh `#contents` block.
    pub fn into_block(self) -> String {
        format!("<div id=\"contents\">{}{}</div>", self.head, self.body)
    }
}

fn open_class(open: bool) -> &'static str {
    if open {
        "dropdown-icon-open"
    } else {
        "dropdown-icon-closed"
    }
}

fn main_dropdown_button(opts: &ContentsOptions, in_title: bool) -> String {
    let mut class = format!("main-dropdown-button {}", open_class(opts.open_by_default));
    if in_title {
        class.push_str(" title-enabled");
    }
    format!("<div class=\"{}\">{}</div>", class, CHEVRON_SVG)
}

/// Render the complete widget for `tree`.
pub fn render_contents(tree: &OutlineTree, opts: &ContentsOptions) -> RenderedContents {
    let mut head = String::new();
    if opts.title_enabled {
        head.push_str("<div id=\"contents-title-wrapper\"><h2 id=\"contents-title\">");
        head.push_str(&escape_text(&opts.title_text));
        head.push_str("</h2>");
        if opts.main_dropdown_enabled {
            head.push_str(&main_dropdown_button(opts, true));
        }
        head.push_str("</div>");
    }

    let mut body = String::from("<div id=\"contents-list-wrapper\"");
    if opts.main_dropdown_enabled {
        let state = if opts.open_by_default {
            "contents-dropdown-open"
        } else {
            "contents-dropdown-closed"
        };
        body.push_str(&format!(" class=\"{} main-dropdown-enabled\"", state));
    }
    body.push('>');
    body.push_str(&render_list(tree, opts));
    body.push_str("</div>");

    if opts.main_dropdown_enabled && !opts.title_enabled {
        body.push_str(&main_dropdown_button(opts, false));
    }

    RenderedContents { head, body }
}

/// Render only the `#contents-list` element.
pub fn render_list(tree: &OutlineTree, opts: &ContentsOptions) -> String {
    let mut out = String::from("<ul id=\"contents-list\">");
    for node in &tree.roots {
        render_item(node, opts, &mut out);
    }
    out.push_str("</ul>");
    out
}

fn render_item(node: &OutlineNode, opts: &ContentsOptions, out: &mut String) {
    let id = escape_attr(&node.heading.id);

    out.push_str(&format!("<li class=\"{}\">", id));
    out.push_str(&format!("<a href=\"#{}\">{}</a>", id, node.heading.label));

    out.push_str("<div class=\"contents-outer-wrapper");
    if opts.individual_dropdowns_enabled {
        out.push_str(" contents-dropdown-closed");
    }
    out.push_str("\"><div class=\"contents-inner-wrapper\">");
    if !node.is_leaf() {
        out.push_str("<ul>");
        for child in &node.children {
            render_item(child, opts, out);
        }
        out.push_str("</ul>");
    }
    out.push_str("</div></div>");

    if opts.individual_dropdowns_enabled && !node.is_leaf() {
        out.push_str("<div class=\"dropdown-icon dropdown-icon-closed\">");
        out.push_str(CHEVRON_SVG);
        out.push_str("</div>");
    }

    out.push_str("</li>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{HeadingLevel, HeadingRecord};
    use pretty_assertions::assert_eq;

    fn tree(levels: &[HeadingLevel]) -> OutlineTree {
        OutlineTree::build(
            levels
                .iter()
                .enumerate()
                .map(|(i, &level)| HeadingRecord::new(level, i, format!("T{}", i))),
        )
    }

    fn plain() -> ContentsOptions {
        ContentsOptions {
            title_enabled: false,
            main_dropdown_enabled: false,
            individual_dropdowns_enabled: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_nested_list() {
        let t = tree(&[HeadingLevel::H2, HeadingLevel::H3, HeadingLevel::H2]);
        let html = render_list(&t, &plain());
        assert_eq!(
            html,
            concat!(
                r##"<ul id="contents-list">"##,
                r##"<li class="heading-0"><a href="#heading-0">T0</a>"##,
                r##"<div class="contents-outer-wrapper"><div class="contents-inner-wrapper"><ul>"##,
                r##"<li class="heading-1"><a href="#heading-1">T1</a>"##,
                r##"<div class="contents-outer-wrapper"><div class="contents-inner-wrapper"></div></div></li>"##,
                r##"</ul></div></div></li>"##,
                r##"<li class="heading-2"><a href="#heading-2">T2</a>"##,
                r##"<div class="contents-outer-wrapper"><div class="contents-inner-wrapper"></div></div></li>"##,
                "</ul>"
            )
        );
    }

    #[test]
    fn test_siblings_share_one_list() {
        let t = tree(&[HeadingLevel::H2, HeadingLevel::H3, HeadingLevel::H3, HeadingLevel::H3]);
        let html = render_list(&t, &plain());
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn test_dropdown_icons_only_on_parents() {
        let t = tree(&[HeadingLevel::H2, HeadingLevel::H3, HeadingLevel::H2]);
        let opts = ContentsOptions {
            individual_dropdowns_enabled: true,
            ..plain()
        };
        let html = render_list(&t, &opts);
        assert_eq!(html.matches("dropdown-icon dropdown-icon-closed").count(), 1);
        assert_eq!(html.matches("contents-outer-wrapper contents-dropdown-closed").count(), 3);
    }

    #[test]
    fn test_default_widget_puts_button_in_title() {
        let rendered = render_contents(&tree(&[HeadingLevel::H2]), &ContentsOptions::default());
        assert!(rendered.head.starts_with(
            r#"<div id="contents-title-wrapper"><h2 id="contents-title">Table of Contents</h2><div class="main-dropdown-button dropdown-icon-open title-enabled">"#
        ));
        assert!(rendered.body.starts_with(
            r#"<div id="contents-list-wrapper" class="contents-dropdown-open main-dropdown-enabled">"#
        ));
        assert!(!rendered.body.contains("main-dropdown-button"));
    }

    #[test]
    fn test_button_follows_list_without_title() {
        let opts = ContentsOptions {
            title_enabled: false,
            open_by_default: false,
            ..Default::default()
        };
        let rendered = render_contents(&tree(&[]), &opts);
        assert_eq!(rendered.head, "");
        assert!(rendered
            .body
            .contains(r#"class="contents-dropdown-closed main-dropdown-enabled""#));
        assert!(rendered
            .body
            .ends_with(&format!(r#"<div class="main-dropdown-button dropdown-icon-closed">{}</div>"#, CHEVRON_SVG)));
    }

    #[test]
    fn test_main_dropdown_disabled_leaves_wrapper_bare() {
        let opts = ContentsOptions {
            main_dropdown_enabled: false,
            ..Default::default()
        };
        let rendered = render_contents(&tree(&[]), &opts);
        assert!(rendered.body.starts_with(r#"<div id="contents-list-wrapper"><ul id="contents-list"></ul></div>"#));
        assert!(!rendered.head.contains("main-dropdown-button"));
    }

    #[test]
    fn test_title_is_escaped() {
        let opts = ContentsOptions {
            title_text: "Q&A <live>".to_string(),
            ..Default::default()
        };
        let rendered = render_contents(&tree(&[]), &opts);
        assert!(rendered.head.contains("Q&amp;A &lt;live&gt;"));
    }

    #[test]
    fn test_into_block_wraps_both_parts() {
        let rendered = RenderedContents {
            head: "<i>h</i>".to_string(),
            body: "<b>b</b>".to_string(),
        };
        assert_eq!(rendered.into_block(), r#"<div id="contents"><i>h</i><b>b</b></div>"#);
    }
}
