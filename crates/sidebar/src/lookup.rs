// ABOUTME: Finds the sidebar section meant for a page inside the site's sidebars document.
// ABOUTME: Markers carry data-page-url and data-page-or-post; the enclosing <section> is what gets moved.

use folio_outline::dom::Rewriter;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::page::PageInfo;
use crate::style::SidebarStyle;

static MARKERS: Lazy<Selector> = Lazy::new(|| Selector::parse("[data-page-url]").unwrap());

/// Class the builder gives every page section; dropped so the theme does not lay it out as one.
const PAGE_SECTION_CLASS: &str = "page-section";

pub const PAGE_URL_ATTR: &str = "data-page-url";
pub const PAGE_OR_POST_ATTR: &str = "data-page-or-post";

/// A sidebar picked for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    /// Outer HTML of the enclosing section, without the `page-section` class.
    pub section_html: String,
    pub style: SidebarStyle,
    /// The marker's `data-page-or-post` value.
    pub scope: String,
}

/// Nearest `<section>` at or above `el`.
fn closest_section(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find(|e| e.value().name() == "section")
}

/// Pick the sidebar for `page` from a sidebars document.
///
/// Markers are visited in document order. The first one whose
/// `data-page-url` equals the page slug, whose `data-page-or-post` accepts
/// the page type, and which sits inside a `<section>` wins.
pub fn find_sidebar(sidebars_html: &str, page: &PageInfo) -> Option<Sidebar> {
    let doc = Html::parse_document(sidebars_html);

    for marker in doc.select(&MARKERS) {
        let el = marker.value();
        if el.attr(PAGE_URL_ATTR) != Some(page.slug.as_str()) {
            continue;
        }
        let scope = el.attr(PAGE_OR_POST_ATTR).unwrap_or_default();
        if !page.page_type.accepts(scope) {
            continue;
        }
        let Some(section) = closest_section(marker) else {
            tracing::debug!(slug = %page.slug, "sidebar marker outside any section, skipping");
            continue;
        };

        let mut rewriter = Rewriter::new();
        rewriter.remove_class(section.id(), PAGE_SECTION_CLASS);

        tracing::debug!(slug = %page.slug, page_type = %page.page_type, scope, "matched sidebar");

        return Some(Sidebar {
            section_html: rewriter.render_element(section),
            style: SidebarStyle::from_attrs(|name| el.attr(name)),
            scope: scope.to_string(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageType;
    use pretty_assertions::assert_eq;

    const SIDEBARS: &str = r#"<html><body>
        <section class="page-section" id="a">
          <div data-page-url="about" data-page-or-post="post"></div><p>post-only about</p>
        </section>
        <section class="page-section dark" id="b">
          <div data-page-url="about" data-page-or-post="page" data-sidebar-width="25%"></div><p>about page</p>
        </section>
        <div data-page-url="blog" data-page-or-post="both"></div>
        <section class="page-section" id="c">
          <div data-page-url="blog" data-page-or-post="both" data-sidebar-side="left"></div><p>blog</p>
        </section>
    </body></html>"#;

    fn page(page_type: PageType, slug: &str) -> PageInfo {
        PageInfo {
            page_type,
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_matches_slug_and_type() {
        let sidebar = find_sidebar(SIDEBARS, &page(PageType::Page, "about")).unwrap();
        assert!(sidebar.section_html.starts_with(r#"<section"#));
        assert!(sidebar.section_html.contains("about page"));
        assert!(sidebar.section_html.contains(r#"class="dark""#));
        assert_eq!(sidebar.style.width.as_deref(), Some("25%"));
        assert_eq!(sidebar.scope, "page");
    }

    #[test]
    fn test_marker_without_section_is_skipped() {
        let sidebar = find_sidebar(SIDEBARS, &page(PageType::Post, "blog")).unwrap();
        assert!(sidebar.section_html.contains(r#"id="c""#));
        assert!(!sidebar.section_html.contains("page-section"));
        assert!(sidebar.style.is_left());
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find_sidebar(SIDEBARS, &page(PageType::Page, "contact")), None);
        assert_eq!(find_sidebar(SIDEBARS, &page(PageType::Home, "about")), None);
    }

    #[test]
    fn test_first_match_wins() {
        let sidebar = find_sidebar(SIDEBARS, &page(PageType::Post, "about")).unwrap();
        assert!(sidebar.section_html.contains("post-only about"));
    }

    #[test]
    fn test_deep_path_ignores_other_marker() {
        let html = r#"<section><div data-page-url="blogtagrust" data-page-or-post="other"></div></section>"#;
        assert_eq!(find_sidebar(html, &PageInfo::from_path("/blog/tag/rust")), None);
    }

    #[test]
    fn test_homepage_sidebar_uses_empty_slug() {
        let html = r#"<section id="home"><div data-page-url="" data-page-or-post="page"></div></section>"#;
        let sidebar = find_sidebar(html, &PageInfo::from_path("/")).unwrap();
        assert!(sidebar.section_html.contains(r#"id="home""#));
    }
}
