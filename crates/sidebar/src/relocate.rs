// ABOUTME: Moves a matched sidebar section into a page next to the main content and applies its styling.
// ABOUTME: Adds the layout classes the theme CSS keys on, differing between collection pages and posts.

use folio_outline::dom::Rewriter;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::SidebarError;
use crate::lookup::{find_sidebar, Sidebar};
use crate::page::{PageInfo, PageType};

static CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".content-collection .content").unwrap());
static ALTERNATING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".blog-alternating-side-by-side").unwrap());
static CONTENT_WRAPPER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".content-collection .collection-content-wrapper").unwrap());
static BLOG_ITEM_WRAPPER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".blog-item-wrapper").unwrap());
static ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".blog-item-wrapper article").unwrap());
static ITEM_INNER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".blog-item-wrapper article .blog-item-inner-wrapper").unwrap()
});
static SECTIONS: Lazy<Selector> = Lazy::new(|| Selector::parse("section").unwrap());

pub const CONTAINER_ID: &str = "sidebar-container";
pub const INNER_ID: &str = "sidebar-inner";

const LAYOUT_ACTIVE: &str = "blog-sidebar-layout-active";
const PADDING_ACTIVE: &str = "blog-sidebar-padding-active";
const POST_LAYOUT_ACTIVE: &str = "blog-sidebar-post-layout-active";
const POSITION_LEFT: &str = "sidebar-position-left";
const WRAPPER_CLASS: &str = "collection-content-wrapper";

/// The sidebar section with its per-section declarations applied, nested sections included.
fn styled_section(sidebar: &Sidebar) -> String {
    let decls = sidebar.style.section_declarations();
    if decls.is_empty() {
        return sidebar.section_html.clone();
    }
    let fragment = Html::parse_fragment(&sidebar.section_html);
    let mut rewriter = Rewriter::new();
    for section in fragment.select(&SECTIONS) {
        for (property, value) in &decls {
            rewriter.set_style(section.id(), property, value.as_str());
        }
    }
    rewriter.render_fragment(&fragment)
}

fn container_html(sidebar: &Sidebar) -> String {
    let mut open = format!("<aside id=\"{}\"", CONTAINER_ID);
    if sidebar.style.is_left() {
        open.push_str(&format!(" class=\"{}\"", POSITION_LEFT));
    }
    if let Some(ref width) = sidebar.style.width {
        open.push_str(&format!(
            " style=\"flex-basis: {};\"",
            folio_outline::dom::escape_attr(width)
        ));
    }
    open.push('>');
    format!(
        "{}<div id=\"{}\">{}</div></aside>",
        open,
        INNER_ID,
        styled_section(sidebar)
    )
}

/// Insert `sidebar` into `page_html`.
///
/// The sidebar container is appended to `.content-collection .content`;
/// without that element the page cannot host a sidebar and a layout error is
/// returned.
pub fn relocate(page_html: &str, page: &PageInfo, sidebar: &Sidebar) -> Result<String, SidebarError> {
    let doc = Html::parse_document(page_html);
    let content = doc.select(&CONTENT).next().ok_or_else(|| {
        SidebarError::layout(
            "",
            "Relocate",
            Some(anyhow::anyhow!("page has no .content-collection .content element")),
        )
    })?;

    let style = &sidebar.style;
    let mut rewriter = Rewriter::new();

    rewriter
        .append_html(content.id(), &container_html(sidebar))
        .add_class(content.id(), LAYOUT_ACTIVE);
    if let Some(direction) = style.flex_direction() {
        rewriter.set_style(content.id(), "flex-direction", direction);
    }

    let alternating: Vec<_> = content.select(&ALTERNATING).map(|el| el.id()).collect();
    for id in &alternating {
        rewriter.add_class(*id, WRAPPER_CLASS);
    }

    // Alternating layouts have just become content wrappers, so the first
    // wrapper in document order may be either kind.
    let wrapper = doc
        .select(&CONTENT_WRAPPER)
        .map(|el| el.id())
        .chain(alternating.iter().copied())
        .min_by_key(|id| document_position(&doc, *id));

    match page.page_type {
        PageType::Page => {
            if let Some(id) = wrapper {
                rewriter.add_class(id, PADDING_ACTIVE);
            }
        }
        PageType::Post => {
            if let Some(article) = doc.select(&ARTICLE).next() {
                rewriter.add_class(article.id(), PADDING_ACTIVE);
            }
            if let Some(inner) = doc.select(&ITEM_INNER).next() {
                rewriter.add_class(inner.id(), POST_LAYOUT_ACTIVE);
            }
        }
        PageType::Home | PageType::Other => {}
    }

    if let Some(basis) = style.content_basis() {
        if let Some(id) = wrapper {
            rewriter.set_style(id, "flex-basis", basis.as_str());
        }
        if let Some(item) = doc.select(&BLOG_ITEM_WRAPPER).next() {
            rewriter.set_style(item.id(), "flex-basis", basis.as_str());
        }
    }

    tracing::info!(slug = %page.slug, page_type = %page.page_type, "placed sidebar");
    Ok(rewriter.render_document(&doc))
}

/// Pre-order position of a node, for ordering ids collected from different selectors.
fn document_position(doc: &Html, id: ego_tree::NodeId) -> usize {
    doc.tree
        .root()
        .descendants()
        .position(|node| node.id() == id)
        .unwrap_or(usize::MAX)
}

/// Look up the page's sidebar in `sidebars_html` and place it.
pub fn apply_sidebar(
    page_html: &str,
    page: &PageInfo,
    sidebars_html: &str,
) -> Result<String, SidebarError> {
    let sidebar = find_sidebar(sidebars_html, page).ok_or_else(|| {
        SidebarError::no_match(
            "",
            "Lookup",
            Some(anyhow::anyhow!(
                "no sidebar for {} {:?}",
                page.page_type,
                page.slug
            )),
        )
    })?;
    relocate(page_html, page, &sidebar)
}
