// ABOUTME: Finds the h2/h3/h4 headings of a post's content region and turns them into heading records.
// ABOUTME: Keeps each heading's node id so the page rewrite can give it its anchor id and class.

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};

use crate::outline::{HeadingLevel, HeadingRecord};

/// Default content region of a blog post.
pub const DEFAULT_CONTENT_SELECTOR: &str = ".blog-item-content";

/// Default container of author-written markup inside the content region.
pub const DEFAULT_HEADING_SCOPE: &str = ".html-block";

/// A heading record paired with the element it came from.
#[derive(Debug, Clone)]
pub struct ExtractedHeading {
    pub node: NodeId,
    pub record: HeadingRecord,
}

/// Builds the selector list matching h2/h3/h4 inside `scope`.
///
/// An empty scope matches the headings anywhere in the region.
pub fn heading_selector_source(scope: &str) -> String {
    let scope = scope.trim();
    if scope.is_empty() {
        return "h2, h3, h4".to_string();
    }
    ["h2", "h3", "h4"]
        .iter()
        .map(|tag| format!("{} {}", scope, tag))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collects the headings below `region` in document order.
///
/// Records are numbered from zero in the order found; the number doubles as
/// the anchor id (`heading-N`). Labels keep the heading's inner markup.
pub fn extract_headings(region: ElementRef<'_>, heading_selector: &Selector) -> Vec<ExtractedHeading> {
    region
        .select(heading_selector)
        .filter_map(|el| HeadingLevel::from_tag(el.value().name()).map(|level| (el, level)))
        .enumerate()
        .map(|(index, (el, level))| ExtractedHeading {
            node: el.id(),
            record: HeadingRecord::new(level, index, el.inner_html().trim()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn region_headings(html: &str, scope: &str) -> Vec<HeadingRecord> {
        let doc = Html::parse_document(html);
        let region_sel = Selector::parse(DEFAULT_CONTENT_SELECTOR).unwrap();
        let heading_sel = Selector::parse(&heading_selector_source(scope)).unwrap();
        let region = doc.select(&region_sel).next().unwrap();
        extract_headings(region, &heading_sel)
            .into_iter()
            .map(|h| h.record)
            .collect()
    }

    #[test]
    fn test_selector_source_with_scope() {
        assert_eq!(
            heading_selector_source(".html-block"),
            ".html-block h2, .html-block h3, .html-block h4"
        );
        assert_eq!(heading_selector_source("  "), "h2, h3, h4");
    }

    #[test]
    fn test_headings_in_document_order() {
        let html = r#"
            <div class="blog-item-content">
              <div class="html-block">
                <h2>Intro</h2><p>x</p><h3>Detail <em>one</em></h3>
              </div>
              <div class="html-block"><h4>Deep</h4><h2>Next</h2></div>
            </div>"#;
        let records = region_headings(html, DEFAULT_HEADING_SCOPE);
        let summary: Vec<(HeadingLevel, &str, &str)> = records
            .iter()
            .map(|r| (r.level, r.id.as_str(), r.label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (HeadingLevel::H2, "heading-0", "Intro"),
                (HeadingLevel::H3, "heading-1", "Detail <em>one</em>"),
                (HeadingLevel::H4, "heading-2", "Deep"),
                (HeadingLevel::H2, "heading-3", "Next"),
            ]
        );
    }

    #[test]
    fn test_headings_outside_scope_are_ignored() {
        let html = r#"
            <div class="blog-item-content">
              <h2>Not in a block</h2>
              <div class="html-block"><h3>In block</h3></div>
              <div class="html-block"><h5>Too deep</h5><h1>Too shallow</h1></div>
            </div>"#;
        let records = region_headings(html, DEFAULT_HEADING_SCOPE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "In block");
        assert_eq!(records[0].source_index, 0);
    }

    #[test]
    fn test_empty_scope_takes_every_heading() {
        let html = r#"<div class="blog-item-content"><h2>A</h2><div><h3>B</h3></div></div>"#;
        assert_eq!(region_headings(html, "").len(), 2);
    }
}
