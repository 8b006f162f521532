// ABOUTME: Sidebar styling read from the data-sidebar-* attributes of the matched marker element.
// ABOUTME: Turns them into inline style declarations for the container, content wrappers and sections.

use serde::Serialize;

/// Attribute names read from the marker element.
pub mod attrs {
    pub const WIDTH: &str = "data-sidebar-width";
    pub const SIDE: &str = "data-sidebar-side";
    pub const INTERNAL_PADDING: &str = "data-sidebar-internal-padding";
    pub const ROUNDED_EDGES: &str = "data-sidebar-rounded-edges";
    pub const BORDER_STYLE: &str = "data-sidebar-border-style";
    pub const STICKY: &str = "data-sidebar-sticky";
    pub const STICKY_OFFSET: &str = "data-sidebar-sticky-offset";
}

/// Styling requested by a sidebar. Unset fields leave the theme's CSS alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarStyle {
    pub width: Option<String>,
    pub side: Option<String>,
    pub internal_padding: Option<String>,
    pub rounded_edges: Option<String>,
    pub border_style: Option<String>,
    /// `Some(true)` only for the literal `"true"`; any other value means relative.
    pub sticky: Option<bool>,
    pub sticky_offset: Option<String>,
}

impl SidebarStyle {
    /// Read the style attributes through a lookup on the marker element.
    pub fn from_attrs<'a, F>(attr: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let owned = |name: &str| attr(name).map(str::to_string);
        Self {
            width: owned(attrs::WIDTH),
            side: owned(attrs::SIDE),
            internal_padding: owned(attrs::INTERNAL_PADDING),
            rounded_edges: owned(attrs::ROUNDED_EDGES),
            border_style: owned(attrs::BORDER_STYLE),
            sticky: attr(attrs::STICKY).map(|v| v == "true"),
            sticky_offset: owned(attrs::STICKY_OFFSET),
        }
    }

    /// True when the sidebar sits left of the content.
    pub fn is_left(&self) -> bool {
        self.side.as_deref() == Some("left")
    }

    /// Flex direction of the content collection: `row` for a right sidebar, `row-reverse` otherwise.
    pub fn flex_direction(&self) -> Option<&'static str> {
        self.side
            .as_deref()
            .map(|side| if side == "right" { "row" } else { "row-reverse" })
    }

    /// Flex basis left for the main content next to the sidebar.
    pub fn content_basis(&self) -> Option<String> {
        self.width.as_ref().map(|w| format!("calc(100% - {})", w))
    }

    /// Declarations for every section inside the sidebar container.
    pub fn section_declarations(&self) -> Vec<(&'static str, String)> {
        let mut decls = Vec::new();
        if let Some(ref padding) = self.internal_padding {
            decls.push(("padding", padding.clone()));
            decls.push(("padding-top", padding.clone()));
        }
        if let Some(ref radius) = self.rounded_edges {
            decls.push(("border-radius", radius.clone()));
        }
        if let Some(ref border) = self.border_style {
            decls.push(("border", border.clone()));
        }
        if let Some(sticky) = self.sticky {
            let position = if sticky { "sticky" } else { "relative" };
            decls.push(("position", position.to_string()));
        }
        if let Some(ref offset) = self.sticky_offset {
            decls.push(("top", offset.clone()));
        }
        decls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn style(pairs: &[(&str, &str)]) -> SidebarStyle {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        SidebarStyle::from_attrs(|name| map.get(name).copied())
    }

    #[test]
    fn test_no_attributes_no_declarations() {
        let s = style(&[]);
        assert_eq!(s, SidebarStyle::default());
        assert!(s.section_declarations().is_empty());
        assert_eq!(s.flex_direction(), None);
        assert_eq!(s.content_basis(), None);
    }

    #[test]
    fn test_side_controls_direction() {
        assert_eq!(style(&[(attrs::SIDE, "right")]).flex_direction(), Some("row"));
        assert_eq!(style(&[(attrs::SIDE, "left")]).flex_direction(), Some("row-reverse"));
        assert!(style(&[(attrs::SIDE, "left")]).is_left());
        // Unknown values still reverse the row but are not "left".
        let odd = style(&[(attrs::SIDE, "middle")]);
        assert_eq!(odd.flex_direction(), Some("row-reverse"));
        assert!(!odd.is_left());
    }

    #[test]
    fn test_width_gives_content_basis() {
        let s = style(&[(attrs::WIDTH, "30%")]);
        assert_eq!(s.content_basis().as_deref(), Some("calc(100% - 30%)"));
    }

    #[test]
    fn test_section_declarations_in_order() {
        let s = style(&[
            (attrs::INTERNAL_PADDING, "2rem"),
            (attrs::ROUNDED_EDGES, "8px"),
            (attrs::BORDER_STYLE, "1px solid #ccc"),
            (attrs::STICKY, "yes"),
            (attrs::STICKY_OFFSET, "100px"),
        ]);
        assert_eq!(
            s.section_declarations(),
            vec![
                ("padding", "2rem".to_string()),
                ("padding-top", "2rem".to_string()),
                ("border-radius", "8px".to_string()),
                ("border", "1px solid #ccc".to_string()),
                ("position", "relative".to_string()),
                ("top", "100px".to_string()),
            ]
        );
    }

    #[test]
    fn test_sticky_true() {
        let s = style(&[(attrs::STICKY, "true")]);
        assert_eq!(s.section_declarations(), vec![("position", "sticky".to_string())]);
    }
}
