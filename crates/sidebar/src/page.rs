// ABOUTME: Classifies a page as home, page or post from the number of slashes in its URL path.
// ABOUTME: Derives the slug that sidebars are keyed by (the collection slug for posts).

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::SidebarError;

/// Kind of page, as far as sidebar matching is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    Page,
    Post,
    /// Deeper paths; only `both` sidebars match them.
    Other,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::Page => "page",
            PageType::Post => "post",
            PageType::Other => "other",
        }
    }

    /// Whether a `data-page-or-post` marker selects this kind of page.
    ///
    /// Markers only name pages and posts; home and deeper paths take `both` sidebars.
    pub fn accepts(self, marker: &str) -> bool {
        match self {
            PageType::Page | PageType::Post => marker == "both" || marker == self.as_str(),
            PageType::Home | PageType::Other => marker == "both",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page classification plus the slug used to look up its sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page_type: PageType,
    pub slug: String,
}

impl PageInfo {
    /// Classify a URL path.
    ///
    /// `/about` is a page with slug `about`; `/blog/my-post` is a post whose
    /// slug is its collection, `blog`. `/` is a page with an empty slug; only
    /// the empty path is home.
    pub fn from_path(path: &str) -> Self {
        let slashes = path.matches('/').count();
        let (page_type, slug_source) = match slashes {
            0 => (PageType::Home, path.to_string()),
            1 => (PageType::Page, path.to_string()),
            2 => (
                PageType::Post,
                path.split('/').take(2).collect::<Vec<_>>().join("/"),
            ),
            _ => (PageType::Other, path.to_string()),
        };

        Self {
            page_type,
            slug: slug_source.replace('/', ""),
        }
    }

    /// Classify the path of an absolute URL.
    pub fn from_url(url: &str) -> Result<Self, SidebarError> {
        let parsed = Url::parse(url).map_err(|e| {
            SidebarError::invalid_url(url, "Classify", Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;
        Ok(Self::from_path(parsed.path()))
    }
}
