// ABOUTME: The SidebarClient fetches a site's sidebars page and places the matching sidebar into a page.
// ABOUTME: place() is best effort and returns the page unchanged on failure; try_place() surfaces the error.

use url::Url;

use crate::error::SidebarError;
use crate::options::{Options, SidebarClientBuilder};
use crate::page::PageInfo;
use crate::relocate::apply_sidebar;
use crate::resource::fetch;

/// Result of [`SidebarClient::place`].
#[derive(Debug)]
pub enum SidebarOutcome {
    /// The sidebar was inserted.
    Placed(String),
    /// Placement failed; `html` is the input page.
    Unchanged { html: String, error: SidebarError },
}

impl SidebarOutcome {
    pub fn html(&self) -> &str {
        match self {
            SidebarOutcome::Placed(html) => html,
            SidebarOutcome::Unchanged { html, .. } => html,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, SidebarOutcome::Placed(_))
    }
}

/// Client for placing sidebars from a site's sidebars page.
#[derive(Debug, Clone)]
pub struct SidebarClient {
    opts: Options,
    http_client: reqwest::Client,
}

impl SidebarClient {
    /// Create a new SidebarClientBuilder for configuring the client.
    pub fn builder() -> SidebarClientBuilder {
        SidebarClientBuilder::new()
    }

    /// Create a new SidebarClient with the given options.
    pub fn new(opts: Options) -> Result<Self, SidebarError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    SidebarError::fetch(
                        "",
                        "Client",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };
        Ok(Self { opts, http_client })
    }

    /// URL of the sidebars page on the same site as `page_url`.
    pub fn sidebars_url(&self, page_url: &str) -> Result<Url, SidebarError> {
        let base = Url::parse(page_url).map_err(|e| {
            SidebarError::invalid_url(page_url, "Place", Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;
        base.join(&self.opts.sidebars_path).map_err(|e| {
            SidebarError::invalid_url(
                page_url,
                "Place",
                Some(anyhow::anyhow!("bad sidebars path {:?}: {}", self.opts.sidebars_path, e)),
            )
        })
    }

    /// Fetch the sidebars page and place the sidebar matching `page_url` into `page_html`.
    pub async fn try_place(&self, page_html: &str, page_url: &str) -> Result<String, SidebarError> {
        let page = PageInfo::from_url(page_url)?;
        let sidebars_url = self.sidebars_url(page_url)?;
        let fetched = fetch(&self.http_client, sidebars_url.as_str(), &self.opts.headers).await?;
        tracing::debug!(url = %fetched.url, bytes = fetched.body.len(), "fetched sidebars page");
        apply_sidebar(page_html, &page, &fetched.text()).map_err(|mut err| {
            if err.url.is_empty() {
                err.url = page_url.to_string();
            }
            err
        })
    }

    /// Like [`try_place`](Self::try_place), but a failure leaves the page as it was.
    pub async fn place(&self, page_html: &str, page_url: &str) -> SidebarOutcome {
        match self.try_place(page_html, page_url).await {
            Ok(html) => SidebarOutcome::Placed(html),
            Err(error) => {
                tracing::warn!(url = page_url, %error, "sidebar not placed");
                SidebarOutcome::Unchanged {
                    html: page_html.to_string(),
                    error,
                }
            }
        }
    }
}
