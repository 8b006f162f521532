// ABOUTME: Configuration for the sidebar client: timeout, user agent, extra headers and the sidebars path.
// ABOUTME: SidebarClientBuilder offers the fluent construction API; SidebarConfig is its serde form for config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::client::SidebarClient;
use crate::error::SidebarError;

pub const DEFAULT_SIDEBARS_PATH: &str = "/sidebars";
pub const DEFAULT_USER_AGENT: &str = "folio/0.1";

/// Configuration options for the sidebar client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    /// Site path of the page holding every sidebar.
    pub sidebars_path: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            http_client: None,
            sidebars_path: DEFAULT_SIDEBARS_PATH.to_string(),
        }
    }
}

/// The `[sidebar]` table of a config file. Unset keys keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SidebarConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub sidebars_path: Option<String>,
    pub headers: HashMap<String, String>,
}

/// Builder for constructing SidebarClient instances with custom configuration.
#[derive(Debug, Clone)]
pub struct SidebarClientBuilder {
    opts: Options,
}

impl SidebarClientBuilder {
    /// Create a new SidebarClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Apply the settings present in a config table.
    pub fn config(mut self, config: &SidebarConfig) -> Self {
        if let Some(secs) = config.timeout_secs {
            self.opts.timeout = Duration::from_secs(secs);
        }
        if let Some(ref ua) = config.user_agent {
            self.opts.user_agent = ua.clone();
        }
        if let Some(ref path) = config.sidebars_path {
            self.opts.sidebars_path = path.clone();
        }
        self.opts
            .headers
            .extend(config.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client. Timeout and user agent are then the client's own.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Set the path of the sidebars page.
    pub fn sidebars_path(mut self, path: impl Into<String>) -> Self {
        self.opts.sidebars_path = path.into();
        self
    }

    /// Build the SidebarClient with the configured options.
    pub fn build(self) -> Result<SidebarClient, SidebarError> {
        SidebarClient::new(self.opts)
    }
}

impl Default for SidebarClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_table_parses_kebab_case() {
        let config: SidebarConfig = toml::from_str(
            r#"
            timeout-secs = 3
            sidebars-path = "/asides"

            [headers]
            x-preview = "1"
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, Some(3));
        assert_eq!(config.sidebars_path.as_deref(), Some("/asides"));
        assert_eq!(config.user_agent, None);
        assert_eq!(config.headers.get("x-preview").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_config_overrides_only_set_keys() {
        let builder = SidebarClientBuilder::new().user_agent("custom").config(&SidebarConfig {
            timeout_secs: Some(2),
            ..Default::default()
        });
        assert_eq!(builder.opts.timeout, Duration::from_secs(2));
        assert_eq!(builder.opts.user_agent, "custom");
        assert_eq!(builder.opts.sidebars_path, DEFAULT_SIDEBARS_PATH);
    }
}
