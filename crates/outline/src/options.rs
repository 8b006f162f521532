// ABOUTME: Contents-widget options resolved from the #contents block's data attributes.
// ABOUTME: Attributes are tri-state (absent, "true", anything else); overrides come from callers or config files.

use serde::{Deserialize, Serialize};

/// Title shown when the block sets none.
pub const DEFAULT_TITLE: &str = "Table of Contents";

/// Attribute names read from the contents block.
pub mod attrs {
    pub const TITLE_ENABLED: &str = "data-title-enabled";
    pub const TITLE_TEXT: &str = "data-title-text";
    pub const MAIN_DROPDOWN_ENABLED: &str = "data-main-dropdown-enabled";
    pub const INDIVIDUAL_DROPDOWNS_ENABLED: &str = "data-individual-dropdowns-enabled";
    pub const OPEN_BY_DEFAULT: &str = "data-open-by-default";
}

/// Presentation switches for the rendered contents list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsOptions {
    pub title_enabled: bool,
    pub title_text: String,
    pub main_dropdown_enabled: bool,
    pub individual_dropdowns_enabled: bool,
    pub open_by_default: bool,
}

impl Default for ContentsOptions {
    fn default() -> Self {
        Self {
            title_enabled: true,
            title_text: DEFAULT_TITLE.to_string(),
            main_dropdown_enabled: true,
            individual_dropdowns_enabled: true,
            open_by_default: true,
        }
    }
}

/// Reads a boolean marker: unset means enabled, only the literal `"true"` enables otherwise.
fn flag(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v == "true",
    }
}

impl ContentsOptions {
    /// Resolve options from an attribute lookup on the contents block.
    ///
    /// Missing attributes fall back to the defaults; nothing here can fail.
    pub fn from_attrs<'a, F>(attr: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self {
            title_enabled: flag(attr(attrs::TITLE_ENABLED)),
            title_text: attr(attrs::TITLE_TEXT)
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            main_dropdown_enabled: flag(attr(attrs::MAIN_DROPDOWN_ENABLED)),
            individual_dropdowns_enabled: flag(attr(attrs::INDIVIDUAL_DROPDOWNS_ENABLED)),
            open_by_default: flag(attr(attrs::OPEN_BY_DEFAULT)),
        }
    }

    /// Apply caller overrides on top of the resolved values.
    pub fn with_overrides(mut self, overrides: &ContentsOverrides) -> Self {
        if let Some(v) = overrides.title_enabled {
            self.title_enabled = v;
        }
        if let Some(ref v) = overrides.title_text {
            self.title_text = v.clone();
        }
        if let Some(v) = overrides.main_dropdown_enabled {
            self.main_dropdown_enabled = v;
        }
        if let Some(v) = overrides.individual_dropdowns_enabled {
            self.individual_dropdowns_enabled = v;
        }
        if let Some(v) = overrides.open_by_default {
            self.open_by_default = v;
        }
        self
    }
}

/// Optional replacements for page-level settings, e.g. from a `[contents]` config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContentsOverrides {
    pub title_enabled: Option<bool>,
    pub title_text: Option<String>,
    pub main_dropdown_enabled: Option<bool>,
    pub individual_dropdowns_enabled: Option<bool>,
    pub open_by_default: Option<bool>,
}
