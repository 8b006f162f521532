// ABOUTME: Error types for contents-list generation.
// ABOUTME: Only configuration can fail; absent page structure is reported through outcomes instead.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while configuring the contents plugin.
#[derive(Debug, Error)]
pub enum ContentsError {
    /// A configured CSS selector could not be parsed.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ContentsError {
    /// Creates an InvalidSelector error from the parser's message.
    pub fn invalid_selector(selector: impl Into<String>, reason: impl fmt::Display) -> Self {
        ContentsError::InvalidSelector {
            selector: selector.into(),
            reason: reason.to_string(),
        }
    }
}
