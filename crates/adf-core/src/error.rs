//! Error types for adf-core

use thiserror::Error;

use crate::plugin::PluginError;

/// Fatal conversion failures. No partial document is returned with these.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Malformed document root: {0}")]
    MalformedRoot(String),

    #[error("Failed to traverse: the document root was removed")]
    RootRemoved,

    #[error("Markdown encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl ConvertError {
    /// Create a malformed-root error from any message.
    pub fn malformed_root(msg: impl Into<String>) -> Self {
        Self::MalformedRoot(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
