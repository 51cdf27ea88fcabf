//! Errors raised while converting authored configuration into the content model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("section '{0}' binds both an endpoint config and a descriptive page")]
    BothBindings(String),

    #[error("section '{0}' binds no content (expected `config` or `descriptiveConfig`)")]
    NoBinding(String),

    #[error("group '{group}' contains nested group '{child}'; groups only nest one level")]
    NestedGroup { group: String, child: String },

    #[error("group '{0}' cannot bind content directly")]
    GroupWithContent(String),

    #[error("invalid payload for '{tag}' content item: {source}")]
    ContentItem {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
