//! Error taxonomy for schema compilation and config loading.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The stored schema text is not parseable JSON.
    #[error("malformed schema at JSON path {path}: {message}")]
    MalformedSchema {
        path: String,
        message: String,
    },

    /// A nested model sits deeper than the compiler allows.
    #[error("schema nesting exceeds max depth {max_depth} (at model `{model}`)")]
    DepthExceeded {
        model: String,
        max_depth: usize,
    },

    /// Persona config text failed to deserialize.
    #[error("invalid config at JSON path {path}: {message}")]
    InvalidConfig {
        path: String,
        message: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
