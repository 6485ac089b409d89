use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single loader call. A call completes with either this or a
/// [`crate::TransformOutput`], never both.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// An alternate engine was supplied without a callable `transform`.
    #[error("options.implementation.transform must be a transform function. Received {received}")]
    InvalidImplementation { received: &'static str },

    #[error("invalid loader options: {0}")]
    InvalidOptions(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Engine failures are forwarded as the engine reported them.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),

    #[error("engine produced an unreadable source map: {0}")]
    SourceMap(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `path` is relative to the locator's working directory.
    #[error("Failed to parse tsconfig at {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to read tsconfig at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigError::Parse { path, .. } | ConfigError::Read { path, .. } => path,
        }
    }
}
