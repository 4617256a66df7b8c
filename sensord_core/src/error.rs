//! Failure taxonomy for sensor discovery.
//!
//! Every variant carries the path it concerns so that per-source failures
//! can be logged with context and skipped without losing the error kind.

use std::path::PathBuf;
use thiserror::Error;

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The content-pack root itself could not be read. This is a
    /// configuration error and is always fatal to the caller.
    #[error("content root {path:?} is not a readable directory")]
    ContentRootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sensor definition file was requested explicitly but does not exist.
    #[error("sensor definition {0:?} does not exist")]
    DefinitionNotFound(PathBuf),

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The definition file exists but is not valid sensor metadata.
    #[error("malformed sensor definition {path:?}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The definition names an entry-point module that is not on disk.
    #[error("entry point {module:?} declared by {definition:?} does not exist")]
    ModuleMissing {
        definition: PathBuf,
        module: PathBuf,
    },
}
