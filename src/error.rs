//! Typed errors surfaced to callers of the loading and config layers.

use std::path::PathBuf;

use thiserror::Error;

/// Structural problems with a catalog table.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog has no planet name column (expected 'planet_name' or 'pl_name')")]
    MissingIdentityColumn,

    #[error("unsupported catalog file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("catalog request failed with HTTP status {0}")]
    HttpStatus(u16),
}

/// Problems reading the TOML configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
