//! Content loaders for reading game data from files.
//!
//! Configuration is TOML; catalogs are RON or JSON, picked by file
//! extension.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{CatalogFile, CatalogLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Serialization format of a data file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Ron,
    Json,
    Toml,
}

impl DataFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Ok(Self::Ron),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => anyhow::bail!(
                "Unsupported data file extension {:?} for {}",
                other,
                path.display()
            ),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> LoadResult<T> {
        let value = match self {
            Self::Ron => ron::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(value)
    }
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses `path` in the format its extension names.
pub(crate) fn load_file<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let format = DataFormat::from_path(path)?;
    let content = read_file(path)?;
    format
        .parse(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {:?} file {}: {}", format, path.display(), e))
}
