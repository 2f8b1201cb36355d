//! Data-driven content definitions and loaders.
//!
//! This crate turns data files into the static catalog and tunables the
//! simulation core runs on:
//! - Game configuration (data-driven via TOML)
//! - Action, item, skill, stat and enemy catalogs (data-driven via RON or JSON)
//!
//! Content is consumed by the runtime and never appears in player state.
//! Real numbers in data files become FixedPoint at load time, so nothing
//! downstream sees a float.
//!
//! A sample content pack ships under `data/` (see [`SAMPLE_DATA_DIR`]).

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogFile, CatalogLoader, ConfigLoader, ContentFactory, DataFormat, LoadResult};

/// Directory of the bundled sample content pack.
pub const SAMPLE_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
