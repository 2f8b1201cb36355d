//! Game configuration loader.

use std::path::Path;

use idle_core::GameConfig;

use crate::loaders::{DataFormat, LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        DataFormat::Toml
            .parse(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idle_core::FixedPoint;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("seed = 7\nxp_base = 150\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.xp_base, FixedPoint::from_int(150));
        assert_eq!(config.combat_respawn_ms, GameConfig::DEFAULT_COMBAT_RESPAWN_MS);
        assert_eq!(config.max_level, GameConfig::DEFAULT_MAX_LEVEL);
    }

    #[test]
    fn reals_become_fixed_point() {
        let config = ConfigLoader::parse("xp_growth_percent = 12.5").unwrap();
        assert_eq!(config.xp_growth_percent, FixedPoint::from_raw(12_500));
    }
}
