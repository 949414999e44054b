//! Engine configuration loader.

use std::path::Path;

use item_core::EngineConfig;

use crate::loaders::{CatalogueFile, LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing EngineConfig
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path, CatalogueFile::Config)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        for (name, grid) in [
            ("inventory", config.inventory),
            ("cube", config.cube),
            ("legacy_stash", config.legacy_stash),
            ("stash", config.stash),
            ("remaster_stash", config.remaster_stash),
        ] {
            if grid.width == 0 || grid.height == 0 || grid.width > 16 || grid.height > 16 {
                anyhow::bail!(
                    "Grid '{}' has unusable dimensions {}x{}",
                    name,
                    grid.width,
                    grid.height
                );
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grids_must_fit_the_location_fields() {
        let config = ConfigLoader::parse(
            r#"
            inventory = { width = 10, height = 4 }
            cube = { width = 3, height = 4 }
            legacy_stash = { width = 6, height = 4 }
            stash = { width = 6, height = 8 }
            remaster_stash = { width = 10, height = 10 }
            "#,
        )
        .unwrap();
        assert_eq!(config, EngineConfig::default());

        let err = ConfigLoader::parse(
            r#"
            inventory = { width = 10, height = 4 }
            cube = { width = 0, height = 4 }
            legacy_stash = { width = 6, height = 4 }
            stash = { width = 6, height = 8 }
            remaster_stash = { width = 10, height = 10 }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cube"));
    }
}
