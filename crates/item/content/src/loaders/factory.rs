//! Content factory for building catalogues from data files.

use std::path::{Path, PathBuf};

use item_core::{
    AffixSnapshot, CatalogueSnapshot, EngineConfig, ItemTypeFlags, ItemTypeOracle, TypeSnapshot,
};

use crate::loaders::{AffixLoader, CatalogueFile, ConfigLoader, LoadResult, TypeLoader};

/// Content factory that loads all catalogue data from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── types.ron
/// └── affixes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join(CatalogueFile::Config.file_name());
        ConfigLoader::load(&path)
    }

    /// Load item types from `types.ron`.
    pub fn load_types(&self) -> LoadResult<TypeSnapshot> {
        let path = self.data_dir.join(CatalogueFile::Types.file_name());
        TypeLoader::load(&path)
    }

    /// Load stat and affix tables from `affixes.ron`.
    pub fn load_affixes(&self) -> LoadResult<AffixSnapshot> {
        let path = self.data_dir.join(CatalogueFile::Affixes.file_name());
        AffixLoader::load(&path)
    }

    /// Load both catalogues and check the references between them.
    ///
    /// Set and unique items must name a known base type, every runeword
    /// rune must be a rune type and socket bonuses must use known stats.
    pub fn load_catalogue(&self) -> LoadResult<CatalogueSnapshot> {
        let types = self.load_types()?;
        let affixes = self.load_affixes()?;

        for kind in types.types.values() {
            let mods = &kind.socket_mods;
            let mut all = mods.weapon.iter().chain(&mods.armor).chain(&mods.shield);
            if let Some(unknown) = all.find(|m| !affixes.stats.contains_key(&m.stat)) {
                anyhow::bail!(
                    "Item type '{}' grants unknown stat {} when socketed",
                    kind.code,
                    unknown.stat
                );
            }
        }

        for set in affixes.set_items.values() {
            if types.item_type(set.code).is_none() {
                anyhow::bail!("Set item '{}' uses unknown type '{}'", set.name, set.code);
            }
        }
        for unique in affixes.unique_items.values() {
            if types.item_type(unique.code).is_none() {
                anyhow::bail!(
                    "Unique item '{}' uses unknown type '{}'",
                    unique.name,
                    unique.code
                );
            }
        }
        for runeword in affixes.runewords.values() {
            for rune in &runeword.runes {
                let is_rune = types
                    .item_type(*rune)
                    .is_some_and(|kind| kind.is(ItemTypeFlags::RUNE));
                if !is_rune {
                    anyhow::bail!("Runeword '{}' uses '{}', which is not a rune", runeword.name, rune);
                }
            }
        }

        tracing::debug!(
            data_dir = %self.data_dir.display(),
            types = types.len(),
            stats = affixes.stats.len(),
            runewords = affixes.runewords.len(),
            "loaded catalogue"
        );
        Ok(CatalogueSnapshot::new(types, affixes))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
