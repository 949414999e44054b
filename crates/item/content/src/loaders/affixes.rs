//! Stat and affix catalogue loader.
//!
//! One RON file carries every id-keyed table: stat encodings, magic
//! affixes, rare name fragments, set and unique items, and runewords.

use std::collections::BTreeSet;
use std::path::Path;

use item_core::env::RareName;
use item_core::{
    AffixDefinition, AffixSnapshot, ModRange, RunewordDefinition, SetItemDefinition,
    StatDefinition, UniqueDefinition,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{CatalogueFile, LoadResult, read_file};

/// Affix catalogue structure for RON files. Every table is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffixCatalog {
    pub stats: Vec<StatDefinition>,
    pub magic_prefixes: Vec<AffixDefinition>,
    pub magic_suffixes: Vec<AffixDefinition>,
    pub rare_prefixes: Vec<RareName>,
    pub rare_suffixes: Vec<RareName>,
    pub set_items: Vec<SetItemDefinition>,
    pub unique_items: Vec<UniqueDefinition>,
    pub runewords: Vec<RunewordDefinition>,
}

impl AffixCatalog {
    /// Checks id uniqueness per table and that every mod names a known stat.
    pub fn validate(&self) -> LoadResult<()> {
        unique_ids("stat", self.stats.iter().map(|s| s.id))?;
        unique_ids("magic prefix", self.magic_prefixes.iter().map(|a| a.id))?;
        unique_ids("magic suffix", self.magic_suffixes.iter().map(|a| a.id))?;
        unique_ids("rare prefix", self.rare_prefixes.iter().map(|n| n.id))?;
        unique_ids("rare suffix", self.rare_suffixes.iter().map(|n| n.id))?;
        unique_ids("set item", self.set_items.iter().map(|s| s.id))?;
        unique_ids("unique item", self.unique_items.iter().map(|u| u.id))?;
        unique_ids("runeword", self.runewords.iter().map(|r| r.id))?;

        let stats: BTreeSet<u16> = self.stats.iter().map(|s| s.id).collect();
        let check = |owner: &str, mods: &[ModRange]| -> LoadResult<()> {
            match mods.iter().find(|m| !stats.contains(&m.stat)) {
                Some(m) => anyhow::bail!("{} references unknown stat {}", owner, m.stat),
                None => Ok(()),
            }
        };
        for affix in self.magic_prefixes.iter().chain(&self.magic_suffixes) {
            check(&affix.name, &affix.mods)?;
        }
        for set in &self.set_items {
            check(&set.name, &set.mods)?;
            for bonus in &set.bonus_mods {
                check(&set.name, bonus)?;
            }
        }
        for unique in &self.unique_items {
            check(&unique.name, &unique.mods)?;
        }
        for runeword in &self.runewords {
            if runeword.runes.is_empty() {
                anyhow::bail!("Runeword '{}' lists no runes", runeword.name);
            }
            check(&runeword.name, &runeword.mods)?;
        }
        Ok(())
    }

    pub fn into_snapshot(self) -> AffixSnapshot {
        AffixSnapshot::new()
            .with_stats(self.stats)
            .with_magic_prefixes(self.magic_prefixes)
            .with_magic_suffixes(self.magic_suffixes)
            .with_rare_names(self.rare_prefixes, self.rare_suffixes)
            .with_set_items(self.set_items)
            .with_unique_items(self.unique_items)
            .with_runewords(self.runewords)
    }
}

fn unique_ids(table: &str, ids: impl Iterator<Item = u16>) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id {}", table, id);
        }
    }
    Ok(())
}

/// Loader for stat and affix tables from RON files.
pub struct AffixLoader;

impl AffixLoader {
    /// Load the affix catalogue from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing AffixCatalog
    pub fn load(path: &Path) -> LoadResult<AffixSnapshot> {
        let content = read_file(path, CatalogueFile::Affixes)?;
        Self::parse(&content)
    }

    /// Parse an affix catalogue from RON text.
    pub fn parse(content: &str) -> LoadResult<AffixSnapshot> {
        let catalog: AffixCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse affix catalog RON: {}", e))?;
        catalog.validate()?;

        Ok(catalog.into_snapshot())
    }
}
