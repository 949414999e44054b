//! In-memory catalogue snapshots.
//!
//! Snapshots own their entries in ordered maps and implement the oracle traits
//! directly. Loaders build them from data files; tests build them in code.
use std::collections::BTreeMap;

use super::{
    AffixDefinition, AffixOracle, Env, ItemCode, ItemEnv, ItemType, ItemTypeOracle, RareName,
    RunewordDefinition, SetItemDefinition, StatDefinition, UniqueDefinition,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Item types keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeSnapshot {
    pub types: BTreeMap<ItemCode, ItemType>,
}

impl TypeSnapshot {
    pub fn new(types: impl IntoIterator<Item = ItemType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.code, t)).collect(),
        }
    }

    pub fn insert(&mut self, item_type: ItemType) {
        self.types.insert(item_type.code, item_type);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Stats, affixes, set and unique items, and runewords keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AffixSnapshot {
    pub stats: BTreeMap<u16, StatDefinition>,
    pub magic_prefixes: BTreeMap<u16, AffixDefinition>,
    pub magic_suffixes: BTreeMap<u16, AffixDefinition>,
    pub rare_prefixes: BTreeMap<u16, RareName>,
    pub rare_suffixes: BTreeMap<u16, RareName>,
    pub set_items: BTreeMap<u16, SetItemDefinition>,
    pub unique_items: BTreeMap<u16, UniqueDefinition>,
    pub runewords: BTreeMap<u16, RunewordDefinition>,
}

impl AffixSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, stats: impl IntoIterator<Item = StatDefinition>) -> Self {
        self.stats.extend(stats.into_iter().map(|s| (s.id, s)));
        self
    }

    pub fn with_magic_prefixes(mut self, affixes: impl IntoIterator<Item = AffixDefinition>) -> Self {
        self.magic_prefixes
            .extend(affixes.into_iter().map(|a| (a.id, a)));
        self
    }

    pub fn with_magic_suffixes(mut self, affixes: impl IntoIterator<Item = AffixDefinition>) -> Self {
        self.magic_suffixes
            .extend(affixes.into_iter().map(|a| (a.id, a)));
        self
    }

    pub fn with_rare_names(
        mut self,
        prefixes: impl IntoIterator<Item = RareName>,
        suffixes: impl IntoIterator<Item = RareName>,
    ) -> Self {
        self.rare_prefixes
            .extend(prefixes.into_iter().map(|n| (n.id, n)));
        self.rare_suffixes
            .extend(suffixes.into_iter().map(|n| (n.id, n)));
        self
    }

    pub fn with_set_items(mut self, items: impl IntoIterator<Item = SetItemDefinition>) -> Self {
        self.set_items.extend(items.into_iter().map(|s| (s.id, s)));
        self
    }

    pub fn with_unique_items(mut self, items: impl IntoIterator<Item = UniqueDefinition>) -> Self {
        self.unique_items
            .extend(items.into_iter().map(|u| (u.id, u)));
        self
    }

    pub fn with_runewords(mut self, runewords: impl IntoIterator<Item = RunewordDefinition>) -> Self {
        self.runewords
            .extend(runewords.into_iter().map(|r| (r.id, r)));
        self
    }
}

/// Complete catalogue: both snapshots bundled for building an [`ItemEnv`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogueSnapshot {
    pub types: TypeSnapshot,
    pub affixes: AffixSnapshot,
}

impl CatalogueSnapshot {
    pub fn new(types: TypeSnapshot, affixes: AffixSnapshot) -> Self {
        Self { types, affixes }
    }

    /// Borrows both snapshots as a trait-object environment.
    pub fn env(&self) -> ItemEnv<'_> {
        Env::with_all(
            &self.types as &dyn ItemTypeOracle,
            &self.affixes as &dyn AffixOracle,
        )
    }
}

// ============================================================================
// Oracle Implementations
// ============================================================================

impl ItemTypeOracle for TypeSnapshot {
    fn item_type(&self, code: ItemCode) -> Option<&ItemType> {
        self.types.get(&code)
    }
}

impl AffixOracle for AffixSnapshot {
    fn stat(&self, id: u16) -> Option<&StatDefinition> {
        self.stats.get(&id)
    }

    fn magic_prefix(&self, id: u16) -> Option<&AffixDefinition> {
        self.magic_prefixes.get(&id)
    }

    fn magic_suffix(&self, id: u16) -> Option<&AffixDefinition> {
        self.magic_suffixes.get(&id)
    }

    fn magic_prefixes(&self) -> Vec<&AffixDefinition> {
        self.magic_prefixes.values().collect()
    }

    fn magic_suffixes(&self) -> Vec<&AffixDefinition> {
        self.magic_suffixes.values().collect()
    }

    fn rare_prefix(&self, id: u16) -> Option<&str> {
        self.rare_prefixes.get(&id).map(|n| n.name.as_str())
    }

    fn rare_suffix(&self, id: u16) -> Option<&str> {
        self.rare_suffixes.get(&id).map(|n| n.name.as_str())
    }

    fn rare_prefixes(&self) -> Vec<&RareName> {
        self.rare_prefixes.values().collect()
    }

    fn rare_suffixes(&self) -> Vec<&RareName> {
        self.rare_suffixes.values().collect()
    }

    fn set_item(&self, id: u16) -> Option<&SetItemDefinition> {
        self.set_items.get(&id)
    }

    fn set_items(&self) -> Vec<&SetItemDefinition> {
        self.set_items.values().collect()
    }

    fn unique_item(&self, id: u16) -> Option<&UniqueDefinition> {
        self.unique_items.get(&id)
    }

    fn unique_items(&self) -> Vec<&UniqueDefinition> {
        self.unique_items.values().collect()
    }

    fn runeword(&self, id: u16) -> Option<&RunewordDefinition> {
        self.runewords.get(&id)
    }

    fn runewords(&self) -> Vec<&RunewordDefinition> {
        self.runewords.values().collect()
    }
}
