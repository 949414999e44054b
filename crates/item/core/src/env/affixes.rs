//! Stat, affix, set, unique and runeword catalogue entries.
use super::types::{ItemCode, ItemTypeFlags};

/// Encoding rules for one numeric stat id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatDefinition {
    pub id: u16,
    pub name: String,
    /// Width of each stored value.
    pub save_bits: u8,
    /// Bias subtracted from stored values.
    pub save_add: i32,
    /// Width of the leading parameter; zero when the stat takes none.
    pub param_bits: u8,
    /// Extra values stored after the first one (min/max pairs and similar).
    pub chain: u8,
    /// Values combine with bitwise OR instead of addition.
    pub bitflag: bool,
    pub desc_priority: u16,
}

impl StatDefinition {
    pub fn new(id: u16, name: impl Into<String>, save_bits: u8) -> Self {
        Self {
            id,
            name: name.into(),
            save_bits,
            ..Self::default()
        }
    }

    pub fn with_save_add(mut self, save_add: i32) -> Self {
        self.save_add = save_add;
        self
    }

    pub fn with_param(mut self, param_bits: u8) -> Self {
        self.param_bits = param_bits;
        self
    }

    pub fn with_chain(mut self, chain: u8) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_priority(mut self, desc_priority: u16) -> Self {
        self.desc_priority = desc_priority;
        self
    }

    pub fn bitflag(mut self) -> Self {
        self.bitflag = true;
        self
    }

    pub fn is_parameterised(&self) -> bool {
        self.param_bits > 0
    }

    /// Values stored per occurrence, parameter included.
    pub fn value_count(&self) -> usize {
        usize::from(self.is_parameterised()) + 1 + self.chain as usize
    }
}

/// A stat granted with a value range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModRange {
    pub stat: u16,
    pub param: u32,
    pub min: i32,
    pub max: i32,
}

impl ModRange {
    pub const fn new(stat: u16, min: i32, max: i32) -> Self {
        Self {
            stat,
            param: 0,
            min,
            max,
        }
    }

    pub const fn fixed(stat: u16, value: i32) -> Self {
        Self::new(stat, value, value)
    }

    pub const fn with_param(mut self, param: u32) -> Self {
        self.param = param;
        self
    }
}

/// Magic prefix or suffix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AffixDefinition {
    pub id: u16,
    pub name: String,
    pub level: u8,
    pub required_level: u8,
    pub applies_to: ItemTypeFlags,
    pub mods: Vec<ModRange>,
}

/// Name fragment used by rare and crafted items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RareName {
    pub id: u16,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SetItemDefinition {
    pub id: u16,
    pub name: String,
    pub set_name: String,
    pub code: ItemCode,
    pub level: u8,
    pub required_level: u8,
    pub mods: Vec<ModRange>,
    /// Partial-set bonus lists selected by the record's bonus mask.
    pub bonus_mods: Vec<Vec<ModRange>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UniqueDefinition {
    pub id: u16,
    pub name: String,
    pub code: ItemCode,
    pub level: u8,
    pub required_level: u8,
    pub mods: Vec<ModRange>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunewordDefinition {
    pub id: u16,
    pub name: String,
    /// Rune type codes in socket order.
    pub runes: Vec<ItemCode>,
    pub applies_to: ItemTypeFlags,
    pub mods: Vec<ModRange>,
}

impl RunewordDefinition {
    /// True when `codes` spell this runeword exactly.
    pub fn matches(&self, codes: &[ItemCode]) -> bool {
        !self.runes.is_empty() && self.runes.as_slice() == codes
    }
}

/// Kind of affix-table lookup, used in error reporting.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AffixKind {
    MagicPrefix,
    MagicSuffix,
    RarePrefix,
    RareSuffix,
    SetItem,
    Unique,
    Runeword,
}
