//! Regeneration of properties the fixed-length generations never stored.
//!
//! 1.00 to 1.04 records keep only an id/seed pair and a level; the game
//! re-derived quality, affixes, defense and property values from them every
//! time the item was loaded. 1.07 records store quality and affix ids but still
//! roll values and property lines from the seed.
use super::attributes::{MagicalAttribute, from_mods};
use crate::codec::{CodecError, Quality, QualityData};
use crate::env::{AffixDefinition, AffixOracle, ItemType, ItemTypeFlags, ModRange};
use crate::version::ItemVersion;

/// Linear congruential generator used by the fixed-length generations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacyRng {
    state: u64,
}

impl LegacyRng {
    const MULTIPLIER: u64 = 0x6AC6_90C5;

    pub const fn new(seed: u32, id: u32) -> Self {
        Self {
            state: (seed as u64) << 32 | id as u64,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let low = self.state & 0xFFFF_FFFF;
        let carry = self.state >> 32;
        self.state = low.wrapping_mul(Self::MULTIPLIER).wrapping_add(carry);
        self.state as u32
    }

    /// Uniform value in `0..max`; zero when `max` is zero.
    pub fn roll(&mut self, max: u32) -> u32 {
        if max == 0 { 0 } else { self.next_u32() % max }
    }

    /// Value within an inclusive range.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        min + self.roll((max - min + 1) as u32) as i32
    }
}

/// Values re-derived for one legacy record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyRoll {
    pub quality: Quality,
    pub quality_data: QualityData,
    /// Rolled defense for generations that do not store it.
    pub defense: Option<u16>,
    pub attributes: Vec<MagicalAttribute>,
}

/// Inputs of a regeneration.
pub(crate) struct LegacySource<'a> {
    pub version: ItemVersion,
    pub kind: &'a ItemType,
    pub level: u8,
    pub id: u32,
    pub seed: u32,
    /// Quality and data when the generation stores them.
    pub stored: Option<(Quality, QualityData)>,
}

const MAGICAL_TYPES: ItemTypeFlags = ItemTypeFlags::ARMOR
    .union(ItemTypeFlags::WEAPON)
    .union(ItemTypeFlags::RING)
    .union(ItemTypeFlags::AMULET);

impl LegacyRoll {
    /// Pure function of the record's type, level and seed pair.
    pub(crate) fn generate(
        source: &LegacySource<'_>,
        affixes: &dyn AffixOracle,
    ) -> Result<Self, CodecError> {
        let mut rng = LegacyRng::new(source.seed, source.id);
        let (quality, quality_data) = match source.stored {
            Some(stored) => stored,
            None if source.kind.is(MAGICAL_TYPES) => roll_quality(&mut rng, source, affixes),
            None => (Quality::Normal, QualityData::None),
        };

        let defense = if source.kind.has_defense() && source.version != ItemVersion::V107 {
            Some(rng.range(
                i32::from(source.kind.min_defense),
                i32::from(source.kind.max_defense),
            ) as u16)
        } else {
            None
        };

        let mods = quality_mods(&quality_data, affixes);
        let attributes = from_mods(&mods, affixes, source.version, |m| rng.range(m.min, m.max))?;
        tracing::trace!(%quality, lines = attributes.len(), "regenerated legacy properties");
        Ok(Self {
            quality,
            quality_data,
            defense,
            attributes,
        })
    }
}

fn eligible<'a>(
    list: Vec<&'a AffixDefinition>,
    kind: &ItemType,
    level: u8,
) -> Vec<&'a AffixDefinition> {
    list.into_iter()
        .filter(|a| kind.flags.intersects(a.applies_to) && a.level <= level)
        .collect()
}

fn pick<'a, T>(rng: &mut LegacyRng, list: &[&'a T]) -> Option<&'a T> {
    if list.is_empty() {
        return None;
    }
    list.get(rng.roll(list.len() as u32) as usize).copied()
}

fn roll_quality(
    rng: &mut LegacyRng,
    source: &LegacySource<'_>,
    affixes: &dyn AffixOracle,
) -> (Quality, QualityData) {
    let level = u32::from(source.level);
    let code = source.kind.code;
    let r = rng.roll(1024);

    if r < 8 + level / 8 {
        let uniques: Vec<_> = affixes
            .unique_items()
            .into_iter()
            .filter(|u| u.code == code && u.level <= source.level)
            .collect();
        if let Some(unique) = pick(rng, &uniques) {
            return (Quality::Unique, QualityData::Unique(unique.id));
        }
        return roll_rare(rng, source, affixes);
    }
    if r < 24 + level / 4 {
        let sets: Vec<_> = affixes
            .set_items()
            .into_iter()
            .filter(|s| s.code == code && s.level <= source.level)
            .collect();
        if let Some(set) = pick(rng, &sets) {
            return (Quality::Set, QualityData::Set(set.id));
        }
        return roll_rare(rng, source, affixes);
    }
    if r < 96 + level / 2 {
        return roll_rare(rng, source, affixes);
    }
    if r < 384 + level {
        return roll_magic(rng, source, affixes);
    }
    if r < 448 + level {
        return (Quality::Superior, QualityData::Grade(0));
    }
    if r > 1000 {
        return (Quality::Inferior, QualityData::Grade(0));
    }
    (Quality::Normal, QualityData::None)
}

fn roll_magic(
    rng: &mut LegacyRng,
    source: &LegacySource<'_>,
    affixes: &dyn AffixOracle,
) -> (Quality, QualityData) {
    let prefixes = eligible(affixes.magic_prefixes(), source.kind, source.level);
    let suffixes = eligible(affixes.magic_suffixes(), source.kind, source.level);
    let shape = rng.roll(3);
    let prefix = if shape != 1 { pick(rng, &prefixes).map_or(0, |a| a.id) } else { 0 };
    let suffix = if shape != 0 { pick(rng, &suffixes).map_or(0, |a| a.id) } else { 0 };
    (Quality::Magic, QualityData::Magic { prefix, suffix })
}

fn roll_rare(
    rng: &mut LegacyRng,
    source: &LegacySource<'_>,
    affixes: &dyn AffixOracle,
) -> (Quality, QualityData) {
    let names = (affixes.rare_prefixes(), affixes.rare_suffixes());
    let (Some(prefix_name), Some(suffix_name)) = (pick(rng, &names.0), pick(rng, &names.1)) else {
        return roll_magic(rng, source, affixes);
    };
    let prefixes = eligible(affixes.magic_prefixes(), source.kind, source.level);
    let suffixes = eligible(affixes.magic_suffixes(), source.kind, source.level);
    let count = 3 + rng.roll(4) as usize;
    let mut slots = [None; 6];
    for (i, slot) in slots.iter_mut().enumerate().take(count) {
        let pool = if i % 2 == 0 { &prefixes } else { &suffixes };
        *slot = pick(rng, pool).map(|a| a.id);
    }
    (
        Quality::Rare,
        QualityData::Rare {
            prefix_name: prefix_name.id as u8,
            suffix_name: suffix_name.id as u8,
            affixes: slots,
        },
    )
}

/// Catalogue mods granted by a quality selection.
pub(crate) fn quality_mods(data: &QualityData, affixes: &dyn AffixOracle) -> Vec<ModRange> {
    let mut mods = Vec::new();
    match *data {
        QualityData::None | QualityData::Grade(_) => {}
        QualityData::Magic { prefix, suffix } => {
            if let Some(a) = affixes.magic_prefix(prefix) {
                mods.extend_from_slice(&a.mods);
            }
            if let Some(a) = affixes.magic_suffix(suffix) {
                mods.extend_from_slice(&a.mods);
            }
        }
        QualityData::Set(id) => {
            if let Some(set) = affixes.set_item(id) {
                mods.extend_from_slice(&set.mods);
            }
        }
        QualityData::Unique(id) => {
            if let Some(unique) = affixes.unique_item(id) {
                mods.extend_from_slice(&unique.mods);
            }
        }
        QualityData::Rare { affixes: slots, .. } => {
            for (i, id) in slots.iter().enumerate() {
                let Some(id) = *id else { continue };
                let def = if i % 2 == 0 {
                    affixes.magic_prefix(id)
                } else {
                    affixes.magic_suffix(id)
                };
                if let Some(def) = def {
                    mods.extend_from_slice(&def.mods);
                }
            }
        }
    }
    mods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemCode, ItemTypeOracle};
    use crate::testing;

    #[test]
    fn generator_carries_the_high_word() {
        let mut rng = LegacyRng::new(1, 2);
        let first = rng.next_u32();
        assert_eq!(u64::from(first), (2 * 0x6AC6_90C5 + 1) & 0xFFFF_FFFF);
        let mut same = LegacyRng::new(1, 2);
        assert_eq!(same.next_u32(), first);
        assert_eq!(LegacyRng::new(0, 0).roll(10), 0);
    }

    #[test]
    fn regeneration_is_deterministic() {
        let catalogue = testing::catalogue();
        let kind = catalogue
            .types
            .item_type(ItemCode::new("cap").unwrap())
            .unwrap();
        let source = LegacySource {
            version: ItemVersion::V100,
            kind,
            level: 30,
            id: 0x1234_5678,
            seed: 0x9ABC_DEF0,
            stored: None,
        };
        let first = LegacyRoll::generate(&source, &catalogue.affixes).unwrap();
        let second = LegacyRoll::generate(&source, &catalogue.affixes).unwrap();
        assert_eq!(first, second);
        let defense = first.defense.unwrap();
        assert!((kind.min_defense..=kind.max_defense).contains(&defense));
    }

    #[test]
    fn stored_quality_is_kept() {
        let catalogue = testing::catalogue();
        let kind = catalogue
            .types
            .item_type(ItemCode::new("lsd").unwrap())
            .unwrap();
        let stored = (Quality::Magic, QualityData::Magic { prefix: 1, suffix: 0 });
        let source = LegacySource {
            version: ItemVersion::V107,
            kind,
            level: 10,
            id: 5,
            seed: 6,
            stored: Some(stored),
        };
        let roll = LegacyRoll::generate(&source, &catalogue.affixes).unwrap();
        assert_eq!((roll.quality, roll.quality_data), stored);
        assert!(roll.defense.is_none());
        assert!(!roll.attributes.is_empty());
    }
}
