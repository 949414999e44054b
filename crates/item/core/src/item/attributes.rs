//! Resolved magical property lines.
use arrayvec::ArrayVec;

use crate::codec::{CodecError, RawProperty};
use crate::config::EngineConfig;
use crate::env::{AffixOracle, ModRange, StatDefinition};
use crate::version::ItemVersion;

/// One property line with the stat bias removed.
///
/// For parameterised stats the first value is the parameter (a skill or
/// class id) and is kept as stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicalAttribute {
    pub id: u16,
    pub values: ArrayVec<i64, { EngineConfig::MAX_STAT_VALUES }>,
    pub version: ItemVersion,
    pub desc_priority: u16,
    pub parameterised: bool,
    pub bitflag: bool,
    save_add: i32,
}

impl MagicalAttribute {
    /// Resolves a stored property against its stat definition.
    pub fn resolve(raw: &RawProperty, def: &StatDefinition, version: ItemVersion) -> Self {
        let parameterised = def.is_parameterised();
        let values = raw
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if i == 0 && parameterised {
                    i64::from(v)
                } else {
                    i64::from(v) - i64::from(def.save_add)
                }
            })
            .collect();
        Self {
            id: def.id,
            values,
            version,
            desc_priority: def.desc_priority,
            parameterised,
            bitflag: def.bitflag,
            save_add: def.save_add,
        }
    }

    /// Line granted by a catalogue mod with a chosen value.
    pub fn from_mod(m: &ModRange, value: i32, def: &StatDefinition, version: ItemVersion) -> Self {
        let mut values = ArrayVec::new();
        if def.is_parameterised() {
            values.push(i64::from(m.param));
        }
        for _ in 0..=def.chain {
            if values.is_full() {
                break;
            }
            values.push(i64::from(value));
        }
        Self {
            id: def.id,
            values,
            version,
            desc_priority: def.desc_priority,
            parameterised: def.is_parameterised(),
            bitflag: def.bitflag,
            save_add: def.save_add,
        }
    }

    /// Re-applies the bias for storage.
    pub fn to_raw(&self) -> RawProperty {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if i == 0 && self.parameterised {
                    v as u32
                } else {
                    (v + i64::from(self.save_add)).max(0) as u32
                }
            })
            .collect();
        RawProperty {
            stat: self.id,
            values,
        }
    }

    pub fn param(&self) -> Option<i64> {
        self.parameterised.then(|| self.values.first().copied()).flatten()
    }

    /// First value after the parameter.
    pub fn value(&self) -> i64 {
        let skip = usize::from(self.parameterised);
        self.values.get(skip).copied().unwrap_or(0)
    }

    /// Lines with equal keys are combined into one.
    pub fn key(&self) -> (u16, Option<i64>) {
        (self.id, self.param())
    }

    fn merge(&mut self, other: &Self) {
        let skip = usize::from(self.parameterised);
        for (mine, theirs) in self.values.iter_mut().zip(&other.values).skip(skip) {
            if self.bitflag {
                *mine |= *theirs;
            } else {
                *mine += *theirs;
            }
        }
    }
}

/// Resolves a whole stored list.
pub(crate) fn resolve_list(
    list: &[RawProperty],
    affixes: &dyn AffixOracle,
    version: ItemVersion,
) -> Result<Vec<MagicalAttribute>, CodecError> {
    list.iter()
        .map(|raw| {
            let def = affixes
                .stat(raw.stat)
                .ok_or(CodecError::UnknownStat(raw.stat))?;
            Ok(MagicalAttribute::resolve(raw, def, version))
        })
        .collect()
}

/// Lines granted by a set of catalogue mods, each valued by `pick`.
pub(crate) fn from_mods(
    mods: &[ModRange],
    affixes: &dyn AffixOracle,
    version: ItemVersion,
    mut pick: impl FnMut(&ModRange) -> i32,
) -> Result<Vec<MagicalAttribute>, CodecError> {
    mods.iter()
        .map(|m| {
            let def = affixes.stat(m.stat).ok_or(CodecError::UnknownStat(m.stat))?;
            Ok(MagicalAttribute::from_mod(m, pick(m), def, version))
        })
        .collect()
}

pub(crate) fn to_raw_list(list: &[MagicalAttribute]) -> Vec<RawProperty> {
    list.iter().map(MagicalAttribute::to_raw).collect()
}

/// Merges lines sharing a key, then orders them by display priority
/// (highest first) and stat id.
pub fn combine<'a>(lines: impl IntoIterator<Item = &'a MagicalAttribute>) -> Vec<MagicalAttribute> {
    let mut combined: Vec<MagicalAttribute> = Vec::new();
    for line in lines {
        match combined.iter_mut().find(|c| c.key() == line.key()) {
            Some(existing) => existing.merge(line),
            None => combined.push(line.clone()),
        }
    }
    combined.sort_by(|a, b| {
        b.desc_priority
            .cmp(&a.desc_priority)
            .then(a.id.cmp(&b.id))
    });
    combined
}

/// Sum of the first values of every line for `stat`.
pub fn stat_total(lines: &[MagicalAttribute], stat: u16) -> i64 {
    lines
        .iter()
        .filter(|line| line.id == stat)
        .map(MagicalAttribute::value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn bias_is_removed_and_restored() {
        let catalogue = testing::catalogue();
        let defense = catalogue.affixes.stat(31).unwrap();
        let raw = RawProperty::from_values(defense, 0, &[25]);
        let line = MagicalAttribute::resolve(&raw, defense, ItemVersion::V110);
        assert_eq!(line.value(), 25);
        assert_eq!(line.to_raw(), raw);
    }

    #[test]
    fn duplicates_sum_per_parameter() {
        let catalogue = testing::catalogue();
        let affixes = &catalogue.affixes;
        let skill = affixes.stat(97).unwrap();
        let strength = affixes.stat(0).unwrap();
        let lines = [
            MagicalAttribute::from_mod(&ModRange::fixed(0, 5), 5, strength, ItemVersion::V110),
            MagicalAttribute::from_mod(&ModRange::fixed(0, 3), 3, strength, ItemVersion::V110),
            MagicalAttribute::from_mod(&ModRange::fixed(97, 1).with_param(36), 1, skill, ItemVersion::V110),
            MagicalAttribute::from_mod(&ModRange::fixed(97, 2).with_param(40), 2, skill, ItemVersion::V110),
        ];
        let combined = combine(&lines);
        assert_eq!(combined.len(), 3);
        assert_eq!(stat_total(&combined, 0), 8);
        let fire = combined.iter().find(|l| l.param() == Some(36)).unwrap();
        assert_eq!(fire.value(), 1);
    }

    #[test]
    fn flag_stats_are_ored() {
        let catalogue = testing::catalogue();
        let indestructible = catalogue.affixes.stat(152).unwrap();
        let line = MagicalAttribute::from_mod(&ModRange::fixed(152, 1), 1, indestructible, ItemVersion::V110);
        let combined = combine([&line, &line]);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].value(), 1);
    }

    #[test]
    fn chained_values_share_the_rolled_value() {
        let catalogue = testing::catalogue();
        let enhanced = catalogue.affixes.stat(17).unwrap();
        let line = MagicalAttribute::from_mod(&ModRange::new(17, 20, 40), 30, enhanced, ItemVersion::V110);
        assert_eq!(line.values.as_slice(), &[30, 30]);
    }
}
