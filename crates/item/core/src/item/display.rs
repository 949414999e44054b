//! Display-oriented views over an item.
//!
//! Every value here is derived from the base type plus the combined magical
//! attributes and never touches the record:
//! Flat → %Inc → More → Less → Clamp.
use super::{CharacterContext, Item, MagicalAttribute, stat, stat_total};
use crate::codec::QualityData;
use crate::env::{ItemEnv, OracleError};

/// A single bonus applied to a displayed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Flat additive bonus (applied first)
    Flat(i32),

    /// Percentage increase, summed with other %Inc before multiplying
    Increased(i32),

    /// Multiplicative modifier (50 = ×1.5)
    More(i32),

    /// Multiplicative reduction (10 = ×0.9)
    Less(i32),
}

/// Bonuses applied in a fixed order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    /// ```text
    /// result = clamp((base + flat) × (1 + inc/100) × more × less, min, max)
    /// ```
    pub fn apply(&self, base: i64, min: i64, max: i64) -> i64 {
        let mut flat = 0i64;
        let mut increased = 0i64;
        for bonus in &self.bonuses {
            match *bonus {
                Bonus::Flat(v) => flat += i64::from(v),
                Bonus::Increased(p) => increased += i64::from(p),
                _ => {}
            }
        }
        let mut value = (base + flat) * (100 + increased) / 100;
        for bonus in &self.bonuses {
            match *bonus {
                Bonus::More(p) => value = value * (100 + i64::from(p)) / 100,
                Bonus::Less(p) => value = value * (100 - i64::from(p)) / 100,
                _ => {}
            }
        }
        value.clamp(min, max)
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

impl BonusStack {
    pub fn flat(mut self, value: i32) -> Self {
        self.add(Bonus::Flat(value));
        self
    }

    pub fn increased(mut self, percent: i32) -> Self {
        self.add(Bonus::Increased(percent));
        self
    }

    pub fn more(mut self, percent: i32) -> Self {
        self.add(Bonus::More(percent));
        self
    }

    pub fn less(mut self, percent: i32) -> Self {
        self.add(Bonus::Less(percent));
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

/// Damage ranges for each grip the type supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayedDamage {
    pub one_hand: Option<DamageRange>,
    pub two_hand: Option<DamageRange>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayedDurability {
    pub current: u32,
    pub max: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requirements {
    pub level: u8,
    pub strength: u32,
    pub dexterity: u32,
}

const ETHEREAL_MORE: i32 = 50;
const ETHEREAL_REQUIREMENT_REDUCTION: i32 = 10;

fn total(lines: &[MagicalAttribute], id: u16) -> i32 {
    stat_total(lines, id).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Per-level stats are stored in eighths of a point.
fn per_level(lines: &[MagicalAttribute], id: u16, ctx: CharacterContext) -> i32 {
    total(lines, id).saturating_mul(i32::from(ctx.level)) / 8
}

impl Item {
    pub fn displayed_defense(&self, ctx: CharacterContext) -> u32 {
        if !self.kind.has_defense() {
            return 0;
        }
        let lines = self.combined_magical_attributes();
        let mut stack = BonusStack::new()
            .flat(total(lines, stat::DEFENSE))
            .flat(per_level(lines, stat::DEFENSE_PER_LEVEL, ctx))
            .increased(total(lines, stat::DEFENSE_PERCENT));
        if self.is_ethereal() {
            stack = stack.more(ETHEREAL_MORE);
        }
        stack.apply(i64::from(self.defense()), 0, i64::from(u32::MAX)) as u32
    }

    /// `None` for types without durability and for indestructible items.
    pub fn displayed_durability(&self) -> Option<DisplayedDurability> {
        if !self.kind.has_durability() || self.is_simple() || self.is_indestructible() {
            return None;
        }
        let lines = self.combined_magical_attributes();
        let durability = self.durability();
        let max = BonusStack::new()
            .flat(total(lines, stat::MAX_DURABILITY))
            .increased(total(lines, stat::MAX_DURABILITY_PERCENT))
            .apply(i64::from(durability.max), 1, i64::from(u32::MAX)) as u32;
        Some(DisplayedDurability {
            current: u32::from(durability.current).min(max),
            max,
        })
    }

    pub fn displayed_damage(&self, ctx: CharacterContext) -> DisplayedDamage {
        if !self.is_weapon() {
            return DisplayedDamage::default();
        }
        let lines = self.combined_magical_attributes();
        let enhanced = total(lines, stat::ENHANCED_DAMAGE);
        let flat_min = total(lines, stat::MIN_DAMAGE);
        let flat_max = total(lines, stat::MAX_DAMAGE) + per_level(lines, stat::MAX_DAMAGE_PER_LEVEL, ctx);
        let ethereal = self.is_ethereal();

        let range = |min: u16, max: u16| {
            if max == 0 {
                return None;
            }
            let scale = |base: u16, flat: i32| {
                let mut stack = BonusStack::new().flat(flat).increased(enhanced);
                if ethereal {
                    stack = stack.more(ETHEREAL_MORE);
                }
                stack.apply(i64::from(base), 1, i64::from(u32::MAX)) as u32
            };
            let min = scale(min, flat_min);
            let max = scale(max, flat_max).max(min);
            Some(DamageRange { min, max })
        };

        DisplayedDamage {
            one_hand: if self.is_two_handed() {
                None
            } else {
                range(self.kind.min_damage, self.kind.max_damage)
            },
            two_hand: range(self.kind.two_hand_min_damage, self.kind.two_hand_max_damage),
        }
    }

    pub fn displayed_requirements(&self) -> Requirements {
        let lines = self.combined_magical_attributes();
        let mut stack = BonusStack::new().increased(total(lines, stat::REQUIREMENTS_PERCENT));
        if self.is_ethereal() {
            stack = stack.flat(-ETHEREAL_REQUIREMENT_REDUCTION);
        }
        let scale = |base: u16| {
            if base == 0 {
                0
            } else {
                stack.apply(i64::from(base), 0, i64::from(u32::MAX)) as u32
            }
        };
        Requirements {
            level: self.required_level(),
            strength: scale(self.kind.required_strength),
            dexterity: scale(self.kind.required_dexterity),
        }
    }

    /// Name as the game composes it from quality, affixes and runeword.
    pub fn display_name(&self, env: &ItemEnv<'_>) -> Result<String, OracleError> {
        if let Some(ear) = self.ear_attributes() {
            return Ok(format!("{}'s Ear", ear.name));
        }
        let affixes = env.affixes()?;
        let base = self.kind.name.as_str();

        let name = if let Some(runeword) = self.runeword(affixes) {
            runeword.name.clone()
        } else {
            match self.quality_data() {
                QualityData::Unique(id) => affixes
                    .unique_item(id)
                    .map_or_else(|| base.to_string(), |u| u.name.clone()),
                QualityData::Set(id) => affixes
                    .set_item(id)
                    .map_or_else(|| base.to_string(), |s| s.name.clone()),
                QualityData::Rare {
                    prefix_name,
                    suffix_name,
                    ..
                } => {
                    let prefix = affixes.rare_prefix(u16::from(prefix_name)).unwrap_or_default();
                    let suffix = affixes.rare_suffix(u16::from(suffix_name)).unwrap_or_default();
                    format!("{prefix} {suffix}").trim().to_string()
                }
                QualityData::Magic { prefix, suffix } => {
                    let mut parts = Vec::with_capacity(3);
                    if let Some(p) = affixes.magic_prefix(prefix) {
                        parts.push(p.name.as_str());
                    }
                    parts.push(base);
                    if let Some(s) = affixes.magic_suffix(suffix) {
                        parts.push(s.name.as_str());
                    }
                    parts.join(" ")
                }
                QualityData::Grade(_) if self.quality() == crate::codec::Quality::Superior => {
                    format!("Superior {base}")
                }
                QualityData::Grade(_) => format!("Crude {base}"),
                QualityData::None => base.to_string(),
            }
        };

        Ok(match self.personalized_name() {
            Some(owner) => format!("{owner}'s {name}"),
            None => name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AffixOracle, ModRange};
    use crate::testing;
    use crate::version::ItemVersion;

    #[test]
    fn stack_applies_flat_before_percent() {
        let stack = BonusStack::new().flat(5).increased(20).increased(15).more(50).less(10);
        // (10 + 5) × 1.35 = 20, × 1.5 = 30, × 0.9 = 27
        assert_eq!(stack.apply(10, 0, 100), 27);
        assert_eq!(BonusStack::new().apply(42, 0, 10), 10);
        assert!(BonusStack::new().is_empty());
    }

    #[test]
    fn per_level_bonus_saturates() {
        let catalogue = testing::catalogue();
        let def = catalogue.affixes.stat(stat::DEFENSE_PER_LEVEL).unwrap();
        let m = ModRange::fixed(def.id, i32::MAX);
        let lines = [MagicalAttribute::from_mod(&m, i32::MAX, def, ItemVersion::V110)];
        let bonus = per_level(&lines, stat::DEFENSE_PER_LEVEL, CharacterContext::new(99));
        assert_eq!(bonus, i32::MAX / 8);
        assert_eq!(per_level(&lines, stat::DEFENSE, CharacterContext::new(99)), 0);
    }
}
