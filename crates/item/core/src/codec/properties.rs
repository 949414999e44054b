//! Magic property lists.
//!
//! A list is a chain of 9-bit stat ids, each followed by the stat's values
//! (an optional parameter, then one value plus `chain` more), and terminated
//! by the id `0x1FF`.
use arrayvec::ArrayVec;

use super::CodecError;
use super::encode::check_width;
use super::fields::FieldId;
use super::walker::Walker;
use crate::bits::BitBuffer;
use crate::config::EngineConfig;
use crate::env::{AffixOracle, StatDefinition};

/// Stat id closing a property list.
pub const PROPERTY_TERMINATOR: u16 = 0x1FF;
pub const STAT_ID_BITS: u32 = 9;

/// One property exactly as stored: stat id plus raw, biased values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawProperty {
    pub stat: u16,
    pub values: ArrayVec<u32, { EngineConfig::MAX_STAT_VALUES }>,
}

impl RawProperty {
    /// Builds a property from displayed values, applying the stat's bias.
    pub fn from_values(def: &StatDefinition, param: u32, values: &[i64]) -> Self {
        let mut raw = ArrayVec::new();
        if def.is_parameterised() {
            raw.push(param);
        }
        for &value in values.iter().take(EngineConfig::MAX_STAT_VALUES - raw.len()) {
            raw.push((value + i64::from(def.save_add)).max(0) as u32);
        }
        Self {
            stat: def.id,
            values: raw,
        }
    }
}

/// Reads one list, validating every stat against the catalogue.
pub(crate) fn read_list(
    walker: &mut Walker<'_>,
    affixes: &dyn AffixOracle,
) -> Result<Vec<RawProperty>, CodecError> {
    let mut list = Vec::new();
    loop {
        let stat = walker.read(STAT_ID_BITS)? as u16;
        if stat == PROPERTY_TERMINATOR {
            return Ok(list);
        }
        let def = affixes.stat(stat).ok_or(CodecError::UnknownStat(stat))?;
        let count = def.value_count();
        if count > EngineConfig::MAX_STAT_VALUES {
            return Err(CodecError::PropertyChainTooLong {
                stat,
                values: count,
            });
        }
        let mut values = ArrayVec::new();
        if def.is_parameterised() {
            values.push(walker.read(u32::from(def.param_bits))?);
        }
        for _ in 0..=def.chain {
            values.push(walker.read(u32::from(def.save_bits))?);
        }
        list.push(RawProperty { stat, values });
    }
}

/// Appends one list (with terminator) at `cursor`. `field` names the section
/// in width errors.
pub(crate) fn write_list(
    buffer: &mut BitBuffer,
    cursor: &mut usize,
    field: FieldId,
    list: &[RawProperty],
    affixes: &dyn AffixOracle,
) -> Result<(), CodecError> {
    for property in list {
        let def = affixes
            .stat(property.stat)
            .ok_or(CodecError::UnknownStat(property.stat))?;
        let expected = def.value_count();
        if expected > EngineConfig::MAX_STAT_VALUES {
            return Err(CodecError::PropertyChainTooLong {
                stat: property.stat,
                values: expected,
            });
        }
        if property.values.len() != expected {
            return Err(CodecError::ValueCountMismatch {
                stat: property.stat,
                expected,
                found: property.values.len(),
            });
        }
        check_width(field, STAT_ID_BITS, u64::from(property.stat))?;
        buffer.set_bits(cursor, STAT_ID_BITS, u32::from(property.stat));
        for (i, &value) in property.values.iter().enumerate() {
            let width = u32::from(if i == 0 && def.is_parameterised() {
                def.param_bits
            } else {
                def.save_bits
            });
            check_width(field, width, u64::from(value))?;
            buffer.set_bits(cursor, width, value);
        }
    }
    buffer.set_bits(cursor, STAT_ID_BITS, u32::from(PROPERTY_TERMINATOR));
    Ok(())
}

/// Encodes a list into a standalone section. Returns the bits and their width.
pub(crate) fn encode_list(
    field: FieldId,
    list: &[RawProperty],
    affixes: &dyn AffixOracle,
) -> Result<(BitBuffer, usize), CodecError> {
    let mut section = BitBuffer::new();
    let mut cursor = 0;
    write_list(&mut section, &mut cursor, field, list, affixes)?;
    Ok((section, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn lists_round_trip_through_the_catalogue() {
        let catalogue = testing::catalogue();
        let affixes = &catalogue.affixes;
        let strength = affixes.stat(0).unwrap();
        let skill = affixes.stat(97).unwrap();
        let list = vec![
            RawProperty::from_values(strength, 0, &[5]),
            RawProperty::from_values(skill, 36, &[2]),
        ];
        let (section, width) = encode_list(FieldId::MagicProperties, &list, affixes).unwrap();
        let expected = 9 + strength.save_bits as usize
            + 9 + (skill.param_bits + skill.save_bits) as usize
            + 9;
        assert_eq!(width, expected);

        let mut walker = Walker::new(section.as_bytes(), 0);
        assert_eq!(read_list(&mut walker, affixes).unwrap(), list);
        assert_eq!(walker.pos(), width);
    }

    #[test]
    fn unknown_stat_is_corruption() {
        let catalogue = testing::catalogue();
        let mut section = BitBuffer::new();
        let mut cursor = 0;
        section.set_bits(&mut cursor, STAT_ID_BITS, 300);
        section.set_bits(&mut cursor, 16, 0);
        let mut walker = Walker::new(section.as_bytes(), 0);
        assert_eq!(
            read_list(&mut walker, &catalogue.affixes),
            Err(CodecError::UnknownStat(300))
        );
    }

    #[test]
    fn over_long_chain_is_corruption() {
        let catalogue = testing::catalogue();
        let mut section = BitBuffer::new();
        let mut cursor = 0;
        section.set_bits(&mut cursor, STAT_ID_BITS, u32::from(testing::STAT_OVERLONG));
        section.set_bits(&mut cursor, 32, 0);
        let mut walker = Walker::new(section.as_bytes(), 0);
        assert!(matches!(
            read_list(&mut walker, &catalogue.affixes),
            Err(CodecError::PropertyChainTooLong { values: 5, .. })
        ));
    }

    #[test]
    fn values_wider_than_the_stat_are_refused() {
        let catalogue = testing::catalogue();
        let affixes = &catalogue.affixes;
        let strength = affixes.stat(0).unwrap();
        let width = u32::from(strength.save_bits);
        let mut property = RawProperty::from_values(strength, 0, &[5]);
        property.values[0] = 1 << width;
        assert_eq!(
            encode_list(FieldId::RunewordProperties, &[property], affixes),
            Err(CodecError::ValueOutOfRange {
                field: FieldId::RunewordProperties,
                value: 1 << width,
                width,
            })
        );
    }

    #[test]
    fn bias_is_applied_when_building_from_values() {
        let catalogue = testing::catalogue();
        let defense = catalogue.affixes.stat(31).unwrap();
        let property = RawProperty::from_values(defense, 0, &[15]);
        assert_eq!(property.values.as_slice(), &[15 + defense.save_add as u32]);
    }
}
