//! Writers producing a record from the neutral model.
use super::CodecError;
use super::fields::FieldId;
use super::header::{ItemFlags, RawLocation};
use super::layout::*;
use super::properties::write_list;
use super::quality::Quality;
use super::record::{ExtendedRecord, ItemRecord};
use crate::bits::BitBuffer;
use crate::config::EngineConfig;
use crate::env::{AffixKind, AffixOracle, ItemEnv, ItemType, ItemTypeFlags};
use crate::version::ItemVersion;

/// Checks that `text` can be stored as a terminated name.
pub(crate) fn validate_text(text: &str, char_width: u32) -> Result<(), CodecError> {
    let len = text.chars().count();
    let limit = 1u32 << char_width;
    if len == 0
        || len > EngineConfig::MAX_NAME_LEN
        || text.chars().any(|c| c == '\0' || (c as u32) >= limit)
    {
        return Err(CodecError::InvalidText);
    }
    Ok(())
}

/// Fails when `value` needs more than `width` bits.
pub(crate) fn check_width(field: FieldId, width: u32, value: u64) -> Result<(), CodecError> {
    if width < 64 && value >> width != 0 {
        return Err(CodecError::ValueOutOfRange {
            field,
            value,
            width,
        });
    }
    Ok(())
}

/// Checked in-place write for the fixed layouts.
fn store(
    data: &mut BitBuffer,
    offset: usize,
    width: u32,
    field: FieldId,
    value: u32,
) -> Result<(), CodecError> {
    check_width(field, width, u64::from(value))?;
    data.update_bits(offset, width, value)?;
    Ok(())
}

/// Checked append for the variable layouts.
fn put(
    data: &mut BitBuffer,
    cursor: &mut usize,
    width: u32,
    field: FieldId,
    value: u32,
) -> Result<(), CodecError> {
    check_width(field, width, u64::from(value))?;
    data.set_bits(cursor, width, value);
    Ok(())
}

fn location_bits(location: &RawLocation) -> Result<u32, CodecError> {
    let parts = [
        (location.primary, 3),
        (location.slot, 4),
        (location.x, 4),
        (location.y, 4),
        (location.page, 3),
    ];
    for (value, width) in parts {
        check_width(FieldId::Location, width, u64::from(value))?;
    }
    Ok(location.to_bits())
}

/// Stored tag: the record's raw tag when it agrees with its game mode,
/// otherwise the canonical tag for that mode.
fn version_tag(record: &ItemRecord, version: ItemVersion) -> Result<u16, CodecError> {
    let tag = match record.version_tag {
        Some(tag) if version.is_expansion_tag(tag) == record.expansion => tag,
        _ if record.expansion => version.expansion_tag(),
        _ => version.classic_tag(),
    };
    check_width(FieldId::VersionTag, version.version_tag_width(), u64::from(tag))?;
    Ok(tag)
}

/// Encodes one record, children excluded.
pub(crate) fn encode_record(
    record: &ItemRecord,
    version: ItemVersion,
    env: &ItemEnv<'_>,
) -> Result<BitBuffer, CodecError> {
    let affixes = env.affixes()?;
    let kind = if record.ear.is_some() {
        ItemType::ear()
    } else {
        env.types()?
            .item_type(record.code)
            .ok_or(CodecError::UnknownType(record.code))?
            .clone()
    };
    let data = match LegacyLayout::for_version(version) {
        Some(layout) => encode_legacy(record, version, layout, &kind)?,
        None => encode_variable(record, version, &kind, affixes)?,
    };
    tracing::debug!(%version, code = %record.code, bytes = data.len(), "encoded record");
    Ok(data)
}

fn encode_legacy(
    record: &ItemRecord,
    version: ItemVersion,
    layout: &LegacyLayout,
    kind: &ItemType,
) -> Result<BitBuffer, CodecError> {
    let flags = record.normalized_flags();
    for (flag, section) in [
        (ItemFlags::EAR, "ear"),
        (ItemFlags::PERSONALIZED, "personalization"),
        (ItemFlags::RUNEWORD, "runeword"),
    ] {
        if flags.contains(flag) {
            return Err(CodecError::UnsupportedSection { section, version });
        }
    }
    if kind.is(ItemTypeFlags::EXPANSION) {
        return Err(CodecError::VersionMismatch {
            code: record.code,
            version,
        });
    }

    let simple = record.extended.is_none();
    let mut data = BitBuffer::new();
    data.resize_bits(layout.bytes(simple) * 8);
    data.update_bits(0, MARKER_BITS, u32::from(ItemVersion::JM_MARKER))?;
    data.update_bits(LEGACY_FLAGS, FLAGS_BITS, flags.bits())?;
    data.update_bits(LEGACY_CODE, CODE_BITS, record.code.to_bits())?;
    data.update_bits(LEGACY_LOCATION, RawLocation::WIDTH, location_bits(&record.location)?)?;
    data.update_bits(LEGACY_CHILDREN, CHILDREN_BITS, children_count(record)?)?;

    if let Some(ext) = &record.extended {
        data.update_bits(layout.item_id, ITEM_ID_BITS, ext.id)?;
        data.update_bits(layout.seed, SEED_BITS, ext.seed)?;
        store(&mut data, layout.level, LEVEL_BITS, FieldId::Level, u32::from(ext.level))?;
        store(
            &mut data,
            layout.durability,
            LEGACY_DURABILITY_BITS,
            FieldId::Durability,
            u32::from(ext.durability.current),
        )?;
        data.update_bits(
            layout.durability + LEGACY_DURABILITY_BITS as usize,
            LEGACY_DURABILITY_BITS,
            u32::from(ext.durability.max),
        )?;
        store(&mut data, layout.quantity, QUANTITY_BITS, FieldId::Quantity, u32::from(ext.quantity))?;
        if let Some(at) = layout.socket_count {
            let count = u32::from(ext.socket_count);
            store(&mut data, at, SOCKETS_BITS, FieldId::SocketCount, count)?;
        }
        if let Some(at) = layout.quality {
            data.update_bits(at, Quality::BITS, u32::from(ext.quality.bits()))?;
        }
        if let Some(at) = layout.quality_data {
            let quality_data = ext.quality_data.shaped_for(ext.quality);
            quality_data.check_widths()?;
            let mut cursor = at;
            quality_data.write_fixed(&mut data, &mut cursor);
        }
        if let Some(at) = layout.defense {
            let defense = u32::from(ext.defense) + DEFENSE_BIAS;
            store(&mut data, at, LEGACY_DEFENSE_BITS, FieldId::Defense, defense)?;
        }
    }

    write_reserved(&mut data, layout, simple, record.reserved)?;
    Ok(data)
}

/// Spreads `reserved` over the unassigned ranges, low bits first.
pub(crate) fn write_reserved(
    data: &mut BitBuffer,
    layout: &LegacyLayout,
    simple: bool,
    reserved: u64,
) -> Result<(), CodecError> {
    let mut shift = 0;
    for (offset, width) in layout.reserved(simple) {
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        data.update_bits64(offset, width as u32, (reserved >> shift) & mask)?;
        shift += width;
    }
    Ok(())
}

/// Packs the unassigned ranges of a fixed-length record.
pub(crate) fn read_reserved(data: &BitBuffer, layout: &LegacyLayout, simple: bool) -> u64 {
    let mut reserved = 0u64;
    let mut shift = 0;
    for (offset, width) in layout.reserved(simple) {
        reserved |= data.read_bits64(offset, width as u32) << shift;
        shift += width;
    }
    reserved
}

fn children_count(record: &ItemRecord) -> Result<u32, CodecError> {
    let count = record.children.len();
    if count >= 1 << CHILDREN_BITS {
        return Err(CodecError::InvalidSocketChild { index: count - 1 });
    }
    Ok(count as u32)
}

fn encode_variable(
    record: &ItemRecord,
    version: ItemVersion,
    kind: &ItemType,
    affixes: &dyn AffixOracle,
) -> Result<BitBuffer, CodecError> {
    let flags = record.normalized_flags();
    let char_width = version.text_char_width();
    let mut data = BitBuffer::new();
    let mut cursor = 0;

    if version.has_jm_marker() {
        data.set_bits(&mut cursor, MARKER_BITS, u32::from(ItemVersion::JM_MARKER));
    }
    data.set_bits(&mut cursor, FLAGS_BITS, flags.bits());
    let tag = version_tag(record, version)?;
    data.set_bits(&mut cursor, version.version_tag_width(), u32::from(tag));
    data.set_bits(&mut cursor, RawLocation::WIDTH, location_bits(&record.location)?);

    if let Some(ear) = &record.ear {
        validate_text(&ear.name, char_width)?;
        put(&mut data, &mut cursor, EAR_CLASS_BITS, FieldId::Ear, u32::from(ear.class))?;
        put(&mut data, &mut cursor, EAR_LEVEL_BITS, FieldId::Ear, u32::from(ear.level))?;
        data.write_text(&mut cursor, &ear.name, char_width);
        return Ok(data);
    }

    data.set_bits(&mut cursor, CODE_BITS, record.code.to_bits());
    data.set_bits(&mut cursor, CHILDREN_BITS, children_count(record)?);

    let Some(ext) = &record.extended else {
        return Ok(data);
    };
    write_extended(&mut data, &mut cursor, ext, flags, version, kind, affixes)?;
    Ok(data)
}

fn write_optional(
    data: &mut BitBuffer,
    cursor: &mut usize,
    width: u32,
    field: FieldId,
    value: Option<u32>,
) -> Result<(), CodecError> {
    match value {
        Some(value) => {
            data.set_bits(cursor, 1, 1);
            put(data, cursor, width, field, value)
        }
        None => {
            data.set_bits(cursor, 1, 0);
            Ok(())
        }
    }
}

fn write_extended(
    data: &mut BitBuffer,
    cursor: &mut usize,
    ext: &ExtendedRecord,
    flags: ItemFlags,
    version: ItemVersion,
    kind: &ItemType,
    affixes: &dyn AffixOracle,
) -> Result<(), CodecError> {
    data.set_bits(cursor, ITEM_ID_BITS, ext.id);
    put(data, cursor, LEVEL_BITS, FieldId::Level, u32::from(ext.level))?;
    data.set_bits(cursor, Quality::BITS, u32::from(ext.quality.bits()));
    let picture = ext.picture.map(u32::from);
    write_optional(data, cursor, PICTURE_BITS, FieldId::Picture, picture)?;
    let class_affix = ext.class_affix.map(u32::from);
    write_optional(data, cursor, CLASS_AFFIX_BITS, FieldId::ClassAffix, class_affix)?;

    let quality_data = ext.quality_data.shaped_for(ext.quality);
    quality_data.check_widths()?;
    quality_data.validate(affixes)?;
    quality_data.write_variable(data, cursor);

    if let Some(runeword) = ext.runeword {
        if !version.supports_runewords() {
            return Err(CodecError::UnsupportedSection {
                section: "runeword",
                version,
            });
        }
        if affixes.runeword(runeword.id).is_none() {
            return Err(CodecError::UnknownAffix {
                kind: AffixKind::Runeword,
                id: runeword.id,
            });
        }
        put(data, cursor, RUNEWORD_ID_BITS, FieldId::Runeword, u32::from(runeword.id))?;
        put(data, cursor, RUNEWORD_EXTRA_BITS, FieldId::Runeword, u32::from(runeword.extra))?;
    }

    if let Some(name) = &ext.personalized_name {
        validate_text(name, version.text_char_width())?;
        data.write_text(cursor, name, version.text_char_width());
    }

    if kind.is(ItemTypeFlags::TOME) {
        put(data, cursor, TOME_BITS, FieldId::TomeCharge, u32::from(ext.tome_charge))?;
    }

    match ext.realm {
        Some(words) => {
            data.set_bits(cursor, 1, 1);
            for word in words {
                data.set_bits(cursor, 32, word);
            }
        }
        None => data.set_bits(cursor, 1, 0),
    }

    if kind.has_defense() {
        let defense = u32::from(ext.defense) + DEFENSE_BIAS;
        put(data, cursor, version.defense_width(), FieldId::Defense, defense)?;
    }

    if kind.has_durability() {
        data.set_bits(cursor, MAX_DURABILITY_BITS, u32::from(ext.durability.max));
        if ext.durability.max > 0 {
            let current = u32::from(ext.durability.current);
            put(data, cursor, version.current_durability_width(), FieldId::Durability, current)?;
        }
    }

    if kind.is(ItemTypeFlags::STACKABLE) {
        put(data, cursor, QUANTITY_BITS, FieldId::Quantity, u32::from(ext.quantity))?;
    }

    if flags.contains(ItemFlags::SOCKETED) {
        put(data, cursor, SOCKETS_BITS, FieldId::SocketCount, u32::from(ext.socket_count))?;
    }

    let set_mask = if ext.quality == Quality::Set {
        put(data, cursor, SET_MASK_BITS, FieldId::SetBonusMask, u32::from(ext.set_mask))?;
        ext.set_mask
    } else {
        0
    };

    write_list(data, cursor, FieldId::MagicProperties, &ext.magic_properties, affixes)?;
    let mut set_lists = ext.set_properties.iter();
    for bit in 0..SET_MASK_BITS {
        if set_mask & (1 << bit) != 0 {
            let list = set_lists.next().map(Vec::as_slice).unwrap_or(&[]);
            write_list(data, cursor, FieldId::SetProperties, list, affixes)?;
        }
    }
    if ext.runeword.is_some() {
        let list = &ext.runeword_properties;
        write_list(data, cursor, FieldId::RunewordProperties, list, affixes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::decode_record;
    use crate::codec::record::{DurabilityRecord, EarRecord};
    use crate::env::ItemCode;
    use crate::error::{EngineError, ErrorSeverity};
    use crate::testing;

    fn sword(id: u32) -> ItemRecord {
        let mut ext = ExtendedRecord::new(id, 12);
        ext.durability = DurabilityRecord { max: 44, current: 44 };
        ItemRecord::full(ItemCode::new("lsd").unwrap(), ext)
    }

    #[test]
    fn fresh_sword_layout_matches_field_widths() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let data = encode_record(&sword(1), ItemVersion::V110, &env).unwrap();
        assert_eq!(data.len(), 23);

        let decoded = decode_record(data.as_bytes(), 0, ItemVersion::V110, &env).unwrap();
        assert_eq!(decoded.fields.end_bits(), 183);
        assert_eq!(decoded.fields.get(FieldId::Personalization).marker, 156);
        assert_eq!(decoded.fields.get(FieldId::Durability).width, 17);
        assert!(decoded.fields.is_monotonic());
    }

    #[test]
    fn text_rules_reject_overflow_and_empty_names() {
        assert!(validate_text("Griswold", 7).is_ok());
        assert_eq!(validate_text("", 7), Err(CodecError::InvalidText));
        assert_eq!(validate_text("abcdefghijklmnop", 7), Err(CodecError::InvalidText));
        assert_eq!(validate_text("\u{e9}t\u{e9}", 7), Err(CodecError::InvalidText));
        assert!(validate_text("\u{e9}t\u{e9}", 8).is_ok());
    }

    #[test]
    fn legacy_generations_reject_variable_sections() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let ear = ItemRecord::ear(EarRecord {
            class: 1,
            level: 20,
            name: String::from("Bob"),
        });
        assert!(matches!(
            encode_record(&ear, ItemVersion::V104, &env),
            Err(CodecError::UnsupportedSection { section: "ear", .. })
        ));

        let mut named = sword(2);
        if let Some(ext) = named.extended.as_mut() {
            ext.personalized_name = Some(String::from("Tal"));
        }
        assert!(matches!(
            encode_record(&named, ItemVersion::V107, &env),
            Err(CodecError::UnsupportedSection { section: "personalization", .. })
        ));
    }

    #[test]
    fn expansion_types_are_refused_by_classic_generations() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let rune = ItemRecord::simple(ItemCode::new("r01").unwrap());
        assert_eq!(
            encode_record(&rune, ItemVersion::V100, &env),
            Err(CodecError::VersionMismatch {
                code: rune.code,
                version: ItemVersion::V100
            })
        );
    }

    #[test]
    fn values_wider_than_their_field_are_refused() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();

        let mut worn = sword(3);
        if let Some(ext) = worn.extended.as_mut() {
            ext.durability.current = 300;
        }
        assert_eq!(
            encode_record(&worn, ItemVersion::V107, &env),
            Err(CodecError::ValueOutOfRange {
                field: FieldId::Durability,
                value: 300,
                width: 8,
            })
        );

        let mut veteran = sword(4);
        if let Some(ext) = veteran.extended.as_mut() {
            ext.level = 200;
        }
        assert!(matches!(
            encode_record(&veteran, ItemVersion::V110, &env),
            Err(CodecError::ValueOutOfRange { field: FieldId::Level, value: 200, width: 7 })
        ));

        let mut stray = sword(5);
        stray.location.x = 16;
        let err = encode_record(&stray, ItemVersion::V110, &env).unwrap_err();
        assert!(matches!(err, CodecError::ValueOutOfRange { field: FieldId::Location, .. }));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn stored_version_tag_is_written_back() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut record = sword(6);
        record.expansion = true;
        record.version_tag = Some(102);
        let data = encode_record(&record, ItemVersion::V110, &env).unwrap();
        let decoded = decode_record(data.as_bytes(), 0, ItemVersion::V110, &env).unwrap();
        let slot = decoded.fields.get(FieldId::VersionTag);
        assert_eq!(data.read_bits(slot.marker, slot.width as u32), 102);
        assert!(decoded.expansion);

        // A tag that contradicts the game mode falls back to the canonical one.
        record.version_tag = Some(0);
        let data = encode_record(&record, ItemVersion::V110, &env).unwrap();
        assert_eq!(data.read_bits(slot.marker, slot.width as u32), 101);
    }

    #[test]
    fn reserved_bits_survive_fixed_layouts() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        for version in [ItemVersion::V100, ItemVersion::V104, ItemVersion::V107] {
            let mut record = sword(9);
            record.reserved = 0b1011_0110_0101;
            let data = encode_record(&record, version, &env).unwrap();
            let layout = LegacyLayout::for_version(version).unwrap();
            assert_eq!(data.len(), layout.full_bytes);
            assert_eq!(read_reserved(&data, layout, false), record.reserved);
        }
    }
}
