//! Layout walkers for a single record (children excluded).
use super::fields::{FieldId, FieldTable};
use super::header::{ItemFlags, RawLocation};
use super::layout::*;
use super::properties::{RawProperty, read_list};
use super::quality::{FIXED_QUALITY_BITS, Quality, QualityData};
use super::walker::Walker;
use super::CodecError;
use crate::bits::BitBuffer;
use crate::config::EngineConfig;
use crate::env::{AffixKind, ItemCode, ItemEnv, ItemType, ItemTypeFlags};
use crate::version::ItemVersion;

/// Property lists parsed from a record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyLists {
    pub magic: Vec<RawProperty>,
    /// One list per bit set in the set bonus mask, low bit first.
    pub set: Vec<Vec<RawProperty>>,
    pub runeword: Vec<RawProperty>,
}

/// One record decoded from a byte source.
#[derive(Clone, Debug)]
pub(crate) struct DecodedRecord {
    pub data: BitBuffer,
    pub fields: FieldTable,
    pub kind: ItemType,
    pub expansion: bool,
    pub children: usize,
    pub lists: PropertyLists,
}

/// Decodes the record starting at byte `offset` of `source`.
pub(crate) fn decode_record(
    source: &[u8],
    offset: usize,
    version: ItemVersion,
    env: &ItemEnv<'_>,
) -> Result<DecodedRecord, CodecError> {
    match LegacyLayout::for_version(version) {
        Some(layout) => decode_legacy(source, offset, version, layout, env),
        None => decode_variable(source, offset, version, env),
    }
}

fn check_marker(walker: &mut Walker<'_>, offset: usize) -> Result<(), CodecError> {
    let found = walker.read(MARKER_BITS)? as u16;
    if found != ItemVersion::JM_MARKER {
        return Err(CodecError::BadMarker { offset, found });
    }
    Ok(())
}

fn decode_legacy(
    source: &[u8],
    offset: usize,
    version: ItemVersion,
    layout: &LegacyLayout,
    env: &ItemEnv<'_>,
) -> Result<DecodedRecord, CodecError> {
    let types = env.types()?;
    let affixes = env.affixes()?;
    let mut walker = Walker::new(source, offset);
    check_marker(&mut walker, offset)?;

    let flags = ItemFlags::from_bits_retain(walker.read(FLAGS_BITS)?);
    for (flag, section) in [
        (ItemFlags::EAR, "ear"),
        (ItemFlags::PERSONALIZED, "personalization"),
        (ItemFlags::RUNEWORD, "runeword"),
    ] {
        if flags.contains(flag) {
            return Err(CodecError::UnsupportedSection { section, version });
        }
    }

    walker.seek(LEGACY_CODE);
    let code = ItemCode::from_bits(walker.read(CODE_BITS)?);
    let kind = types
        .item_type(code)
        .ok_or(CodecError::UnknownType(code))?
        .clone();
    if kind.is(ItemTypeFlags::EXPANSION) {
        return Err(CodecError::VersionMismatch { code, version });
    }

    let simple = flags.contains(ItemFlags::SIMPLE);
    let end = layout.bytes(simple) * 8;
    walker.seek(0);
    walker.ensure(end)?;

    let mut fields = FieldTable::new();
    fields.mark(FieldId::Marker, 0, MARKER_BITS as usize);
    fields.mark(FieldId::Flags, LEGACY_FLAGS, FLAGS_BITS as usize);
    fields.skip(FieldId::VersionTag, LEGACY_CODE);
    fields.mark(FieldId::Location, LEGACY_LOCATION, RawLocation::WIDTH as usize);
    fields.close_from(FieldId::Ear, end);
    fields.mark(FieldId::TypeCode, LEGACY_CODE, CODE_BITS as usize);
    fields.mark(FieldId::SocketedCount, LEGACY_CHILDREN, CHILDREN_BITS as usize);
    let children = walker.peek_at(LEGACY_CHILDREN, CHILDREN_BITS) as usize;

    if !simple {
        fields.mark(FieldId::ItemId, layout.item_id, ITEM_ID_BITS as usize);
        fields.mark(FieldId::Seed, layout.seed, SEED_BITS as usize);
        fields.mark(FieldId::Level, layout.level, LEVEL_BITS as usize);
        fields.mark(
            FieldId::Durability,
            layout.durability,
            2 * LEGACY_DURABILITY_BITS as usize,
        );
        fields.mark(FieldId::Quantity, layout.quantity, QUANTITY_BITS as usize);
        if let Some(at) = layout.socket_count {
            fields.mark(FieldId::SocketCount, at, SOCKETS_BITS as usize);
        }
        if let Some(at) = layout.quality {
            let raw = walker.peek_at(at, Quality::BITS) as u8;
            let quality = Quality::try_from(raw)?;
            fields.mark(FieldId::Quality, at, Quality::BITS as usize);
            if let Some(qd_at) = layout.quality_data {
                walker.seek(qd_at);
                QualityData::read_fixed(&mut walker, quality)?.validate(affixes)?;
                fields.mark(FieldId::QualityData, qd_at, FIXED_QUALITY_BITS);
            }
        }
        if let Some(at) = layout.defense {
            fields.mark(FieldId::Defense, at, LEGACY_DEFENSE_BITS as usize);
        }
    }

    let data = BitBuffer::from_bytes(walker.record_bytes(end));
    tracing::debug!(%version, %code, bytes = data.len(), "decoded fixed-length record");
    Ok(DecodedRecord {
        data,
        fields,
        kind,
        expansion: false,
        children,
        lists: PropertyLists::default(),
    })
}

/// Reads a 1-bit presence flag followed by `width` bits when set; records the
/// whole span as the field.
fn optional(
    walker: &mut Walker<'_>,
    fields: &mut FieldTable,
    id: FieldId,
    width: u32,
) -> Result<(), CodecError> {
    let pos = walker.pos();
    if walker.read(1)? == 1 {
        let mut left = width;
        while left > 0 {
            let step = left.min(32);
            walker.read(step)?;
            left -= step;
        }
    }
    fields.mark(id, pos, walker.pos() - pos);
    Ok(())
}

fn fixed(
    walker: &mut Walker<'_>,
    fields: &mut FieldTable,
    id: FieldId,
    width: u32,
) -> Result<u32, CodecError> {
    let pos = walker.pos();
    let value = walker.read(width)?;
    fields.mark(id, pos, width as usize);
    Ok(value)
}

fn decode_variable(
    source: &[u8],
    offset: usize,
    version: ItemVersion,
    env: &ItemEnv<'_>,
) -> Result<DecodedRecord, CodecError> {
    let types = env.types()?;
    let affixes = env.affixes()?;
    let mut walker = Walker::new(source, offset);
    let mut fields = FieldTable::new();

    if version.has_jm_marker() {
        check_marker(&mut walker, offset)?;
        fields.mark(FieldId::Marker, 0, MARKER_BITS as usize);
    } else {
        fields.skip(FieldId::Marker, 0);
    }
    let flags = ItemFlags::from_bits_retain(fixed(&mut walker, &mut fields, FieldId::Flags, FLAGS_BITS)?);
    let tag = fixed(
        &mut walker,
        &mut fields,
        FieldId::VersionTag,
        version.version_tag_width(),
    )? as u16;
    let expansion = version.is_expansion_tag(tag);
    fixed(&mut walker, &mut fields, FieldId::Location, RawLocation::WIDTH)?;

    let char_width = version.text_char_width();
    let mut lists = PropertyLists::default();

    if flags.contains(ItemFlags::EAR) {
        let pos = walker.pos();
        walker.read(EAR_CLASS_BITS)?;
        walker.read(EAR_LEVEL_BITS)?;
        walker.read_text(char_width, EngineConfig::MAX_NAME_LEN)?;
        fields.mark(FieldId::Ear, pos, walker.pos() - pos);
        fields.close_from(FieldId::TypeCode, walker.pos());
        return finish(walker, fields, ItemType::ear(), expansion, 0, lists, version);
    }
    fields.skip(FieldId::Ear, walker.pos());

    let code = ItemCode::from_bits(fixed(&mut walker, &mut fields, FieldId::TypeCode, CODE_BITS)?);
    let kind = types
        .item_type(code)
        .ok_or(CodecError::UnknownType(code))?
        .clone();
    let children = fixed(&mut walker, &mut fields, FieldId::SocketedCount, CHILDREN_BITS)? as usize;

    if flags.contains(ItemFlags::SIMPLE) {
        fields.close_from(FieldId::ItemId, walker.pos());
        return finish(walker, fields, kind, expansion, children, lists, version);
    }

    fixed(&mut walker, &mut fields, FieldId::ItemId, ITEM_ID_BITS)?;
    fields.skip(FieldId::Seed, walker.pos());
    fixed(&mut walker, &mut fields, FieldId::Level, LEVEL_BITS)?;
    let quality = Quality::try_from(fixed(&mut walker, &mut fields, FieldId::Quality, Quality::BITS)? as u8)?;
    optional(&mut walker, &mut fields, FieldId::Picture, PICTURE_BITS)?;
    optional(&mut walker, &mut fields, FieldId::ClassAffix, CLASS_AFFIX_BITS)?;

    let pos = walker.pos();
    let quality_data = QualityData::read_variable(&mut walker, quality)?;
    quality_data.validate(affixes)?;
    if walker.pos() > pos {
        fields.mark(FieldId::QualityData, pos, walker.pos() - pos);
    } else {
        fields.skip(FieldId::QualityData, pos);
    }

    if flags.contains(ItemFlags::RUNEWORD) {
        if !version.supports_runewords() {
            return Err(CodecError::UnsupportedSection {
                section: "runeword",
                version,
            });
        }
        let pos = walker.pos();
        let id = walker.read(RUNEWORD_ID_BITS)? as u16;
        walker.read(RUNEWORD_EXTRA_BITS)?;
        if affixes.runeword(id).is_none() {
            return Err(CodecError::UnknownAffix {
                kind: AffixKind::Runeword,
                id,
            });
        }
        fields.mark(FieldId::Runeword, pos, walker.pos() - pos);
    } else {
        fields.skip(FieldId::Runeword, walker.pos());
    }

    if flags.contains(ItemFlags::PERSONALIZED) {
        let pos = walker.pos();
        walker.read_text(char_width, EngineConfig::MAX_NAME_LEN)?;
        fields.mark(FieldId::Personalization, pos, walker.pos() - pos);
    } else {
        fields.skip(FieldId::Personalization, walker.pos());
    }

    if kind.is(ItemTypeFlags::TOME) {
        fixed(&mut walker, &mut fields, FieldId::TomeCharge, TOME_BITS)?;
    } else {
        fields.skip(FieldId::TomeCharge, walker.pos());
    }

    optional(&mut walker, &mut fields, FieldId::Realm, (REALM_WORDS * 32) as u32)?;

    if kind.has_defense() {
        fixed(&mut walker, &mut fields, FieldId::Defense, version.defense_width())?;
    } else {
        fields.skip(FieldId::Defense, walker.pos());
    }

    if kind.has_durability() {
        let pos = walker.pos();
        let max = walker.read(MAX_DURABILITY_BITS)?;
        if max > 0 {
            walker.read(version.current_durability_width())?;
        }
        fields.mark(FieldId::Durability, pos, walker.pos() - pos);
    } else {
        fields.skip(FieldId::Durability, walker.pos());
    }

    if kind.is(ItemTypeFlags::STACKABLE) {
        fixed(&mut walker, &mut fields, FieldId::Quantity, QUANTITY_BITS)?;
    } else {
        fields.skip(FieldId::Quantity, walker.pos());
    }

    if flags.contains(ItemFlags::SOCKETED) {
        fixed(&mut walker, &mut fields, FieldId::SocketCount, SOCKETS_BITS)?;
    } else {
        fields.skip(FieldId::SocketCount, walker.pos());
    }

    let set_mask = if quality == Quality::Set {
        fixed(&mut walker, &mut fields, FieldId::SetBonusMask, SET_MASK_BITS)? as u8
    } else {
        fields.skip(FieldId::SetBonusMask, walker.pos());
        0
    };

    let pos = walker.pos();
    lists.magic = read_list(&mut walker, affixes)?;
    fields.mark(FieldId::MagicProperties, pos, walker.pos() - pos);

    let pos = walker.pos();
    for bit in 0..SET_MASK_BITS {
        if set_mask & (1 << bit) != 0 {
            lists.set.push(read_list(&mut walker, affixes)?);
        }
    }
    if walker.pos() > pos {
        fields.mark(FieldId::SetProperties, pos, walker.pos() - pos);
    } else {
        fields.skip(FieldId::SetProperties, pos);
    }

    if flags.contains(ItemFlags::RUNEWORD) {
        let pos = walker.pos();
        lists.runeword = read_list(&mut walker, affixes)?;
        fields.mark(FieldId::RunewordProperties, pos, walker.pos() - pos);
    } else {
        fields.skip(FieldId::RunewordProperties, walker.pos());
    }

    fields.mark(FieldId::End, walker.pos(), 0);
    finish(walker, fields, kind, expansion, children, lists, version)
}

fn finish(
    walker: Walker<'_>,
    fields: FieldTable,
    kind: ItemType,
    expansion: bool,
    children: usize,
    lists: PropertyLists,
    version: ItemVersion,
) -> Result<DecodedRecord, CodecError> {
    let end = fields.end_bits();
    let data = BitBuffer::from_bytes(walker.record_bytes(end));
    tracing::debug!(%version, code = %kind.code, bits = end, "decoded variable-length record");
    Ok(DecodedRecord {
        data,
        fields,
        kind,
        expansion,
        children,
        lists,
    })
}
