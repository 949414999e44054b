//! Decoded items and their semantic view.
//!
//! An [`Item`] owns the bits of its own record, the [`FieldTable`] locating
//! every section inside them, and its socketed children. Accessors read
//! straight from the bits; mutations go through the resize protocol in
//! [`mutate`](self) so the table always matches the buffer.
mod attributes;
mod display;
mod error;
mod legacy;
mod mutate;
mod quality;
mod runeword;
mod sockets;
pub mod stat;

use std::cell::OnceCell;

pub use attributes::{MagicalAttribute, combine, stat_total};
pub use display::{Bonus, BonusStack, DamageRange, DisplayedDamage, DisplayedDurability, Requirements};
pub use error::ItemError;
pub use legacy::{LegacyRng, LegacyRoll};
pub use quality::{RareAttributes, RunewordAttributes, SetAttributes};
pub use sockets::{Rejected, SocketContext};

use crate::bits::BitBuffer;
use crate::codec::decode::{DecodedRecord, decode_record};
use crate::codec::encode::{encode_record, read_reserved};
use crate::codec::layout::{DEFENSE_BIAS, LegacyLayout};
use crate::codec::walker::Walker;
use crate::codec::{
    CodecError, DurabilityRecord, EarRecord, ExtendedRecord, FieldId, FieldTable, ItemFlags,
    ItemRecord, Quality, QualityData, RawLocation, RunewordRecord,
};
use crate::config::EngineConfig;
use crate::container::Location;
use crate::env::{AffixOracle, ItemCode, ItemEnv, ItemType, ItemTypeFlags, ModRange};
use crate::version::ItemVersion;
use attributes::{from_mods, resolve_list, to_raw_list};
use legacy::LegacySource;

/// Character state consulted by level-dependent rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterContext {
    pub level: u8,
}

impl CharacterContext {
    pub const fn new(level: u8) -> Self {
        Self { level }
    }
}

/// Parameters for synthesizing a new item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOptions {
    pub id: u32,
    pub level: u8,
    pub quality: Quality,
    pub quality_data: QualityData,
    /// Ignored by generations without an expansion mode.
    pub expansion: bool,
    pub location: Location,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            id: 0,
            level: 1,
            quality: Quality::Normal,
            quality_data: QualityData::None,
            expansion: true,
            location: Location::Buffer,
        }
    }
}

impl CreateOptions {
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_quality(mut self, quality: Quality, data: QualityData) -> Self {
        self.quality = quality;
        self.quality_data = data;
        self
    }

    pub fn classic(mut self) -> Self {
        self.expansion = false;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// Property lines resolved from the record's stored lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Properties {
    pub magic: Vec<MagicalAttribute>,
    pub set: Vec<Vec<MagicalAttribute>>,
    pub runeword: Vec<MagicalAttribute>,
    /// Lines every item of the type carries (blunt weapons versus undead).
    pub innate: Vec<MagicalAttribute>,
}

/// One item record with its socketed children.
#[derive(Clone, Debug)]
pub struct Item {
    version: ItemVersion,
    data: BitBuffer,
    fields: FieldTable,
    kind: ItemType,
    expansion: bool,
    properties: Properties,
    socketed: Vec<Item>,
    /// Per-child bonuses for this item's apply type, parallel to `socketed`.
    socket_bonuses: Vec<Vec<MagicalAttribute>>,
    parent: Option<SocketContext>,
    /// Highest required level of the quality affixes.
    affix_level: u8,
    legacy: Option<LegacyRoll>,
    combined: OnceCell<Vec<MagicalAttribute>>,
}

impl Default for Item {
    fn default() -> Self {
        Self::invalid()
    }
}

impl Item {
    /// Sentinel reported after a failed decode; every accessor returns its
    /// default.
    pub fn invalid() -> Self {
        Self {
            version: ItemVersion::V110,
            data: BitBuffer::new(),
            fields: FieldTable::new(),
            kind: ItemType::invalid(),
            expansion: false,
            properties: Properties::default(),
            socketed: Vec::new(),
            socket_bonuses: Vec::new(),
            parent: None,
            affix_level: 0,
            legacy: None,
            combined: OnceCell::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }

    // ===== codec glue =====

    /// Decodes the item at byte `cursor` and exactly as many children as its
    /// record declares. Advances `cursor` past the last child.
    pub fn decode(
        source: &[u8],
        cursor: &mut usize,
        version: ItemVersion,
        env: &ItemEnv<'_>,
    ) -> Result<Self, CodecError> {
        let start = *cursor;
        let decoded = decode_record(source, start, version, env).inspect_err(|err| {
            tracing::warn!(%version, offset = start, %err, "rejecting corrupt item record");
        })?;
        let children = decoded.children;
        let mut item = Self::from_decoded(decoded, version, env)?;
        let mut next = start + item.data.len();

        for index in 0..children {
            let mut child_cursor = next;
            let child = match Self::decode(source, &mut child_cursor, version, env) {
                Ok(child) if child.location().is_socket() => child,
                Ok(child) => {
                    tracing::warn!(index, location = %child.location(), "socketed child is not in a socket");
                    return Err(CodecError::InvalidSocketChild { index });
                }
                Err(err) => {
                    tracing::warn!(index, %err, "socketed child failed to decode");
                    return Err(CodecError::InvalidSocketChild { index });
                }
            };
            next = child_cursor;
            item.attach_child(child, env)?;
        }

        *cursor = next;
        tracing::debug!(%version, code = %item.type_code(), children, bytes = next - start, "decoded item");
        Ok(item)
    }

    fn from_decoded(
        decoded: DecodedRecord,
        version: ItemVersion,
        env: &ItemEnv<'_>,
    ) -> Result<Self, CodecError> {
        let affixes = env.affixes()?;
        let properties = Properties {
            magic: resolve_list(&decoded.lists.magic, affixes, version)?,
            set: decoded
                .lists
                .set
                .iter()
                .map(|list| resolve_list(list, affixes, version))
                .collect::<Result<_, _>>()?,
            runeword: resolve_list(&decoded.lists.runeword, affixes, version)?,
            innate: innate_lines(&decoded.kind, affixes, version)?,
        };
        let mut item = Self {
            version,
            data: decoded.data,
            fields: decoded.fields,
            kind: decoded.kind,
            expansion: decoded.expansion,
            properties,
            ..Self::invalid()
        };
        item.legacy = item.regenerate(affixes)?;
        item.affix_level = affix_required_level(&item.quality_data(), affixes);
        Ok(item)
    }

    /// Legacy properties, computed once per decode.
    fn regenerate(&self, affixes: &dyn AffixOracle) -> Result<Option<LegacyRoll>, CodecError> {
        if !self.version.is_legacy() || self.is_simple() {
            return Ok(None);
        }
        let stored = self
            .version
            .stores_quality()
            .then(|| (self.stored_quality(), self.stored_quality_data()));
        let source = LegacySource {
            version: self.version,
            kind: &self.kind,
            level: self.level(),
            id: self.item_id(),
            seed: self.field(FieldId::Seed).unwrap_or(0),
            stored,
        };
        LegacyRoll::generate(&source, affixes).map(Some)
    }

    /// Synthesizes a new item with default values for every field.
    pub fn create(
        env: &ItemEnv<'_>,
        version: ItemVersion,
        code: ItemCode,
        options: CreateOptions,
    ) -> Result<Self, CodecError> {
        let kind = env
            .types()?
            .item_type(code)
            .ok_or(CodecError::UnknownType(code))?;
        let mut record = if kind.is(ItemTypeFlags::SIMPLE) {
            ItemRecord::simple(code)
        } else {
            let mut ext = ExtendedRecord::new(options.id, options.level);
            ext.quality = options.quality;
            ext.quality_data = options.quality_data.shaped_for(options.quality);
            ext.defense = kind.max_defense;
            ext.durability = DurabilityRecord {
                max: kind.durability,
                current: u16::from(kind.durability),
            };
            if kind.is(ItemTypeFlags::STACKABLE) {
                ext.quantity = 1;
            }
            ItemRecord::full(code, ext)
        };
        record.expansion = options.expansion && version.supports_expansion();
        record.location = options.location.to_raw();
        Self::from_record(&record, version, env)
    }

    /// Neutral model of this item and its children.
    pub fn to_record(&self) -> ItemRecord {
        let ear = self.ear_attributes();
        ItemRecord {
            flags: self.flags(),
            expansion: self.expansion,
            version_tag: self.fields.is_present(FieldId::VersionTag).then(|| self.version_tag()),
            location: self.raw_location(),
            code: if ear.is_some() {
                ItemCode::INVALID
            } else {
                self.kind.code
            },
            ear,
            extended: (!self.is_simple()).then(|| self.extended_record()),
            reserved: LegacyLayout::for_version(self.version)
                .map_or(0, |layout| read_reserved(&self.data, layout, self.is_simple())),
            children: self.socketed.iter().map(Item::to_record).collect(),
        }
    }

    fn extended_record(&self) -> ExtendedRecord {
        ExtendedRecord {
            id: self.item_id(),
            seed: self.field(FieldId::Seed).unwrap_or(0),
            level: self.level(),
            quality: self.stored_quality(),
            picture: self.optional_field(FieldId::Picture).map(|v| v as u8),
            class_affix: self.optional_field(FieldId::ClassAffix).map(|v| v as u16),
            quality_data: self.stored_quality_data(),
            runeword: self.runeword_id().map(|id| RunewordRecord {
                id,
                extra: self.runeword_extra(),
            }),
            personalized_name: self.personalized_name(),
            tome_charge: self.tome_charges(),
            realm: self.realm_data(),
            defense: self.stored_defense(),
            durability: self.durability(),
            quantity: self.quantity(),
            socket_count: self.field(FieldId::SocketCount).unwrap_or(0) as u8,
            set_mask: self.field(FieldId::SetBonusMask).unwrap_or(0) as u8,
            magic_properties: to_raw_list(&self.properties.magic),
            set_properties: self.properties.set.iter().map(|l| to_raw_list(l)).collect(),
            runeword_properties: to_raw_list(&self.properties.runeword),
        }
    }

    /// Encodes a neutral record (children included) for `version`.
    pub fn from_record(
        record: &ItemRecord,
        version: ItemVersion,
        env: &ItemEnv<'_>,
    ) -> Result<Self, CodecError> {
        let mut bytes = Vec::new();
        encode_tree(record, version, env, &mut bytes)?;
        Self::import_bytes(&bytes, version, env)
    }

    /// Re-emits this item under another schema generation.
    ///
    /// Values the source generation regenerates from the seed are stored
    /// explicitly when the target keeps them. Runewords are dropped for
    /// targets without runeword support.
    pub fn convert(&self, target: ItemVersion, env: &ItemEnv<'_>) -> Result<Self, CodecError> {
        let mut record = self.to_record();
        self.translate_record(&mut record, target);
        let item = Self::from_record(&record, target, env)?;
        tracing::debug!(from = %self.version, to = %target, code = %self.type_code(), "converted item");
        Ok(item)
    }

    fn translate_record(&self, record: &mut ItemRecord, target: ItemVersion) {
        record.expansion &= target.supports_expansion();
        if target != self.version {
            record.version_tag = None;
        }
        if let Some(ext) = record.extended.as_mut() {
            if let Some(roll) = &self.legacy {
                ext.quality = roll.quality;
                ext.quality_data = roll.quality_data;
                ext.magic_properties = to_raw_list(&roll.attributes);
                if let Some(defense) = roll.defense {
                    ext.defense = defense;
                }
            }
            if !target.supports_runewords() {
                ext.runeword = None;
                ext.runeword_properties.clear();
            }
            if target.is_legacy() {
                ext.durability.current = ext.durability.current.min(u16::from(u8::MAX));
            }
        }
        for (child, record) in self.socketed.iter().zip(record.children.iter_mut()) {
            child.translate_record(record, target);
        }
    }

    /// Own record followed by every child, depth first.
    pub fn export_bytes(&self) -> Vec<u8> {
        let mut bytes = self.data.as_bytes().to_vec();
        for child in &self.socketed {
            bytes.extend(child.export_bytes());
        }
        bytes
    }

    /// Reads a single exported item; trailing bytes are rejected.
    pub fn import_bytes(
        bytes: &[u8],
        version: ItemVersion,
        env: &ItemEnv<'_>,
    ) -> Result<Self, CodecError> {
        let mut cursor = 0;
        let item = Self::decode(bytes, &mut cursor, version, env)?;
        if cursor != bytes.len() {
            return Err(CodecError::TrailingBytes(bytes.len() - cursor));
        }
        Ok(item)
    }

    // ===== raw field access =====

    pub fn version(&self) -> ItemVersion {
        self.version
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn bits(&self) -> &BitBuffer {
        &self.data
    }

    pub fn item_type(&self) -> &ItemType {
        &self.kind
    }

    pub(crate) fn field(&self, id: FieldId) -> Option<u32> {
        self.fields
            .present(id)
            .map(|slot| self.data.read_bits(slot.marker, slot.width.min(32) as u32))
    }

    /// Value of a presence-flagged field, or `None` when the flag is clear.
    fn optional_field(&self, id: FieldId) -> Option<u32> {
        let slot = self.fields.present(id)?;
        let width = (slot.width - 1).min(32) as u32;
        (slot.width > 1).then(|| self.data.read_bits(slot.marker + 1, width))
    }

    fn walker_at(&self, id: FieldId) -> Option<Walker<'_>> {
        let slot = self.fields.present(id)?;
        let mut walker = Walker::new(self.data.as_bytes(), 0);
        walker.seek(slot.marker);
        Some(walker)
    }

    pub fn flags(&self) -> ItemFlags {
        ItemFlags::from_bits_retain(self.field(FieldId::Flags).unwrap_or(0))
    }

    /// Raw version tag; zero for generations without one.
    pub fn version_tag(&self) -> u16 {
        self.field(FieldId::VersionTag).unwrap_or(0) as u16
    }

    pub fn is_expansion(&self) -> bool {
        self.expansion
    }

    pub fn raw_location(&self) -> RawLocation {
        RawLocation::from_bits(self.field(FieldId::Location).unwrap_or(0))
    }

    pub fn location(&self) -> Location {
        if self.fields.is_present(FieldId::Location) {
            Location::from_raw(self.raw_location())
        } else {
            Location::Buffer
        }
    }

    // ===== identity =====

    pub fn type_code(&self) -> ItemCode {
        self.kind.code
    }

    pub fn level(&self) -> u8 {
        self.field(FieldId::Level).unwrap_or(0) as u8
    }

    pub fn item_id(&self) -> u32 {
        self.field(FieldId::ItemId).unwrap_or(0)
    }

    /// Item id and the second seed word (zero outside the fixed layouts).
    pub fn seeds(&self) -> (u32, u32) {
        (self.item_id(), self.field(FieldId::Seed).unwrap_or(0))
    }

    pub fn personalized_name(&self) -> Option<String> {
        let mut walker = self.walker_at(FieldId::Personalization)?;
        walker
            .read_text(self.version.text_char_width(), EngineConfig::MAX_NAME_LEN)
            .ok()
    }

    pub fn ear_attributes(&self) -> Option<EarRecord> {
        let mut walker = self.walker_at(FieldId::Ear)?;
        let class = walker.read(3).ok()? as u8;
        let level = walker.read(7).ok()? as u8;
        let name = walker
            .read_text(self.version.text_char_width(), EngineConfig::MAX_NAME_LEN)
            .ok()?;
        Some(EarRecord { class, level, name })
    }

    pub fn tome_charges(&self) -> u8 {
        self.field(FieldId::TomeCharge).unwrap_or(0) as u8
    }

    fn realm_data(&self) -> Option<[u32; 3]> {
        let slot = self.fields.present(FieldId::Realm)?;
        if slot.width <= 1 {
            return None;
        }
        let word = |i: usize| self.data.read_bits(slot.marker + 1 + 32 * i, 32);
        Some([word(0), word(1), word(2)])
    }

    fn stored_defense(&self) -> u16 {
        self.field(FieldId::Defense)
            .map_or(0, |raw| raw.saturating_sub(DEFENSE_BIAS) as u16)
    }

    /// Base defense rating (regenerated for generations that do not store it).
    pub fn defense(&self) -> u16 {
        match self.legacy.as_ref().and_then(|roll| roll.defense) {
            Some(defense) => defense,
            None => self.stored_defense(),
        }
    }

    pub fn durability(&self) -> DurabilityRecord {
        let Some(slot) = self.fields.present(FieldId::Durability) else {
            return DurabilityRecord::default();
        };
        if self.version.is_legacy() {
            return DurabilityRecord {
                current: self.data.read_bits(slot.marker, 8) as u16,
                max: self.data.read_bits(slot.marker + 8, 8) as u8,
            };
        }
        let max = self.data.read_bits(slot.marker, 8) as u8;
        let current = if slot.width > 8 {
            self.data.read_bits(slot.marker + 8, (slot.width - 8) as u32) as u16
        } else {
            0
        };
        DurabilityRecord { max, current }
    }

    pub fn quantity(&self) -> u16 {
        self.field(FieldId::Quantity).unwrap_or(0) as u16
    }

    /// Declared sockets. 1.00 records have no socket field and always
    /// report the type's maximum.
    pub fn socket_count(&self) -> u8 {
        if !self.version.has_socket_count_field() {
            return self.max_socket_count();
        }
        self.field(FieldId::SocketCount).unwrap_or(0) as u8
    }

    /// Children currently held.
    pub fn socketed_count(&self) -> usize {
        self.socketed.len()
    }

    /// Socket limit for the type at this item's level.
    pub fn max_socket_count(&self) -> u8 {
        if !self.can_have_sockets() {
            return 0;
        }
        self.kind.max_sockets_for(self.level(), self.version.is_legacy())
    }

    /// Sockets granted by `+sockets` properties.
    pub fn bonus_sockets(&self) -> u8 {
        let total = stat_total(self.magical_attributes(), stat::BONUS_SOCKETS);
        total.clamp(0, i64::from(EngineConfig::MAX_SOCKETS)) as u8
    }

    /// Declared sockets plus bonus sockets, capped.
    pub fn total_socket_count(&self) -> u8 {
        (self.socket_count() + self.bonus_sockets()).min(EngineConfig::MAX_SOCKETS)
    }

    /// `(width, height)` in grid cells.
    pub fn dimensions(&self) -> (u8, u8) {
        (self.kind.width, self.kind.height)
    }

    pub fn socketed_items(&self) -> &[Item] {
        &self.socketed
    }

    pub fn socket_context(&self) -> Option<SocketContext> {
        self.parent
    }

    /// Required level including quality affixes and socketed children.
    pub fn required_level(&self) -> u8 {
        self.socketed
            .iter()
            .map(Item::required_level)
            .fold(self.kind.required_level.max(self.affix_level), u8::max)
    }

    // ===== predicates =====

    pub fn is_armor(&self) -> bool {
        self.kind.is(ItemTypeFlags::ARMOR)
    }

    pub fn is_weapon(&self) -> bool {
        self.kind.is(ItemTypeFlags::WEAPON)
    }

    pub fn is_shield(&self) -> bool {
        self.kind.is(ItemTypeFlags::SHIELD)
    }

    pub fn is_stackable(&self) -> bool {
        self.kind.is(ItemTypeFlags::STACKABLE)
    }

    pub fn is_gem(&self) -> bool {
        self.kind.is(ItemTypeFlags::GEM)
    }

    pub fn is_rune(&self) -> bool {
        self.kind.is(ItemTypeFlags::RUNE)
    }

    pub fn is_jewel(&self) -> bool {
        self.kind.is(ItemTypeFlags::JEWEL)
    }

    pub fn is_potion(&self) -> bool {
        self.kind.is(ItemTypeFlags::POTION)
    }

    pub fn is_gps(&self) -> bool {
        self.kind.is_gps()
    }

    pub fn is_beltable(&self) -> bool {
        self.kind.is(ItemTypeFlags::BELTABLE)
    }

    pub fn is_belt(&self) -> bool {
        self.kind.is(ItemTypeFlags::BELT)
    }

    pub fn is_cube(&self) -> bool {
        self.kind.is(ItemTypeFlags::CUBE)
    }

    pub fn is_tome(&self) -> bool {
        self.kind.is(ItemTypeFlags::TOME)
    }

    pub fn is_two_handed(&self) -> bool {
        self.kind.is(ItemTypeFlags::TWO_HANDED)
    }

    pub fn is_socket_filler(&self) -> bool {
        self.kind.is_socket_filler()
    }

    pub fn can_have_sockets(&self) -> bool {
        !self.is_ear() && self.kind.max_sockets.iter().any(|&n| n > 0)
    }

    pub fn can_personalize(&self) -> bool {
        self.version.supports_extended_sections()
            && !self.is_simple()
            && self.kind.is(ItemTypeFlags::ARMOR | ItemTypeFlags::WEAPON)
    }

    pub fn is_simple(&self) -> bool {
        self.flags().contains(ItemFlags::SIMPLE)
    }

    pub fn is_ear(&self) -> bool {
        self.flags().contains(ItemFlags::EAR)
    }

    pub fn is_ethereal(&self) -> bool {
        self.flags().contains(ItemFlags::ETHEREAL)
    }

    pub fn is_identified(&self) -> bool {
        self.flags().contains(ItemFlags::IDENTIFIED)
    }

    pub fn is_personalized(&self) -> bool {
        self.fields.is_present(FieldId::Personalization)
    }

    pub fn is_socketed(&self) -> bool {
        self.flags().contains(ItemFlags::SOCKETED)
    }

    pub fn is_runeword(&self) -> bool {
        self.fields.is_present(FieldId::Runeword)
    }

    pub fn is_indestructible(&self) -> bool {
        stat_total(self.combined_magical_attributes(), stat::INDESTRUCTIBLE) != 0
    }

    // ===== magical attributes =====

    /// The item's own property lines (regenerated for fixed layouts).
    pub fn magical_attributes(&self) -> &[MagicalAttribute] {
        match &self.legacy {
            Some(roll) => &roll.attributes,
            None => &self.properties.magic,
        }
    }

    /// Bonuses each socketed child grants, in socket order.
    pub fn socket_bonuses(&self) -> &[Vec<MagicalAttribute>] {
        &self.socket_bonuses
    }

    /// Own, runeword and socket lines plus the undead bonus, merged by stat.
    pub fn combined_magical_attributes(&self) -> &[MagicalAttribute] {
        self.combined.get_or_init(|| {
            combine(
                self.magical_attributes()
                    .iter()
                    .chain(&self.properties.runeword)
                    .chain(self.socket_bonuses.iter().flatten())
                    .chain(&self.properties.innate),
            )
        })
    }

    pub(crate) fn invalidate(&mut self) {
        self.combined = OnceCell::new();
    }
}

fn encode_tree(
    record: &ItemRecord,
    version: ItemVersion,
    env: &ItemEnv<'_>,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    out.extend(encode_record(record, version, env)?.into_bytes());
    for child in &record.children {
        encode_tree(child, version, env, out)?;
    }
    Ok(())
}

/// Blunt weapons deal +50% damage to undead.
fn innate_lines(
    kind: &ItemType,
    affixes: &dyn AffixOracle,
    version: ItemVersion,
) -> Result<Vec<MagicalAttribute>, CodecError> {
    if !kind.is(ItemTypeFlags::BLUNT) {
        return Ok(Vec::new());
    }
    let bonus = ModRange::fixed(stat::UNDEAD_DAMAGE, UNDEAD_BONUS);
    from_mods(&[bonus], affixes, version, |m| m.max)
}

const UNDEAD_BONUS: i32 = 50;

fn affix_required_level(data: &QualityData, affixes: &dyn AffixOracle) -> u8 {
    match *data {
        QualityData::None | QualityData::Grade(_) => 0,
        QualityData::Magic { prefix, suffix } => {
            let prefix = affixes.magic_prefix(prefix).map_or(0, |a| a.required_level);
            let suffix = affixes.magic_suffix(suffix).map_or(0, |a| a.required_level);
            prefix.max(suffix)
        }
        QualityData::Set(id) => affixes.set_item(id).map_or(0, |s| s.required_level),
        QualityData::Unique(id) => affixes.unique_item(id).map_or(0, |u| u.required_level),
        QualityData::Rare { affixes: slots, .. } => slots
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let id = (*id)?;
                let def = if i % 2 == 0 {
                    affixes.magic_prefix(id)
                } else {
                    affixes.magic_suffix(id)
                };
                def.map(|a| a.required_level)
            })
            .max()
            .unwrap_or(0),
    }
}
