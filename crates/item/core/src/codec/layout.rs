//! Bit widths and fixed offsets of the record layouts.
use crate::version::ItemVersion;

pub(crate) const MARKER_BITS: u32 = 16;
pub(crate) const FLAGS_BITS: u32 = 32;
pub(crate) const CODE_BITS: u32 = 32;
pub(crate) const CHILDREN_BITS: u32 = 3;
pub(crate) const ITEM_ID_BITS: u32 = 32;
pub(crate) const SEED_BITS: u32 = 32;
pub(crate) const LEVEL_BITS: u32 = 7;
pub(crate) const PICTURE_BITS: u32 = 3;
pub(crate) const CLASS_AFFIX_BITS: u32 = 11;
pub(crate) const RUNEWORD_ID_BITS: u32 = 12;
pub(crate) const RUNEWORD_EXTRA_BITS: u32 = 4;
/// Value the game always writes after a runeword id.
pub(crate) const RUNEWORD_EXTRA: u8 = 5;
pub(crate) const TOME_BITS: u32 = 5;
pub(crate) const REALM_WORDS: usize = 3;
pub(crate) const DEFENSE_BIAS: u32 = 10;
pub(crate) const MAX_DURABILITY_BITS: u32 = 8;
pub(crate) const QUANTITY_BITS: u32 = 9;
pub(crate) const SOCKETS_BITS: u32 = 4;
pub(crate) const SET_MASK_BITS: u32 = 5;
pub(crate) const EAR_CLASS_BITS: u32 = 3;
pub(crate) const EAR_LEVEL_BITS: u32 = 7;

// Fixed-length generations share their header.
pub(crate) const LEGACY_FLAGS: usize = 16;
pub(crate) const LEGACY_CODE: usize = 48;
pub(crate) const LEGACY_LOCATION: usize = 80;
pub(crate) const LEGACY_CHILDREN: usize = 98;
pub(crate) const LEGACY_DURABILITY_BITS: u32 = 8;
pub(crate) const LEGACY_DEFENSE_BITS: u32 = 11;

/// Field offsets of one fixed-length generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LegacyLayout {
    pub simple_bytes: usize,
    pub full_bytes: usize,
    pub item_id: usize,
    pub seed: usize,
    pub level: usize,
    pub quality: Option<usize>,
    /// Current then maximum, 8 bits each.
    pub durability: usize,
    pub quantity: usize,
    pub socket_count: Option<usize>,
    pub quality_data: Option<usize>,
    pub defense: Option<usize>,
    /// Unassigned ranges of the simple prefix, as `(offset, width)`.
    pub simple_reserved: (usize, usize),
    /// Unassigned ranges after the full fields.
    pub full_reserved: (usize, usize),
}

const V100_LAYOUT: LegacyLayout = LegacyLayout {
    simple_bytes: 14,
    full_bytes: 27,
    item_id: 112,
    seed: 144,
    level: 176,
    quality: None,
    durability: 183,
    quantity: 199,
    socket_count: None,
    quality_data: None,
    defense: None,
    simple_reserved: (101, 11),
    full_reserved: (208, 8),
};

const V104_LAYOUT: LegacyLayout = LegacyLayout {
    simple_bytes: 15,
    full_bytes: 31,
    item_id: 120,
    seed: 152,
    level: 184,
    quality: None,
    durability: 191,
    quantity: 207,
    socket_count: Some(216),
    quality_data: None,
    defense: None,
    simple_reserved: (101, 19),
    full_reserved: (220, 28),
};

const V107_LAYOUT: LegacyLayout = LegacyLayout {
    simple_bytes: 15,
    full_bytes: 40,
    item_id: 120,
    seed: 152,
    level: 184,
    quality: Some(191),
    durability: 195,
    quantity: 211,
    socket_count: Some(220),
    quality_data: Some(224),
    defense: Some(306),
    simple_reserved: (101, 19),
    full_reserved: (317, 3),
};

impl LegacyLayout {
    pub(crate) const fn for_version(version: ItemVersion) -> Option<&'static LegacyLayout> {
        match version {
            ItemVersion::V100 => Some(&V100_LAYOUT),
            ItemVersion::V104 => Some(&V104_LAYOUT),
            ItemVersion::V107 => Some(&V107_LAYOUT),
            _ => None,
        }
    }

    pub(crate) const fn bytes(&self, simple: bool) -> usize {
        if simple { self.simple_bytes } else { self.full_bytes }
    }

    /// Reserved ranges present in a record of the given shape.
    pub(crate) fn reserved(&self, simple: bool) -> impl Iterator<Item = (usize, usize)> {
        let full = (!simple).then_some(self.full_reserved);
        core::iter::once(self.simple_reserved).chain(full)
    }
}

/// Header offsets of the variable generations: `(flags, tag, location)`.
pub(crate) const fn variable_header(version: ItemVersion) -> (usize, usize, usize) {
    if version.has_jm_marker() {
        (16, 48, 58)
    } else {
        (0, 32, 35)
    }
}
