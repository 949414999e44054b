//! Item type catalogue entries.
//!
//! An [`ItemType`] describes everything the engine needs to know about a
//! 4-character type code: category flags, footprint, base statistics, socket
//! limits and the bonuses it grants when placed inside another item's socket.
use bitflags::bitflags;

use super::affixes::ModRange;
use crate::config::EngineConfig;

/// Four-character type code, space padded (`"lsd "`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemCode([u8; 4]);

impl ItemCode {
    /// Sentinel code reported by items in the invalid state.
    pub const INVALID: ItemCode = ItemCode([0; 4]);

    /// Parses a 1 to 4 character ASCII alphanumeric code.
    pub fn new(code: &str) -> Option<Self> {
        let raw = code.as_bytes();
        if raw.is_empty() || raw.len() > 4 || !raw.iter().all(u8::is_ascii_alphanumeric) {
            return None;
        }
        let mut bytes = [b' '; 4];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(Self(bytes))
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Packed value as stored in a record (first character in the low byte).
    pub const fn to_bits(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits.to_le_bytes())
    }

    /// Code without trailing padding. Empty for non-ASCII codes.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0)
            .map(|s| s.trim_end_matches([' ', '\0']))
            .unwrap_or("")
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for ItemCode {
    fn default() -> Self {
        Self::INVALID
    }
}

impl core::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Debug for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ItemCode({:?})", self.as_str())
    }
}

impl core::str::FromStr for ItemCode {
    type Err = super::OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(super::OracleError::InvalidCode)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ItemCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ItemCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Self::INVALID);
        }
        Self::new(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid item code {raw:?}")))
    }
}

bitflags! {
    /// Category membership of an item type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ItemTypeFlags: u32 {
        const WEAPON            = 1 << 0;
        const ARMOR             = 1 << 1;
        const SHIELD            = 1 << 2;
        const STACKABLE         = 1 << 3;
        const GEM               = 1 << 4;
        const RUNE              = 1 << 5;
        const JEWEL             = 1 << 6;
        const POTION            = 1 << 7;
        const BELTABLE          = 1 << 8;
        const SOCKETABLE        = 1 << 9;
        const TWO_HANDED        = 1 << 10;
        const ONE_OR_TWO_HANDED = 1 << 11;
        const BELT              = 1 << 12;
        const CUBE              = 1 << 13;
        const TOME              = 1 << 14;
        const BLUNT             = 1 << 15;
        const CHARM             = 1 << 16;
        const QUEST             = 1 << 17;
        /// Always encoded as a simple record.
        const SIMPLE            = 1 << 18;
        /// Introduced by the expansion; invalid in the fixed-length generations.
        const EXPANSION         = 1 << 19;
        const NO_DURABILITY     = 1 << 20;
        const RING              = 1 << 21;
        const AMULET            = 1 << 22;
    }
}

bitflags! {
    /// Body locations an item can be equipped to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct BodySlots: u16 {
        const HEAD   = 1 << 0;
        const NECK   = 1 << 1;
        const TORSO  = 1 << 2;
        const HAND   = 1 << 3;
        const RING   = 1 << 4;
        const BELT   = 1 << 5;
        const FEET   = 1 << 6;
        const GLOVES = 1 << 7;
    }
}

/// Bonuses a socket filler grants, keyed by the parent's apply type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SocketMods {
    pub weapon: Vec<ModRange>,
    pub armor: Vec<ModRange>,
    pub shield: Vec<ModRange>,
}

/// Which of a filler's bonus lists applies, derived from the parent type.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SocketApply {
    Weapon,
    Armor,
    Shield,
}

impl SocketMods {
    pub fn for_apply(&self, apply: SocketApply) -> &[ModRange] {
        match apply {
            SocketApply::Weapon => &self.weapon,
            SocketApply::Armor => &self.armor,
            SocketApply::Shield => &self.shield,
        }
    }
}

/// Catalogue entry for one type code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemType {
    pub code: ItemCode,
    pub name: String,
    pub flags: ItemTypeFlags,
    pub width: u8,
    pub height: u8,
    pub body_slots: BodySlots,
    /// Quality level used for affix eligibility.
    pub level: u8,
    pub required_level: u8,
    pub required_strength: u16,
    pub required_dexterity: u16,
    pub min_defense: u16,
    pub max_defense: u16,
    pub durability: u8,
    pub min_damage: u16,
    pub max_damage: u16,
    pub two_hand_min_damage: u16,
    pub two_hand_max_damage: u16,
    pub max_stack: u16,
    /// Socket limits for item levels 1-25, 26-40 and 41+.
    pub max_sockets: [u8; 3],
    /// Potion rows granted by a belt.
    pub belt_rows: u8,
    pub socket_mods: SocketMods,
    /// Next tier for gems and potions.
    pub upgrade_to: Option<ItemCode>,
}

impl Default for ItemType {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ItemType {
    pub fn new(code: ItemCode, name: impl Into<String>, flags: ItemTypeFlags) -> Self {
        Self {
            code,
            name: name.into(),
            flags,
            width: 1,
            height: 1,
            ..Self::invalid()
        }
    }

    /// Type reported by items in the invalid state.
    pub fn invalid() -> Self {
        Self {
            code: ItemCode::INVALID,
            name: String::new(),
            flags: ItemTypeFlags::empty(),
            width: 0,
            height: 0,
            body_slots: BodySlots::empty(),
            level: 0,
            required_level: 0,
            required_strength: 0,
            required_dexterity: 0,
            min_defense: 0,
            max_defense: 0,
            durability: 0,
            min_damage: 0,
            max_damage: 0,
            two_hand_min_damage: 0,
            two_hand_max_damage: 0,
            max_stack: 0,
            max_sockets: [0; 3],
            belt_rows: 0,
            socket_mods: SocketMods::default(),
            upgrade_to: None,
        }
    }

    /// Pseudo-type carried by ear records.
    pub fn ear() -> Self {
        Self {
            name: String::from("Ear"),
            flags: ItemTypeFlags::SIMPLE | ItemTypeFlags::NO_DURABILITY,
            width: 1,
            height: 1,
            ..Self::invalid()
        }
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_body_slots(mut self, slots: BodySlots) -> Self {
        self.body_slots = slots;
        self
    }

    pub fn with_level(mut self, level: u8, required_level: u8) -> Self {
        self.level = level;
        self.required_level = required_level;
        self
    }

    pub fn with_requirements(mut self, strength: u16, dexterity: u16) -> Self {
        self.required_strength = strength;
        self.required_dexterity = dexterity;
        self
    }

    pub fn with_defense(mut self, min: u16, max: u16) -> Self {
        self.min_defense = min;
        self.max_defense = max;
        self
    }

    pub fn with_damage(mut self, min: u16, max: u16) -> Self {
        self.min_damage = min;
        self.max_damage = max;
        self
    }

    pub fn with_two_hand_damage(mut self, min: u16, max: u16) -> Self {
        self.two_hand_min_damage = min;
        self.two_hand_max_damage = max;
        self
    }

    pub fn with_durability(mut self, durability: u8) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_max_stack(mut self, max_stack: u16) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn with_max_sockets(mut self, brackets: [u8; 3]) -> Self {
        self.max_sockets = brackets;
        self
    }

    pub fn with_belt_rows(mut self, rows: u8) -> Self {
        self.belt_rows = rows;
        self
    }

    pub fn with_socket_mods(mut self, mods: SocketMods) -> Self {
        self.socket_mods = mods;
        self
    }

    pub fn with_upgrade(mut self, next: ItemCode) -> Self {
        self.upgrade_to = Some(next);
        self
    }

    pub fn is(&self, flags: ItemTypeFlags) -> bool {
        self.flags.intersects(flags)
    }

    /// Armor-class types carry a stored defense rating.
    pub fn has_defense(&self) -> bool {
        self.is(ItemTypeFlags::ARMOR)
    }

    pub fn has_durability(&self) -> bool {
        self.is(ItemTypeFlags::ARMOR | ItemTypeFlags::WEAPON)
            && !self.is(ItemTypeFlags::NO_DURABILITY)
    }

    pub fn is_socket_filler(&self) -> bool {
        self.is(ItemTypeFlags::GEM | ItemTypeFlags::RUNE | ItemTypeFlags::JEWEL)
    }

    pub fn is_gps(&self) -> bool {
        self.is(ItemTypeFlags::GEM | ItemTypeFlags::POTION | ItemTypeFlags::RUNE)
    }

    /// Apply type this item imposes on its socket fillers.
    pub fn socket_apply(&self) -> SocketApply {
        if self.is(ItemTypeFlags::SHIELD) {
            SocketApply::Shield
        } else if self.is(ItemTypeFlags::WEAPON) {
            SocketApply::Weapon
        } else {
            SocketApply::Armor
        }
    }

    /// Socket limit for an item level. Fixed-length generations always use
    /// the lowest bracket.
    pub fn max_sockets_for(&self, level: u8, legacy: bool) -> u8 {
        let bracket = match level {
            _ if legacy => 0,
            0..=25 => 0,
            26..=40 => 1,
            _ => 2,
        };
        self.max_sockets[bracket].min(EngineConfig::MAX_SOCKETS)
    }

    /// Belt slots granted when this type is worn as a belt.
    pub fn belt_slots(&self) -> usize {
        EngineConfig::BELT_COLUMNS * (self.belt_rows as usize).min(EngineConfig::MAX_BELT_ROWS)
    }
}
