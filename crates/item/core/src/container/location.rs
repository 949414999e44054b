//! Semantic view of the location block.
use crate::codec::RawLocation;
use crate::env::BodySlots;

/// Storage page of a stored item.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StoragePage {
    #[default]
    Unknown,
    Inventory,
    Cube,
    Stash,
}

impl StoragePage {
    pub const fn from_raw(page: u8) -> Self {
        match page {
            1 => Self::Inventory,
            4 => Self::Cube,
            5 => Self::Stash,
            _ => Self::Unknown,
        }
    }

    pub const fn raw(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Inventory => 1,
            Self::Cube => 4,
            Self::Stash => 5,
        }
    }
}

/// Equipment slots in storage order (raw values 1 to 12).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum EquippedSlot {
    Head = 1,
    Neck,
    Torso,
    RightHand,
    LeftHand,
    RightRing,
    LeftRing,
    Belt,
    Feet,
    Gloves,
    AltRightHand,
    AltLeftHand,
}

impl EquippedSlot {
    pub const fn from_raw(slot: u8) -> Option<Self> {
        Some(match slot {
            1 => Self::Head,
            2 => Self::Neck,
            3 => Self::Torso,
            4 => Self::RightHand,
            5 => Self::LeftHand,
            6 => Self::RightRing,
            7 => Self::LeftRing,
            8 => Self::Belt,
            9 => Self::Feet,
            10 => Self::Gloves,
            11 => Self::AltRightHand,
            12 => Self::AltLeftHand,
            _ => return None,
        })
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Zero-based index into the equipped-slot array.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Opposite hand of the same weapon set.
    pub const fn paired_hand(self) -> Option<Self> {
        match self {
            Self::RightHand => Some(Self::LeftHand),
            Self::LeftHand => Some(Self::RightHand),
            Self::AltRightHand => Some(Self::AltLeftHand),
            Self::AltLeftHand => Some(Self::AltRightHand),
            _ => None,
        }
    }

    pub const fn is_hand(self) -> bool {
        self.paired_hand().is_some()
    }

    /// The alternate weapon set exists only in expansion games.
    pub const fn requires_expansion(self) -> bool {
        matches!(self, Self::AltRightHand | Self::AltLeftHand)
    }

    /// Body slot an item type must declare to be worn here.
    pub const fn body_slot(self) -> BodySlots {
        match self {
            Self::Head => BodySlots::HEAD,
            Self::Neck => BodySlots::NECK,
            Self::Torso => BodySlots::TORSO,
            Self::RightHand | Self::LeftHand | Self::AltRightHand | Self::AltLeftHand => {
                BodySlots::HAND
            }
            Self::RightRing | Self::LeftRing => BodySlots::RING,
            Self::Belt => BodySlots::BELT,
            Self::Feet => BodySlots::FEET,
            Self::Gloves => BodySlots::GLOVES,
        }
    }
}

/// Where an item lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    Stored { page: StoragePage, x: u8, y: u8 },
    Equipped(EquippedSlot),
    /// Belt slot; column is `index % 4`, row is `index / 4`.
    Belt(u8),
    /// Socket index inside the owning item.
    Socket(u8),
    /// Cursor or staging area.
    Buffer,
}

const STORED: u8 = 0;
const EQUIPPED: u8 = 1;
const BELT: u8 = 2;
const BUFFER: u8 = 4;
const SOCKET: u8 = 6;

impl Location {
    pub const fn stored(page: StoragePage, x: u8, y: u8) -> Self {
        Self::Stored { page, x, y }
    }

    pub fn from_raw(raw: RawLocation) -> Self {
        match raw.primary {
            STORED => Self::Stored {
                page: StoragePage::from_raw(raw.page),
                x: raw.x,
                y: raw.y,
            },
            EQUIPPED => EquippedSlot::from_raw(raw.slot).map_or(Self::Buffer, Self::Equipped),
            BELT => Self::Belt(raw.x),
            SOCKET => Self::Socket(raw.x),
            _ => Self::Buffer,
        }
    }

    pub fn to_raw(self) -> RawLocation {
        match self {
            Self::Stored { page, x, y } => RawLocation {
                primary: STORED,
                slot: 0,
                x,
                y,
                page: page.raw(),
            },
            Self::Equipped(slot) => RawLocation {
                primary: EQUIPPED,
                slot: slot.raw(),
                ..RawLocation::default()
            },
            Self::Belt(index) => RawLocation {
                primary: BELT,
                x: index,
                ..RawLocation::default()
            },
            Self::Socket(index) => RawLocation {
                primary: SOCKET,
                x: index,
                ..RawLocation::default()
            },
            Self::Buffer => RawLocation {
                primary: BUFFER,
                ..RawLocation::default()
            },
        }
    }

    pub fn is_socket(&self) -> bool {
        matches!(self, Self::Socket(_))
    }

    pub fn is_equipped(&self) -> bool {
        matches!(self, Self::Equipped(_))
    }

    pub fn page(&self) -> Option<StoragePage> {
        match self {
            Self::Stored { page, .. } => Some(*page),
            _ => None,
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stored { page, x, y } => write!(f, "{page} ({x}, {y})"),
            Self::Equipped(slot) => write!(f, "equipped {slot}"),
            Self::Belt(index) => write!(f, "belt {index}"),
            Self::Socket(index) => write!(f, "socket {index}"),
            Self::Buffer => f.write_str("buffer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn raw_mapping_is_stable() {
        let samples = [
            Location::stored(StoragePage::Stash, 3, 7),
            Location::Equipped(EquippedSlot::AltLeftHand),
            Location::Belt(13),
            Location::Socket(2),
            Location::Buffer,
        ];
        for location in samples {
            let raw = location.to_raw();
            assert_eq!(RawLocation::from_bits(raw.to_bits()), raw);
            assert_eq!(Location::from_raw(raw), location);
        }
    }

    #[test]
    fn slots_pair_within_their_weapon_set() {
        for slot in EquippedSlot::iter() {
            if let Some(pair) = slot.paired_hand() {
                assert_eq!(pair.paired_hand(), Some(slot));
                assert_eq!(pair.requires_expansion(), slot.requires_expansion());
            }
            assert_eq!(EquippedSlot::from_raw(slot.raw()), Some(slot));
        }
        assert_eq!(EquippedSlot::from_raw(0), None);
    }

    #[test]
    fn invalid_equip_slot_reads_as_buffer() {
        let raw = RawLocation {
            primary: 1,
            slot: 14,
            ..RawLocation::default()
        };
        assert_eq!(Location::from_raw(raw), Location::Buffer);
    }
}
