//! Flags word and location block shared by every generation.
use bitflags::bitflags;

bitflags! {
    /// 32-bit flags word following the marker.
    ///
    /// Bits without a name are preserved verbatim.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ItemFlags: u32 {
        const IDENTIFIED   = 1 << 4;
        const SOCKETED     = 1 << 11;
        const NEW          = 1 << 13;
        const EAR          = 1 << 16;
        const STARTER      = 1 << 17;
        const SIMPLE       = 1 << 21;
        const ETHEREAL     = 1 << 22;
        /// Set on every record the game writes.
        const CONSTANT     = 1 << 23;
        const PERSONALIZED = 1 << 24;
        const RUNEWORD     = 1 << 26;

        const _ = !0;
    }
}

/// Location block as stored: primary 3, slot 4, x 4, y 4, page 3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawLocation {
    pub primary: u8,
    pub slot: u8,
    pub x: u8,
    pub y: u8,
    pub page: u8,
}

impl RawLocation {
    pub const WIDTH: u32 = 18;

    pub const fn from_bits(bits: u32) -> Self {
        Self {
            primary: (bits & 0x7) as u8,
            slot: ((bits >> 3) & 0xF) as u8,
            x: ((bits >> 7) & 0xF) as u8,
            y: ((bits >> 11) & 0xF) as u8,
            page: ((bits >> 15) & 0x7) as u8,
        }
    }

    pub const fn to_bits(&self) -> u32 {
        (self.primary as u32 & 0x7)
            | (self.slot as u32 & 0xF) << 3
            | (self.x as u32 & 0xF) << 7
            | (self.y as u32 & 0xF) << 11
            | (self.page as u32 & 0x7) << 15
    }
}
