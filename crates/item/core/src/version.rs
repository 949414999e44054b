//! Schema generations of the item record.
//!
//! Three fixed-length generations predate the expansion; five variable-length
//! generations follow it. Every layout decision in the codec keys off
//! [`ItemVersion`].

/// One of the eight mutually incompatible on-disk item layouts.
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
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ItemVersion {
    /// 1.00 to 1.03: fixed 14/27 byte records.
    #[strum(serialize = "v100")]
    #[cfg_attr(feature = "serde", serde(rename = "v100"))]
    V100,
    /// 1.04 to 1.06: fixed 15/31 byte records with a socket count.
    #[strum(serialize = "v104")]
    #[cfg_attr(feature = "serde", serde(rename = "v104"))]
    V104,
    /// 1.07: fixed 15/40 byte records storing quality and defense.
    #[strum(serialize = "v107")]
    #[cfg_attr(feature = "serde", serde(rename = "v107"))]
    V107,
    /// 1.08: first variable-length layout.
    #[strum(serialize = "v108")]
    #[cfg_attr(feature = "serde", serde(rename = "v108"))]
    V108,
    /// 1.09.
    #[strum(serialize = "v109")]
    #[cfg_attr(feature = "serde", serde(rename = "v109"))]
    V109,
    /// 1.10 to 1.14.
    #[strum(serialize = "v110")]
    #[cfg_attr(feature = "serde", serde(rename = "v110"))]
    V110,
    /// Remaster 1.0: no JM marker, 3-bit version tag.
    #[strum(serialize = "v100r")]
    #[cfg_attr(feature = "serde", serde(rename = "v100r"))]
    V100R,
    /// Remaster 2.4 and later: 8-bit text.
    #[strum(serialize = "v120")]
    #[cfg_attr(feature = "serde", serde(rename = "v120"))]
    V120,
}

impl ItemVersion {
    /// Two-byte marker opening every record of the JM generations.
    pub const JM_MARKER: u16 = 0x4D4A;

    /// Maps the character file version word to an item schema generation.
    pub const fn from_file_version(file_version: u32) -> Option<Self> {
        match file_version {
            65 => Some(Self::V100),
            71 => Some(Self::V104),
            87 => Some(Self::V107),
            89 => Some(Self::V108),
            92 => Some(Self::V109),
            96 => Some(Self::V110),
            97 => Some(Self::V100R),
            98 | 99 => Some(Self::V120),
            _ => None,
        }
    }

    /// Fixed-length generations that predate the expansion.
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::V100 | Self::V104 | Self::V107)
    }

    pub const fn is_remaster(self) -> bool {
        matches!(self, Self::V100R | Self::V120)
    }

    pub const fn has_jm_marker(self) -> bool {
        !self.is_remaster()
    }

    /// Quality is persisted (otherwise regenerated from the seed pair).
    pub const fn stores_quality(self) -> bool {
        !matches!(self, Self::V100 | Self::V104)
    }

    pub const fn has_socket_count_field(self) -> bool {
        !matches!(self, Self::V100)
    }

    pub const fn supports_expansion(self) -> bool {
        !self.is_legacy()
    }

    pub const fn supports_runewords(self) -> bool {
        matches!(self, Self::V109 | Self::V110 | Self::V100R | Self::V120)
    }

    /// Personalization, ears, realm data and property lists.
    pub const fn supports_extended_sections(self) -> bool {
        !self.is_legacy()
    }

    /// Bits per character of personalization and ear names.
    pub const fn text_char_width(self) -> u32 {
        match self {
            Self::V120 => 8,
            _ => 7,
        }
    }

    /// Bits of the raw version tag following the flags word.
    pub const fn version_tag_width(self) -> u32 {
        if self.is_legacy() {
            0
        } else if self.is_remaster() {
            3
        } else {
            10
        }
    }

    /// Tag written for expansion-mode items.
    pub const fn expansion_tag(self) -> u16 {
        match self {
            Self::V108 => 100,
            Self::V109 | Self::V110 => 101,
            Self::V100R | Self::V120 => 5,
            _ => 0,
        }
    }

    /// Tag written for classic-mode items.
    pub const fn classic_tag(self) -> u16 {
        if self.is_remaster() { 4 } else { 0 }
    }

    /// Derives the game-mode flag from a raw tag.
    pub const fn is_expansion_tag(self, tag: u16) -> bool {
        if self.is_legacy() {
            false
        } else if self.is_remaster() {
            tag == 5
        } else {
            tag >= 100
        }
    }

    /// Width of the stored defense rating.
    pub const fn defense_width(self) -> u32 {
        match self {
            Self::V108 => 10,
            _ => 11,
        }
    }

    /// Width of the current-durability field following the maximum.
    pub const fn current_durability_width(self) -> u32 {
        match self {
            Self::V108 | Self::V109 => 8,
            _ => 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn file_versions_map_to_generations() {
        assert_eq!(ItemVersion::from_file_version(71), Some(ItemVersion::V104));
        assert_eq!(ItemVersion::from_file_version(96), Some(ItemVersion::V110));
        assert_eq!(ItemVersion::from_file_version(99), Some(ItemVersion::V120));
        assert_eq!(ItemVersion::from_file_version(1), None);
    }

    #[test]
    fn tags_round_trip_game_mode() {
        for version in ItemVersion::iter().filter(|v| !v.is_legacy()) {
            assert!(version.is_expansion_tag(version.expansion_tag()));
            assert!(!version.is_expansion_tag(version.classic_tag()));
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(ItemVersion::from_str("V100R").unwrap(), ItemVersion::V100R);
        assert_eq!(ItemVersion::V109.to_string(), "v109");
    }

    #[test]
    fn only_newest_remaster_uses_wide_text() {
        let wide: Vec<_> = ItemVersion::iter()
            .filter(|v| v.text_char_width() == 8)
            .collect();
        assert_eq!(wide, vec![ItemVersion::V120]);
    }
}
