//! Record corruption errors.

use crate::bits::BitError;
use crate::env::{AffixKind, ItemCode, OracleError};
use crate::error::{EngineError, ErrorSeverity};
use crate::version::ItemVersion;

use super::fields::FieldId;

/// Errors raised while decoding or encoding a record.
///
/// Every decode variant means the record (and the block it came from) cannot
/// be trusted. Decoding never repairs a record. `ValueOutOfRange` is raised
/// only while encoding a caller-built record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("bad marker {found:#06x} at byte {offset}")]
    BadMarker { offset: usize, found: u16 },

    #[error("record truncated: needed {needed} bits at bit {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown quality {0}")]
    UnknownQuality(u8),

    #[error("unknown stat id {0}")]
    UnknownStat(u16),

    #[error("stat {stat} declares {values} values")]
    PropertyChainTooLong { stat: u16, values: usize },

    #[error("stat {stat} expects {expected} values, got {found}")]
    ValueCountMismatch {
        stat: u16,
        expected: usize,
        found: usize,
    },

    #[error("unknown item type {0}")]
    UnknownType(ItemCode),

    #[error("unknown {kind} id {id}")]
    UnknownAffix { kind: AffixKind, id: u16 },

    #[error("invalid or unterminated text")]
    InvalidText,

    #[error("socketed child {index} is corrupt or not socket-located")]
    InvalidSocketChild { index: usize },

    /// Catalogue declares an expansion-only type inside a classic-only generation.
    #[error("item type {code} cannot appear in {version} records")]
    VersionMismatch { code: ItemCode, version: ItemVersion },

    #[error("{section} is not supported by {version} records")]
    UnsupportedSection {
        section: &'static str,
        version: ItemVersion,
    },

    #[error("{field} value {value} does not fit {width} bits")]
    ValueOutOfRange {
        field: FieldId,
        value: u64,
        width: u32,
    },

    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    #[error("block item at {location} overlaps another item or leaves its container")]
    Occupancy { location: String },

    #[error("{0} items do not fit a block count")]
    TooManyItems(usize),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Bits(#[from] BitError),
}

impl EngineError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValueOutOfRange { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CodecError::*;
        match self {
            BadMarker { .. } => "CODEC_BAD_MARKER",
            Truncated { .. } => "CODEC_TRUNCATED",
            UnknownQuality(_) => "CODEC_UNKNOWN_QUALITY",
            UnknownStat(_) => "CODEC_UNKNOWN_STAT",
            PropertyChainTooLong { .. } => "CODEC_PROPERTY_CHAIN_TOO_LONG",
            ValueCountMismatch { .. } => "CODEC_VALUE_COUNT_MISMATCH",
            UnknownType(_) => "CODEC_UNKNOWN_TYPE",
            UnknownAffix { .. } => "CODEC_UNKNOWN_AFFIX",
            InvalidText => "CODEC_INVALID_TEXT",
            InvalidSocketChild { .. } => "CODEC_INVALID_SOCKET_CHILD",
            VersionMismatch { .. } => "CODEC_VERSION_MISMATCH",
            UnsupportedSection { .. } => "CODEC_UNSUPPORTED_SECTION",
            ValueOutOfRange { .. } => "CODEC_VALUE_OUT_OF_RANGE",
            TrailingBytes(_) => "CODEC_TRAILING_BYTES",
            Occupancy { .. } => "CODEC_OCCUPANCY",
            TooManyItems(_) => "CODEC_TOO_MANY_ITEMS",
            Oracle(_) => "CODEC_ORACLE",
            Bits(_) => "CODEC_BITS",
        }
    }
}
