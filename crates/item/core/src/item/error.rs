//! Rejected item mutations.
use crate::bits::BitError;
use crate::codec::{CodecError, Quality};
use crate::env::{ItemCode, OracleError};
use crate::error::{EngineError, ErrorSeverity};
use crate::version::ItemVersion;

/// Errors returned when a mutation is refused.
///
/// The item is left exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("item is a simple record")]
    SimpleRecord,

    #[error("item is the invalid sentinel")]
    InvalidItem,

    #[error("{section} is not supported by {version} records")]
    Unsupported {
        section: &'static str,
        version: ItemVersion,
    },

    #[error("item type {0} cannot be personalized")]
    CannotPersonalize(ItemCode),

    #[error("name is empty, too long or not encodable")]
    InvalidName,

    #[error("item type {0} cannot have sockets")]
    SocketsNotAllowed(ItemCode),

    #[error("cannot keep {requested} sockets with {occupied} occupied")]
    SocketsOccupied { requested: u8, occupied: usize },

    #[error("item has no free socket")]
    NoFreeSocket,

    #[error("item is not socketed")]
    NotSocketed,

    #[error("no socketed item at index {0}")]
    NoSocketAt(usize),

    #[error("item type {0} cannot be socketed into another item")]
    NotSocketFiller(ItemCode),

    #[error("socketed item is a {child} record, parent is {parent}")]
    VersionMismatch {
        parent: ItemVersion,
        child: ItemVersion,
    },

    #[error("required level {required} exceeds {allowed}")]
    LevelTooHigh { required: u8, allowed: u8 },

    #[error("unknown runeword {0}")]
    UnknownRuneword(u16),

    #[error("runeword {0} does not match the socketed runes")]
    RunewordMismatch(u16),

    #[error("runeword {id} cannot be applied to {code}")]
    RunewordNotAllowed { id: u16, code: ItemCode },

    #[error("{0} items cannot carry a runeword")]
    RunewordQuality(Quality),

    #[error("runewords require an expansion item")]
    RunewordRequiresExpansion,

    #[error("item type {0} is not stackable")]
    NotStackable(ItemCode),

    #[error("quantity {requested} exceeds the maximum of {max}")]
    QuantityOutOfRange { requested: u16, max: u16 },

    #[error("item type {0} has no durability")]
    NoDurability(ItemCode),

    #[error("current durability {current} exceeds maximum {max}")]
    DurabilityOutOfRange { current: u16, max: u8 },

    #[error("item type {0} has no upgrade")]
    NoUpgrade(ItemCode),

    #[error(transparent)]
    Bits(#[from] BitError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl EngineError for ItemError {
    fn severity(&self) -> ErrorSeverity {
        use ItemError::*;
        match self {
            SocketsOccupied { .. } | NoFreeSocket | LevelTooHigh { .. } | RunewordMismatch(_) => {
                ErrorSeverity::Recoverable
            }
            Bits(_) => ErrorSeverity::Internal,
            Codec(err) => err.severity(),
            Oracle(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ItemError::*;
        match self {
            SimpleRecord => "ITEM_SIMPLE_RECORD",
            InvalidItem => "ITEM_INVALID",
            Unsupported { .. } => "ITEM_UNSUPPORTED_SECTION",
            CannotPersonalize(_) => "ITEM_CANNOT_PERSONALIZE",
            InvalidName => "ITEM_INVALID_NAME",
            SocketsNotAllowed(_) => "ITEM_SOCKETS_NOT_ALLOWED",
            SocketsOccupied { .. } => "ITEM_SOCKETS_OCCUPIED",
            NoFreeSocket => "ITEM_NO_FREE_SOCKET",
            NotSocketed => "ITEM_NOT_SOCKETED",
            NoSocketAt(_) => "ITEM_NO_SOCKET_AT",
            NotSocketFiller(_) => "ITEM_NOT_SOCKET_FILLER",
            VersionMismatch { .. } => "ITEM_VERSION_MISMATCH",
            LevelTooHigh { .. } => "ITEM_LEVEL_TOO_HIGH",
            UnknownRuneword(_) => "ITEM_UNKNOWN_RUNEWORD",
            RunewordMismatch(_) => "ITEM_RUNEWORD_MISMATCH",
            RunewordNotAllowed { .. } => "ITEM_RUNEWORD_NOT_ALLOWED",
            RunewordQuality(_) => "ITEM_RUNEWORD_QUALITY",
            RunewordRequiresExpansion => "ITEM_RUNEWORD_REQUIRES_EXPANSION",
            NotStackable(_) => "ITEM_NOT_STACKABLE",
            QuantityOutOfRange { .. } => "ITEM_QUANTITY_OUT_OF_RANGE",
            NoDurability(_) => "ITEM_NO_DURABILITY",
            DurabilityOutOfRange { .. } => "ITEM_DURABILITY_OUT_OF_RANGE",
            NoUpgrade(_) => "ITEM_NO_UPGRADE",
            Bits(_) => "ITEM_BITS",
            Codec(_) => "ITEM_CODEC",
            Oracle(_) => "ITEM_ORACLE",
        }
    }
}
