//! Catalogue access errors.

use super::affixes::AffixKind;
use super::types::ItemCode;
use crate::error::{EngineError, ErrorSeverity};

/// Errors that occur when consulting the catalogues.
///
/// Missing oracles are fatal. A failed lookup is a validation error for
/// callers that supplied the id, and becomes corruption when raised while
/// decoding a record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ItemTypeOracle is not available in the environment.
    #[error("ItemTypeOracle not available")]
    TypesNotAvailable,

    /// AffixOracle is not available in the environment.
    #[error("AffixOracle not available")]
    AffixesNotAvailable,

    /// Codes are 1 to 4 ASCII alphanumerics.
    #[error("invalid item code")]
    InvalidCode,

    #[error("item type {0} not found")]
    UnknownItemType(ItemCode),

    #[error("stat {0} not found")]
    UnknownStat(u16),

    #[error("{kind} {id} not found")]
    UnknownAffix { kind: AffixKind, id: u16 },
}

impl EngineError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            TypesNotAvailable | AffixesNotAvailable => ErrorSeverity::Fatal,
            InvalidCode | UnknownItemType(_) | UnknownStat(_) | UnknownAffix { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            TypesNotAvailable => "ORACLE_TYPES_NOT_AVAILABLE",
            AffixesNotAvailable => "ORACLE_AFFIXES_NOT_AVAILABLE",
            InvalidCode => "ORACLE_INVALID_CODE",
            UnknownItemType(_) => "ORACLE_UNKNOWN_ITEM_TYPE",
            UnknownStat(_) => "ORACLE_UNKNOWN_STAT",
            UnknownAffix { .. } => "ORACLE_UNKNOWN_AFFIX",
        }
    }
}
