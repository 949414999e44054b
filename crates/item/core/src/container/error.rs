//! Placement errors.
//!
//! Every placement is validated before anything is written, so a returned
//! error always leaves the collection exactly as it was.

use super::{EquippedSlot, ItemHandle, Location};
use crate::env::ItemCode;
use crate::error::{EngineError, ErrorSeverity};
use crate::item::ItemError;

/// Errors returned when a placement or collection edit is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("no item with handle {0}")]
    UnknownHandle(ItemHandle),

    /// Socketed children only move through the socket operations.
    #[error("item {0} sits in a socket")]
    InSocket(ItemHandle),

    #[error("items cannot be placed at {0}")]
    InvalidDestination(Location),

    #[error("item does not fit inside the container at {0}")]
    OutOfBounds(Location),

    #[error("no cube is stored to hold items")]
    NoCube,

    #[error("a cube cannot be stored inside a cube")]
    CubeInCube,

    #[error("slot {0} exists only in expansion games")]
    ExpansionSlot(EquippedSlot),

    #[error("item type {code} cannot be worn in {slot}")]
    WrongSlot { code: ItemCode, slot: EquippedSlot },

    #[error("item type {0} cannot go in the belt")]
    NotBeltable(ItemCode),

    #[error("the paired hand {0} holds a two-handed item")]
    PairedTwoHanded(EquippedSlot),

    /// The disjointness invariant of the destination does not hold.
    #[error("{count} items overlap {location}")]
    MultipleOccupants { location: Location, count: usize },

    #[error("item {0} cannot be socketed into itself")]
    SelfSocket(ItemHandle),

    #[error(transparent)]
    Item(#[from] ItemError),
}

impl EngineError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        use PlacementError::*;
        match self {
            PairedTwoHanded(_) | NoCube => ErrorSeverity::Recoverable,
            MultipleOccupants { .. } => ErrorSeverity::Internal,
            Item(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use PlacementError::*;
        match self {
            UnknownHandle(_) => "PLACEMENT_UNKNOWN_HANDLE",
            InSocket(_) => "PLACEMENT_IN_SOCKET",
            InvalidDestination(_) => "PLACEMENT_INVALID_DESTINATION",
            OutOfBounds(_) => "PLACEMENT_OUT_OF_BOUNDS",
            NoCube => "PLACEMENT_NO_CUBE",
            CubeInCube => "PLACEMENT_CUBE_IN_CUBE",
            ExpansionSlot(_) => "PLACEMENT_EXPANSION_SLOT",
            WrongSlot { .. } => "PLACEMENT_WRONG_SLOT",
            NotBeltable(_) => "PLACEMENT_NOT_BELTABLE",
            PairedTwoHanded(_) => "PLACEMENT_PAIRED_TWO_HANDED",
            MultipleOccupants { .. } => "PLACEMENT_MULTIPLE_OCCUPANTS",
            SelfSocket(_) => "PLACEMENT_SELF_SOCKET",
            Item(_) => "PLACEMENT_ITEM",
        }
    }
}
