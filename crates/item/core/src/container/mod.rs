//! Containers for top-level items.
//!
//! An [`ItemsCollection`] owns the top-level items of one character or
//! stash page and keeps two views over them in sync: the
//! [`ContainerIndex`] (grid cells, belt slots, equipped slots) and the
//! [`CategoryIndex`]. Items move only through
//! [`place`](ItemsCollection::place) and the socket operations; the item
//! blocks of a save file are read and written here as well.
mod blocks;
mod collection;
mod error;
mod grid;
mod index;
mod location;
mod placement;

pub use blocks::{BlockOptions, GOLEM_MARKER, HIRELING_MARKER, ITEM_LIST_MARKER};
pub use collection::{ItemHandle, ItemsCollection, SideList};
pub use error::PlacementError;
pub use grid::{Cell, Footprint, Grid};
pub use index::{Category, CategoryIndex, ContainerIndex};
pub use location::{EquippedSlot, Location, StoragePage};
pub use placement::PlaceOutcome;
