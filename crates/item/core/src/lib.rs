//! Item data engine for a legacy RPG save editor.
//!
//! `item-core` decodes, edits and re-encodes the bit-packed item records of
//! eight schema generations. Records are held as owned bit buffers whose
//! optional sections are located through a [`FieldTable`]; every edit keeps
//! that table consistent with the buffer. Top-level items are organised by an
//! [`ItemsCollection`], which owns placement and the item blocks of a save
//! file. Catalogue data is supplied through the oracles in [`env`].
pub mod bits;
pub mod codec;
pub mod config;
pub mod container;
pub mod env;
pub mod error;
pub mod item;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use bits::{BitBuffer, BitError};
pub use codec::{
    CodecError, DurabilityRecord, EarRecord, ExtendedRecord, FieldId, FieldSlot, FieldTable,
    ItemFlags, ItemRecord, Quality, QualityData, RawLocation, RawProperty, RunewordRecord,
};
pub use config::{EngineConfig, GridSize};
pub use container::{
    BlockOptions, Category, CategoryIndex, ContainerIndex, EquippedSlot, ItemHandle,
    ItemsCollection, Location, PlaceOutcome, PlacementError, SideList, StoragePage,
};
pub use env::{
    AffixDefinition, AffixOracle, AffixSnapshot, BodySlots, CatalogueSnapshot, Env, ItemCode,
    ItemEnv, ItemType, ItemTypeFlags, ItemTypeOracle, ModRange, OracleError, RunewordDefinition,
    SetItemDefinition, StatDefinition, TypeSnapshot, UniqueDefinition,
};
pub use error::{EngineError, ErrorSeverity, Mutation};
pub use item::{
    CharacterContext, CreateOptions, DamageRange, DisplayedDamage, DisplayedDurability, Item,
    ItemError, MagicalAttribute, Requirements,
};
pub use version::ItemVersion;
