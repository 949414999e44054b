//! Data-driven catalogues and configuration for the item engine.
//!
//! This crate reads the static data `item-core` consults through its oracles:
//! - Item types (data-driven via RON)
//! - Stats, affixes, set and unique items, runewords (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Loaders deserialize straight into the `item-core` snapshot types, so a
//! loaded [`CatalogueSnapshot`](item_core::CatalogueSnapshot) can be handed to
//! the codec as an environment without further conversion.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AffixCatalog, AffixLoader, CatalogueFile, ConfigLoader, ContentFactory, LoadResult,
    TypeCatalog, TypeLoader,
};
