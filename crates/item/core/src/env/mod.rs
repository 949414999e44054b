//! Traits describing read-only catalogue data.
//!
//! Oracles expose item types, stat encodings, affixes, set and unique items and
//! runewords. The [`Env`] aggregate bundles them so the codec and the model can
//! resolve codes and ids without hard coupling to concrete implementations.
//!
//! A lookup that fails while decoding a record is treated as corruption of
//! that record, never as a recoverable default.
mod affixes;
mod error;
mod snapshot;
mod types;

pub use affixes::{
    AffixDefinition, AffixKind, ModRange, RareName, RunewordDefinition, SetItemDefinition,
    StatDefinition, UniqueDefinition,
};
pub use error::OracleError;
pub use snapshot::{AffixSnapshot, CatalogueSnapshot, TypeSnapshot};
pub use types::{BodySlots, ItemCode, ItemType, ItemTypeFlags, SocketApply, SocketMods};

/// Lookup of item types by 4-character code.
pub trait ItemTypeOracle: Send + Sync {
    fn item_type(&self, code: ItemCode) -> Option<&ItemType>;

    /// Resolves a code, treating absence as an error.
    fn require_type(&self, code: ItemCode) -> Result<&ItemType, OracleError> {
        self.item_type(code)
            .ok_or(OracleError::UnknownItemType(code))
    }
}

/// Lookup of stats, affixes, set/unique items and runewords by numeric id.
///
/// List accessors return entries in ascending id order so that legacy
/// regeneration is deterministic.
pub trait AffixOracle: Send + Sync {
    fn stat(&self, id: u16) -> Option<&StatDefinition>;

    fn magic_prefix(&self, id: u16) -> Option<&AffixDefinition>;
    fn magic_suffix(&self, id: u16) -> Option<&AffixDefinition>;
    fn magic_prefixes(&self) -> Vec<&AffixDefinition>;
    fn magic_suffixes(&self) -> Vec<&AffixDefinition>;

    fn rare_prefix(&self, id: u16) -> Option<&str>;
    fn rare_suffix(&self, id: u16) -> Option<&str>;
    fn rare_prefixes(&self) -> Vec<&RareName>;
    fn rare_suffixes(&self) -> Vec<&RareName>;

    fn set_item(&self, id: u16) -> Option<&SetItemDefinition>;
    fn set_items(&self) -> Vec<&SetItemDefinition>;

    fn unique_item(&self, id: u16) -> Option<&UniqueDefinition>;
    fn unique_items(&self) -> Vec<&UniqueDefinition>;

    fn runeword(&self, id: u16) -> Option<&RunewordDefinition>;
    fn runewords(&self) -> Vec<&RunewordDefinition>;

    fn require_stat(&self, id: u16) -> Result<&StatDefinition, OracleError> {
        self.stat(id).ok_or(OracleError::UnknownStat(id))
    }
}

/// Aggregates the read-only catalogues required by the codec and the model.
pub struct Env<'a, T, A>
where
    T: ItemTypeOracle + ?Sized,
    A: AffixOracle + ?Sized,
{
    types: Option<&'a T>,
    affixes: Option<&'a A>,
}

pub type ItemEnv<'a> = Env<'a, dyn ItemTypeOracle + 'a, dyn AffixOracle + 'a>;

impl<'a, T, A> Env<'a, T, A>
where
    T: ItemTypeOracle + ?Sized,
    A: AffixOracle + ?Sized,
{
    pub fn new(types: Option<&'a T>, affixes: Option<&'a A>) -> Self {
        Self { types, affixes }
    }

    pub fn with_all(types: &'a T, affixes: &'a A) -> Self {
        Self::new(Some(types), Some(affixes))
    }

    pub fn empty() -> Self {
        Self {
            types: None,
            affixes: None,
        }
    }

    /// Returns the ItemTypeOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TypesNotAvailable` if no type oracle was provided.
    pub fn types(&self) -> Result<&'a T, OracleError> {
        self.types.ok_or(OracleError::TypesNotAvailable)
    }

    /// Returns the AffixOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::AffixesNotAvailable` if no affix oracle was provided.
    pub fn affixes(&self) -> Result<&'a A, OracleError> {
        self.affixes.ok_or(OracleError::AffixesNotAvailable)
    }
}

impl<'a, T, A> Env<'a, T, A>
where
    T: ItemTypeOracle + 'a,
    A: AffixOracle + 'a,
{
    /// Converts this environment into a trait-object based `ItemEnv`.
    pub fn as_item_env(&self) -> ItemEnv<'a> {
        let types: Option<&'a dyn ItemTypeOracle> = self.types.map(|types| types as _);
        let affixes: Option<&'a dyn AffixOracle> = self.affixes.map(|affixes| affixes as _);
        Env::new(types, affixes)
    }
}

impl<T, A> Clone for Env<'_, T, A>
where
    T: ItemTypeOracle + ?Sized,
    A: AffixOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A> Copy for Env<'_, T, A>
where
    T: ItemTypeOracle + ?Sized,
    A: AffixOracle + ?Sized,
{
}

impl<T, A> core::fmt::Debug for Env<'_, T, A>
where
    T: ItemTypeOracle + ?Sized,
    A: AffixOracle + ?Sized,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("types", &self.types.is_some())
            .field("affixes", &self.affixes.is_some())
            .finish()
    }
}
