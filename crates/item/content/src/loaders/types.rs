//! Item type catalogue loader.

use std::path::Path;

use item_core::{ItemType, TypeSnapshot};
use serde::{Deserialize, Serialize};

use crate::loaders::{CatalogueFile, LoadResult, read_file};

/// Item type catalogue structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    pub types: Vec<ItemType>,
}

/// Loader for item types from RON files.
pub struct TypeLoader;

impl TypeLoader {
    /// Load the item type catalogue from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing TypeCatalog
    ///
    /// # Returns
    ///
    /// Returns a TypeSnapshot keyed by type code.
    pub fn load(path: &Path) -> LoadResult<TypeSnapshot> {
        let content = read_file(path, CatalogueFile::Types)?;
        Self::parse(&content)
    }

    /// Parse an item type catalogue from RON text.
    pub fn parse(content: &str) -> LoadResult<TypeSnapshot> {
        let catalog: TypeCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item type catalog RON: {}", e))?;

        let mut snapshot = TypeSnapshot::default();
        for item_type in catalog.types {
            if !item_type.code.is_valid() {
                anyhow::bail!("Item type '{}' has no code", item_type.name);
            }
            if item_type.width == 0 || item_type.height == 0 {
                anyhow::bail!("Item type '{}' has an empty footprint", item_type.code);
            }
            if snapshot.types.contains_key(&item_type.code) {
                anyhow::bail!("Duplicate item type code '{}'", item_type.code);
            }
            snapshot.insert(item_type);
        }

        // Upgrade chains may point forward, so resolve them once all types are in.
        for item_type in snapshot.types.values() {
            if let Some(next) = item_type.upgrade_to {
                if !snapshot.types.contains_key(&next) {
                    anyhow::bail!(
                        "Item type '{}' upgrades to unknown type '{}'",
                        item_type.code,
                        next
                    );
                }
            }
        }

        Ok(snapshot)
    }
}
