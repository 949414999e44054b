//! File loaders for the item catalogues.
//!
//! `types.ron` and `affixes.ron` become snapshots, `config.toml` becomes an
//! [`EngineConfig`](item_core::EngineConfig). Each loader validates its own
//! file; [`ContentFactory`] checks references between files.

pub mod affixes;
pub mod config;
pub mod factory;
pub mod types;

pub use affixes::{AffixCatalog, AffixLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use types::{TypeCatalog, TypeLoader};

use std::path::Path;

use anyhow::Context;

/// Loader errors carry the offending file and entry in their message.
pub type LoadResult<T> = anyhow::Result<T>;

/// The files of a content directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogueFile {
    Types,
    Affixes,
    Config,
}

impl CatalogueFile {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Types => "types.ron",
            Self::Affixes => "affixes.ron",
            Self::Config => "config.toml",
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Types => "item type catalog",
            Self::Affixes => "affix catalog",
            Self::Config => "engine config",
        }
    }
}

/// Reads `path` as `file`; the I/O error stays reachable through `downcast_ref`.
pub(crate) fn read_file(path: &Path, file: CatalogueFile) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {}", file.describe(), path.display()))
}
