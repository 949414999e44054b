use crate::container::StoragePage;
use crate::version::ItemVersion;

/// Dimensions of a storage grid in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub width: u8,
    pub height: u8,
}

impl GridSize {
    pub const fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    /// Number of cells in the grid.
    pub const fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Engine configuration constants and tunable grid dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Character inventory grid.
    pub inventory: GridSize,
    /// Cube grid.
    pub cube: GridSize,
    /// Stash grid for the three fixed-length generations.
    pub legacy_stash: GridSize,
    /// Stash grid for the 1.08 to 1.14 generations.
    pub stash: GridSize,
    /// Stash grid for the remaster generations.
    pub remaster_stash: GridSize,
}

impl EngineConfig {
    // ===== compile-time constants =====
    /// Maximum characters in personalization and ear names.
    pub const MAX_NAME_LEN: usize = 15;
    /// Hard cap on sockets regardless of type or bonuses.
    pub const MAX_SOCKETS: u8 = 6;
    pub const BELT_COLUMNS: usize = 4;
    pub const MAX_BELT_ROWS: usize = 4;
    /// Values a single property line may carry (parameter included).
    pub const MAX_STAT_VALUES: usize = 4;
    pub const EQUIPPED_SLOTS: usize = 12;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INVENTORY: GridSize = GridSize::new(10, 4);
    pub const DEFAULT_CUBE: GridSize = GridSize::new(3, 4);
    pub const DEFAULT_LEGACY_STASH: GridSize = GridSize::new(6, 4);
    pub const DEFAULT_STASH: GridSize = GridSize::new(6, 8);
    pub const DEFAULT_REMASTER_STASH: GridSize = GridSize::new(10, 10);

    pub fn new() -> Self {
        Self {
            inventory: Self::DEFAULT_INVENTORY,
            cube: Self::DEFAULT_CUBE,
            legacy_stash: Self::DEFAULT_LEGACY_STASH,
            stash: Self::DEFAULT_STASH,
            remaster_stash: Self::DEFAULT_REMASTER_STASH,
        }
    }

    /// Stash dimensions used by a given schema generation.
    pub fn stash_for(&self, version: ItemVersion) -> GridSize {
        if version.is_legacy() {
            self.legacy_stash
        } else if version.is_remaster() {
            self.remaster_stash
        } else {
            self.stash
        }
    }

    /// Grid dimensions for a storage page, or `None` for pages without a grid.
    pub fn grid_for(&self, page: StoragePage, version: ItemVersion) -> Option<GridSize> {
        match page {
            StoragePage::Inventory => Some(self.inventory),
            StoragePage::Stash => Some(self.stash_for(version)),
            StoragePage::Cube => Some(self.cube),
            StoragePage::Unknown => None,
        }
    }

    /// Largest belt the engine tracks.
    pub const fn max_belt_slots() -> usize {
        Self::BELT_COLUMNS * Self::MAX_BELT_ROWS
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
