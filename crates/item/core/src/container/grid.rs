use std::collections::{BTreeMap, BTreeSet};

use super::ItemHandle;
use crate::config::GridSize;

/// Grid cell as `(x, y)`.
pub type Cell = (u8, u8);

/// Rectangle covered by an item in grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl Footprint {
    /// `dimensions` is `(width, height)` as reported by the item.
    pub const fn new(x: u8, y: u8, dimensions: (u8, u8)) -> Self {
        Self {
            x,
            y,
            width: dimensions.0,
            height: dimensions.1,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width).map(move |dx| (self.x.saturating_add(dx), self.y.saturating_add(dy)))
        })
    }
}

/// Cell occupancy of one storage page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: BTreeMap<Cell, ItemHandle>,
}

impl Grid {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn contains(&self, footprint: &Footprint) -> bool {
        footprint.width > 0
            && footprint.height > 0
            && u16::from(footprint.x) + u16::from(footprint.width) <= u16::from(self.size.width)
            && u16::from(footprint.y) + u16::from(footprint.height) <= u16::from(self.size.height)
    }

    /// Distinct items covering any cell of `footprint`.
    pub fn occupants(&self, footprint: &Footprint) -> BTreeSet<ItemHandle> {
        footprint
            .cells()
            .filter_map(|cell| self.cells.get(&cell).copied())
            .collect()
    }

    /// Marks the cells of `footprint` as held by `handle`. Returns false
    /// without writing anything when a cell is taken by another item.
    pub fn insert(&mut self, handle: ItemHandle, footprint: &Footprint) -> bool {
        if self.occupants(footprint).iter().any(|other| *other != handle) {
            return false;
        }
        for cell in footprint.cells() {
            self.cells.insert(cell, handle);
        }
        true
    }

    pub fn remove(&mut self, handle: ItemHandle) {
        self.cells.retain(|_, occupant| *occupant != handle);
    }

    pub fn occupied_cells(&self) -> BTreeSet<Cell> {
        self.cells.keys().copied().collect()
    }

    pub fn handles(&self) -> BTreeSet<ItemHandle> {
        self.cells.values().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
