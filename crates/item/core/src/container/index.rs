//! Lookup structures kept in sync with the canonical item list.
//!
//! Both indexes hold [`ItemHandle`]s only; the items themselves live in the
//! collection arena.
use std::collections::{BTreeMap, BTreeSet};

use super::grid::{Cell, Footprint, Grid};
use super::{EquippedSlot, ItemHandle, Location, PlacementError, StoragePage};
use crate::config::EngineConfig;
use crate::item::Item;
use crate::version::ItemVersion;

const BELT_SLOTS: usize = EngineConfig::max_belt_slots();

/// Occupancy of every location kind a top-level item can hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerIndex {
    grids: BTreeMap<StoragePage, Grid>,
    belt: [Option<ItemHandle>; BELT_SLOTS],
    belt_capacity: usize,
    equipped: [Option<ItemHandle>; EngineConfig::EQUIPPED_SLOTS],
}

impl ContainerIndex {
    pub fn new(config: &EngineConfig, version: ItemVersion) -> Self {
        let grids = [StoragePage::Inventory, StoragePage::Cube, StoragePage::Stash]
            .into_iter()
            .filter_map(|page| config.grid_for(page, version).map(|size| (page, Grid::new(size))))
            .collect();
        Self {
            grids,
            belt: [None; BELT_SLOTS],
            belt_capacity: EngineConfig::BELT_COLUMNS,
            equipped: [None; EngineConfig::EQUIPPED_SLOTS],
        }
    }

    pub fn grid(&self, page: StoragePage) -> Option<&Grid> {
        self.grids.get(&page)
    }

    /// Cells covered by items stored on `page`.
    pub fn occupied_cells(&self, page: StoragePage) -> BTreeSet<Cell> {
        self.grids
            .get(&page)
            .map(Grid::occupied_cells)
            .unwrap_or_default()
    }

    pub fn page_items(&self, page: StoragePage) -> BTreeSet<ItemHandle> {
        self.grids.get(&page).map(Grid::handles).unwrap_or_default()
    }

    pub fn equipped(&self, slot: EquippedSlot) -> Option<ItemHandle> {
        self.equipped[slot.index()]
    }

    pub fn belt_slot(&self, index: usize) -> Option<ItemHandle> {
        self.belt.get(index).copied().flatten()
    }

    /// Usable belt slots for the currently worn belt.
    pub fn belt_capacity(&self) -> usize {
        self.belt_capacity
    }

    pub(crate) fn set_belt_capacity(&mut self, capacity: usize) {
        self.belt_capacity = capacity.min(BELT_SLOTS);
    }

    /// Occupied belt slots in index order.
    pub fn belt_items(&self) -> Vec<(usize, ItemHandle)> {
        self.belt
            .iter()
            .enumerate()
            .filter_map(|(index, handle)| handle.map(|handle| (index, handle)))
            .collect()
    }

    pub fn free_belt_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.belt_capacity).filter(|index| self.belt[*index].is_none())
    }

    /// Items held at `location` by an item of `dimensions`, after the bounds
    /// check of the destination.
    pub fn occupants(
        &self,
        location: Location,
        dimensions: (u8, u8),
    ) -> Result<BTreeSet<ItemHandle>, PlacementError> {
        match location {
            Location::Stored { page, x, y } => {
                let grid = self
                    .grids
                    .get(&page)
                    .ok_or(PlacementError::InvalidDestination(location))?;
                let footprint = Footprint::new(x, y, dimensions);
                if !grid.contains(&footprint) {
                    return Err(PlacementError::OutOfBounds(location));
                }
                Ok(grid.occupants(&footprint))
            }
            Location::Equipped(slot) => Ok(self.equipped(slot).into_iter().collect()),
            Location::Belt(index) => {
                if usize::from(index) >= self.belt_capacity {
                    return Err(PlacementError::OutOfBounds(location));
                }
                Ok(self.belt_slot(usize::from(index)).into_iter().collect())
            }
            Location::Socket(_) | Location::Buffer => {
                Err(PlacementError::InvalidDestination(location))
            }
        }
    }

    /// Records `handle` at `location`. Returns false without writing when the
    /// destination is taken or out of bounds. Pages without a grid are not
    /// indexed.
    pub(crate) fn insert(&mut self, handle: ItemHandle, location: Location, dimensions: (u8, u8)) -> bool {
        match location {
            Location::Stored { page, x, y } => {
                let footprint = Footprint::new(x, y, dimensions);
                match self.grids.get_mut(&page) {
                    Some(grid) => grid.contains(&footprint) && grid.insert(handle, &footprint),
                    None => true,
                }
            }
            Location::Equipped(slot) => claim(&mut self.equipped[slot.index()], handle),
            Location::Belt(index) => match self.belt.get_mut(usize::from(index)) {
                Some(entry) => claim(entry, handle),
                None => false,
            },
            // Unindexed locations never conflict.
            Location::Socket(_) | Location::Buffer => true,
        }
    }

    pub(crate) fn remove(&mut self, handle: ItemHandle, location: Location) {
        match location {
            Location::Stored { page, .. } => {
                if let Some(grid) = self.grids.get_mut(&page) {
                    grid.remove(handle);
                }
            }
            Location::Equipped(slot) => release(&mut self.equipped[slot.index()], handle),
            Location::Belt(index) => {
                if let Some(entry) = self.belt.get_mut(usize::from(index)) {
                    release(entry, handle);
                }
            }
            Location::Socket(_) | Location::Buffer => {}
        }
    }
}

fn claim(entry: &mut Option<ItemHandle>, handle: ItemHandle) -> bool {
    match entry {
        Some(other) if *other != handle => false,
        _ => {
            *entry = Some(handle);
            true
        }
    }
}

fn release(entry: &mut Option<ItemHandle>, handle: ItemHandle) {
    if *entry == Some(handle) {
        *entry = None;
    }
}

/// Categories tracked for the canonical list.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Gems, potions and runes.
    Gps,
    Stackable,
    Armor,
    Weapon,
}

impl Category {
    pub fn contains(self, item: &Item) -> bool {
        match self {
            Self::Gps => item.is_gps(),
            Self::Stackable => item.is_stackable(),
            Self::Armor => item.is_armor(),
            Self::Weapon => item.is_weapon(),
        }
    }
}

/// Category views over the canonical list, stored as handle sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    sets: BTreeMap<Category, BTreeSet<ItemHandle>>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, handle: ItemHandle, item: &Item) {
        use strum::IntoEnumIterator;

        for category in Category::iter().filter(|category| category.contains(item)) {
            self.sets.entry(category).or_default().insert(handle);
        }
    }

    pub(crate) fn remove(&mut self, handle: ItemHandle) {
        for set in self.sets.values_mut() {
            set.remove(&handle);
        }
        self.sets.retain(|_, set| !set.is_empty());
    }

    pub fn handles(&self, category: Category) -> impl Iterator<Item = ItemHandle> + '_ {
        self.sets.get(&category).into_iter().flatten().copied()
    }

    pub fn contains(&self, category: Category, handle: ItemHandle) -> bool {
        self.sets.get(&category).is_some_and(|set| set.contains(&handle))
    }

    pub fn count(&self, category: Category) -> usize {
        self.sets.get(&category).map_or(0, BTreeSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn belt_slots_respect_capacity() {
        let mut index = ContainerIndex::new(&EngineConfig::default(), ItemVersion::V110);
        assert_eq!(index.belt_capacity(), 4);
        assert_eq!(
            index.occupants(Location::Belt(4), (1, 1)),
            Err(PlacementError::OutOfBounds(Location::Belt(4)))
        );

        index.set_belt_capacity(8);
        assert!(index.insert(ItemHandle(3), Location::Belt(5), (1, 1)));
        assert!(!index.insert(ItemHandle(4), Location::Belt(5), (1, 1)));
        assert_eq!(index.belt_items(), vec![(5, ItemHandle(3))]);
        assert_eq!(index.free_belt_slots().count(), 7);

        index.remove(ItemHandle(4), Location::Belt(5));
        assert_eq!(index.belt_slot(5), Some(ItemHandle(3)));
        index.remove(ItemHandle(3), Location::Belt(5));
        assert!(index.belt_items().is_empty());
    }

    #[test]
    fn unknown_pages_are_not_destinations() {
        let index = ContainerIndex::new(&EngineConfig::default(), ItemVersion::V110);
        let location = Location::stored(StoragePage::Unknown, 0, 0);
        assert_eq!(
            index.occupants(location, (1, 1)),
            Err(PlacementError::InvalidDestination(location))
        );
        assert_eq!(index.grid(StoragePage::Stash).unwrap().size().height, 8);
    }

    #[test]
    fn equipped_slots_hold_one_item() {
        let mut index = ContainerIndex::new(&EngineConfig::default(), ItemVersion::V110);
        let slot = Location::Equipped(EquippedSlot::Head);
        assert!(index.insert(ItemHandle(1), slot, (2, 2)));
        assert!(!index.insert(ItemHandle(2), slot, (2, 2)));
        assert_eq!(index.occupants(slot, (2, 2)).unwrap(), BTreeSet::from([ItemHandle(1)]));
    }
}
