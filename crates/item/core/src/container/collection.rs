use std::collections::BTreeMap;

use super::index::{CategoryIndex, ContainerIndex};
use super::{BlockOptions, Location, PlacementError, StoragePage};
use crate::item::Item;
use crate::version::ItemVersion;

/// Stable reference to a top-level item of an [`ItemsCollection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u32);

impl core::fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Item list kept outside the placement engine (corpse, hireling).
#[derive(Clone, Debug, Default)]
pub struct SideList {
    pub present: bool,
    pub items: Vec<Item>,
}

impl SideList {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            present: true,
            items,
        }
    }
}

/// Top-level items of one character or stash page.
///
/// Items live in an arena addressed by [`ItemHandle`]. The canonical list
/// holds the items that are written back; the staging list holds items
/// evicted or detached by edits, which are not written. Both indexes are
/// repaired by every operation that changes membership or location.
#[derive(Clone, Debug)]
pub struct ItemsCollection {
    pub(super) version: ItemVersion,
    pub(super) options: BlockOptions,
    pub(super) arena: BTreeMap<ItemHandle, Item>,
    next_handle: u32,
    pub(super) canonical: Vec<ItemHandle>,
    pub(super) staging: Vec<ItemHandle>,
    pub(super) index: ContainerIndex,
    pub(super) categories: CategoryIndex,
    /// Former cube positions of items evicted when the cube left.
    pub(super) cube_displaced: BTreeMap<ItemHandle, (u8, u8)>,
    /// Items evicted by a belt shrink, in eviction order.
    pub(super) belt_displaced: Vec<ItemHandle>,
    pub(super) corpse: SideList,
    pub(super) hireling: SideList,
    pub(super) golem: Option<Item>,
}

impl ItemsCollection {
    pub fn new(version: ItemVersion, options: BlockOptions) -> Self {
        let index = ContainerIndex::new(&options.config, version);
        Self {
            version,
            hireling: SideList {
                present: options.hireling,
                items: Vec::new(),
            },
            options,
            arena: BTreeMap::new(),
            next_handle: 0,
            canonical: Vec::new(),
            staging: Vec::new(),
            index,
            categories: CategoryIndex::new(),
            cube_displaced: BTreeMap::new(),
            belt_displaced: Vec::new(),
            corpse: SideList::default(),
            golem: None,
        }
    }

    pub fn version(&self) -> ItemVersion {
        self.version
    }

    pub fn options(&self) -> &BlockOptions {
        &self.options
    }

    pub fn index(&self) -> &ContainerIndex {
        &self.index
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn get(&self, handle: ItemHandle) -> Option<&Item> {
        self.arena.get(&handle)
    }

    /// Mutable access for in-place edits. Location changes go through
    /// [`place`](Self::place) and are not reachable from here.
    pub fn get_mut(&mut self, handle: ItemHandle) -> Option<&mut Item> {
        self.arena.get_mut(&handle)
    }

    /// Canonical items in storage order.
    pub fn items(&self) -> impl Iterator<Item = (ItemHandle, &Item)> + '_ {
        self.canonical
            .iter()
            .filter_map(|handle| self.arena.get(handle).map(|item| (*handle, item)))
    }

    pub fn staging(&self) -> impl Iterator<Item = (ItemHandle, &Item)> + '_ {
        self.staging
            .iter()
            .filter_map(|handle| self.arena.get(handle).map(|item| (*handle, item)))
    }

    /// Number of top-level items the item block declares.
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn is_staged(&self, handle: ItemHandle) -> bool {
        self.staging.contains(&handle)
    }

    pub fn is_canonical(&self, handle: ItemHandle) -> bool {
        self.canonical.contains(&handle)
    }

    pub fn corpse(&self) -> &SideList {
        &self.corpse
    }

    pub fn corpse_mut(&mut self) -> &mut SideList {
        &mut self.corpse
    }

    pub fn hireling(&self) -> &SideList {
        &self.hireling
    }

    pub fn hireling_mut(&mut self) -> &mut SideList {
        &mut self.hireling
    }

    pub fn golem(&self) -> Option<&Item> {
        self.golem.as_ref()
    }

    pub fn set_golem(&mut self, item: Option<Item>) -> Option<Item> {
        core::mem::replace(&mut self.golem, item)
    }

    /// Whether a cube is among the canonical items.
    pub fn has_cube(&self) -> bool {
        self.items().any(|(_, item)| item.is_cube())
    }

    /// Adds a new item to the staging list; [`place`](Self::place) moves it
    /// into a container.
    pub fn add_item(&mut self, mut item: Item) -> Result<ItemHandle, PlacementError> {
        item.set_location(Location::Buffer)?;
        let handle = self.allocate(item);
        self.staging.push(handle);
        tracing::debug!(%handle, "staged new item");
        Ok(handle)
    }

    /// Removes an item from the collection altogether.
    pub fn remove_item(&mut self, handle: ItemHandle) -> Result<Item, PlacementError> {
        if !self.arena.contains_key(&handle) {
            return Err(PlacementError::UnknownHandle(handle));
        }
        let was_container = self.get(handle).is_some_and(|item| item.is_cube() || item.is_belt());
        self.detach(handle);
        self.staging.retain(|staged| *staged != handle);
        self.cube_displaced.remove(&handle);
        self.belt_displaced.retain(|displaced| *displaced != handle);
        let item = self
            .arena
            .remove(&handle)
            .ok_or(PlacementError::UnknownHandle(handle))?;
        if was_container {
            self.cascade(&mut Vec::new(), &mut Vec::new())?;
        }
        tracing::debug!(%handle, code = %item.type_code(), "removed item");
        Ok(item)
    }

    pub(super) fn allocate(&mut self, item: Item) -> ItemHandle {
        let handle = ItemHandle(self.next_handle);
        self.next_handle += 1;
        self.arena.insert(handle, item);
        handle
    }

    /// Links a decoded item into the canonical list at its own location.
    /// Returns false when the location is taken or out of bounds.
    pub(super) fn insert_canonical(&mut self, handle: ItemHandle) -> bool {
        let Some(item) = self.arena.get(&handle) else {
            return false;
        };
        if !self.index.insert(handle, item.location(), item.dimensions()) {
            return false;
        }
        self.categories.insert(handle, item);
        self.staging.retain(|staged| *staged != handle);
        if !self.canonical.contains(&handle) {
            self.canonical.push(handle);
        }
        true
    }

    /// Unlinks an item from both indexes; canonical order is kept.
    pub(super) fn unindex(&mut self, handle: ItemHandle) {
        if let Some(item) = self.arena.get(&handle) {
            self.index.remove(handle, item.location());
        }
        self.categories.remove(handle);
    }

    /// Unlinks an item from the canonical list and both indexes.
    pub(super) fn detach(&mut self, handle: ItemHandle) {
        self.unindex(handle);
        self.canonical.retain(|kept| *kept != handle);
    }

    pub(super) fn relocate(&mut self, handle: ItemHandle, location: Location) -> Result<(), PlacementError> {
        self.arena
            .get_mut(&handle)
            .ok_or(PlacementError::UnknownHandle(handle))?
            .set_location(location)?;
        Ok(())
    }

    /// Whether the alternate weapon set is available.
    pub fn is_expansion(&self) -> bool {
        self.options.expansion && self.version.supports_expansion()
    }

    /// Moves an item to the staging list.
    pub(super) fn stage(&mut self, handle: ItemHandle) -> Result<(), PlacementError> {
        self.detach(handle);
        self.relocate(handle, Location::Buffer)?;
        if !self.staging.contains(&handle) {
            self.staging.push(handle);
        }
        Ok(())
    }

    pub(super) fn page_items(&self, page: StoragePage) -> Vec<ItemHandle> {
        self.index.page_items(page).into_iter().collect()
    }
}
