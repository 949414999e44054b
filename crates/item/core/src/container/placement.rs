//! Moving top-level items between containers.
//!
//! Every rule is checked before the first write:
//!
//! 1. The destination must exist and hold the item's footprint.
//! 2. At most one other item may overlap it. A socket filler dropped on an
//!    item that accepts it is socketed instead of placed.
//! 3. A two-handed item evicts the paired hand; a paired two-handed item
//!    blocks the placement.
//!
//! Displaced items go to the staging list. Belt and cube changes then
//! cascade over the items they hold.
use super::{EquippedSlot, ItemHandle, ItemsCollection, Location, PlacementError, StoragePage};
use crate::config::EngineConfig;
use crate::env::ItemEnv;
use crate::item::{CharacterContext, Item};

/// What a successful placement did besides moving the item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaceOutcome {
    /// Items moved to the staging list.
    pub evicted: Vec<ItemHandle>,
    /// Parent and socket index when the item was socketed instead.
    pub socketed_into: Option<(ItemHandle, usize)>,
    /// Staged items moved back into a container by a cascade.
    pub rehomed: Vec<ItemHandle>,
}

impl ItemsCollection {
    /// Moves a top-level item to `location`.
    pub fn place(
        &mut self,
        handle: ItemHandle,
        location: Location,
        ctx: CharacterContext,
        env: &ItemEnv<'_>,
    ) -> Result<PlaceOutcome, PlacementError> {
        let item = self.get(handle).ok_or(PlacementError::UnknownHandle(handle))?;
        if item.location().is_socket() {
            return Err(PlacementError::InSocket(handle));
        }
        let mut outcome = PlaceOutcome::default();
        if location == Location::Buffer {
            self.stage(handle)?;
            self.cascade(&mut outcome.evicted, &mut outcome.rehomed)?;
            return Ok(outcome);
        }

        self.check_destination(handle, item, location)?;
        let mut occupants = self.index.occupants(location, item.dimensions())?;
        occupants.remove(&handle);
        if occupants.len() > 1 {
            return Err(PlacementError::MultipleOccupants {
                location,
                count: occupants.len(),
            });
        }
        if let Some(&occupant) = occupants.first() {
            let accepts = self
                .get(occupant)
                .is_some_and(|parent| item.is_socket_filler() && parent.can_socket(item, ctx).is_ok());
            if accepts {
                let index = self.socket_item(occupant, handle, ctx, env)?;
                outcome.socketed_into = Some((occupant, index));
                return Ok(outcome);
            }
        }
        let mut evictions: Vec<ItemHandle> = occupants.into_iter().collect();
        if let Location::Equipped(slot) = location {
            if let Some(paired) = self.paired_occupant(handle, slot) {
                if item.is_two_handed() {
                    evictions.push(paired);
                } else if self.get(paired).is_some_and(Item::is_two_handed) {
                    return Err(PlacementError::PairedTwoHanded(paired_slot(slot)));
                }
            }
        }

        let previous = item.location();
        let was_canonical = self.is_canonical(handle);
        self.unindex(handle);
        if let Err(err) = self.relocate(handle, location) {
            if was_canonical {
                self.insert_canonical(handle);
            }
            return Err(err);
        }
        for evicted in &evictions {
            self.stage(*evicted)?;
        }
        if !self.insert_canonical(handle) {
            return Err(PlacementError::MultipleOccupants { location, count: 1 });
        }
        self.cube_displaced.remove(&handle);
        self.belt_displaced.retain(|displaced| *displaced != handle);
        tracing::debug!(%handle, from = %previous, to = %location, evicted = evictions.len(), "placed item");

        outcome.evicted = evictions;
        self.cascade(&mut outcome.evicted, &mut outcome.rehomed)?;
        Ok(outcome)
    }

    fn check_destination(
        &self,
        handle: ItemHandle,
        item: &Item,
        location: Location,
    ) -> Result<(), PlacementError> {
        match location {
            Location::Stored {
                page: StoragePage::Cube,
                ..
            } => {
                if item.is_cube() {
                    return Err(PlacementError::CubeInCube);
                }
                let cube = self
                    .items()
                    .any(|(other, item)| other != handle && item.is_cube());
                if !cube {
                    return Err(PlacementError::NoCube);
                }
            }
            Location::Equipped(slot) => {
                if slot.requires_expansion() && !self.is_expansion() {
                    return Err(PlacementError::ExpansionSlot(slot));
                }
                if !item.item_type().body_slots.contains(slot.body_slot()) {
                    return Err(PlacementError::WrongSlot {
                        code: item.type_code(),
                        slot,
                    });
                }
            }
            Location::Belt(_) => {
                if !item.is_beltable() {
                    return Err(PlacementError::NotBeltable(item.type_code()));
                }
            }
            Location::Stored { .. } => {}
            Location::Socket(_) | Location::Buffer => {
                return Err(PlacementError::InvalidDestination(location));
            }
        }
        Ok(())
    }

    fn paired_occupant(&self, handle: ItemHandle, slot: EquippedSlot) -> Option<ItemHandle> {
        let paired = slot.paired_hand()?;
        self.index.equipped(paired).filter(|other| *other != handle)
    }

    // ===== sockets =====

    /// Socket the item `child` into `parent`. The child leaves the collection
    /// and becomes part of the parent.
    pub fn socket_item(
        &mut self,
        parent: ItemHandle,
        child: ItemHandle,
        ctx: CharacterContext,
        env: &ItemEnv<'_>,
    ) -> Result<usize, PlacementError> {
        if parent == child {
            return Err(PlacementError::SelfSocket(child));
        }
        let parent_item = self.get(parent).ok_or(PlacementError::UnknownHandle(parent))?;
        let child_item = self.get(child).ok_or(PlacementError::UnknownHandle(child))?;
        parent_item.can_socket(child_item, ctx)?;

        let was_canonical = self.is_canonical(child);
        self.detach(child);
        self.staging.retain(|staged| *staged != child);
        self.cube_displaced.remove(&child);
        self.belt_displaced.retain(|displaced| *displaced != child);
        let child_item = self
            .arena
            .remove(&child)
            .ok_or(PlacementError::UnknownHandle(child))?;
        let Some(parent_item) = self.arena.get_mut(&parent) else {
            return Err(PlacementError::UnknownHandle(parent));
        };

        match parent_item.socket(child_item, ctx, env) {
            Ok(index) => {
                tracing::debug!(%parent, %child, index, "socketed collection item");
                Ok(index)
            }
            Err(rejected) => {
                let (err, item) = rejected.into_parts();
                self.arena.insert(child, item);
                if !(was_canonical && self.insert_canonical(child)) {
                    self.staging.push(child);
                }
                Err(err.into())
            }
        }
    }

    /// Removes the child at `index` from `parent` into the staging list.
    pub fn unsocket_item(&mut self, parent: ItemHandle, index: usize) -> Result<ItemHandle, PlacementError> {
        let child = self
            .get_mut(parent)
            .ok_or(PlacementError::UnknownHandle(parent))?
            .unsocket(index)?;
        let handle = self.allocate(child);
        self.staging.push(handle);
        Ok(handle)
    }

    /// Removes every child of `parent` into the staging list, in socket order.
    pub fn unsocket_all(&mut self, parent: ItemHandle) -> Result<Vec<ItemHandle>, PlacementError> {
        let children = self
            .get_mut(parent)
            .ok_or(PlacementError::UnknownHandle(parent))?
            .unsocket_all()?;
        let handles: Vec<_> = children.into_iter().map(|child| self.allocate(child)).collect();
        self.staging.extend_from_slice(&handles);
        Ok(handles)
    }

    // ===== cascades =====

    pub(super) fn cascade(
        &mut self,
        evicted: &mut Vec<ItemHandle>,
        rehomed: &mut Vec<ItemHandle>,
    ) -> Result<(), PlacementError> {
        self.refresh_belt(evicted, rehomed)?;
        self.refresh_cube(evicted, rehomed)
    }

    /// Belt slots granted by the worn belt; four without one.
    pub fn belt_capacity_for_worn(&self) -> usize {
        self.index
            .equipped(EquippedSlot::Belt)
            .and_then(|handle| self.get(handle))
            .filter(|item| item.is_belt())
            .map_or(EngineConfig::BELT_COLUMNS, |belt| belt.item_type().belt_slots())
    }

    fn refresh_belt(
        &mut self,
        evicted: &mut Vec<ItemHandle>,
        rehomed: &mut Vec<ItemHandle>,
    ) -> Result<(), PlacementError> {
        let capacity = self.belt_capacity_for_worn();
        let previous = self.index.belt_capacity();
        if capacity == previous {
            return Ok(());
        }
        self.index.set_belt_capacity(capacity);

        if capacity < previous {
            for (slot, handle) in self.index.belt_items() {
                if slot >= capacity {
                    self.stage(handle)?;
                    self.belt_displaced.push(handle);
                    evicted.push(handle);
                }
            }
        } else {
            // Only items pushed out by an earlier shrink return.
            let mut free = self.index.free_belt_slots().collect::<Vec<_>>().into_iter();
            let displaced = core::mem::take(&mut self.belt_displaced);
            let mut waiting = Vec::new();
            for handle in displaced {
                if !self.is_staged(handle) {
                    continue;
                }
                let Some(slot) = free.next() else {
                    waiting.push(handle);
                    continue;
                };
                self.relocate(handle, Location::Belt(slot as u8))?;
                self.insert_canonical(handle);
                evicted.retain(|other| *other != handle);
                rehomed.push(handle);
            }
            self.belt_displaced = waiting;
        }
        tracing::debug!(previous, capacity, "belt capacity changed");
        Ok(())
    }

    fn refresh_cube(
        &mut self,
        evicted: &mut Vec<ItemHandle>,
        rehomed: &mut Vec<ItemHandle>,
    ) -> Result<(), PlacementError> {
        if !self.has_cube() {
            for handle in self.page_items(StoragePage::Cube) {
                if let Some(Location::Stored { x, y, .. }) = self.get(handle).map(Item::location) {
                    self.cube_displaced.insert(handle, (x, y));
                }
                self.stage(handle)?;
                evicted.push(handle);
            }
            return Ok(());
        }

        let displaced = core::mem::take(&mut self.cube_displaced);
        for (handle, (x, y)) in displaced {
            let Some(item) = self.get(handle).filter(|_| self.is_staged(handle)) else {
                continue;
            };
            let location = Location::stored(StoragePage::Cube, x, y);
            let free = self
                .index
                .occupants(location, item.dimensions())
                .is_ok_and(|occupants| occupants.is_empty());
            if free {
                self.relocate(handle, location)?;
                self.insert_canonical(handle);
                evicted.retain(|other| *other != handle);
                rehomed.push(handle);
            }
        }
        Ok(())
    }
}

fn paired_slot(slot: EquippedSlot) -> EquippedSlot {
    slot.paired_hand().unwrap_or(slot)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::container::{BlockOptions, Category, Footprint};
    use crate::error::{EngineError, ErrorSeverity};
    use crate::item::CreateOptions;
    use crate::testing::{self, code};
    use crate::version::ItemVersion;

    const CTX: CharacterContext = CharacterContext::new(30);

    fn collection() -> ItemsCollection {
        ItemsCollection::new(ItemVersion::V110, BlockOptions::default())
    }

    fn add(items: &mut ItemsCollection, env: &ItemEnv<'_>, raw: &str) -> ItemHandle {
        let options = CreateOptions::default().with_id(items.len() as u32 + 1);
        let item = Item::create(env, ItemVersion::V110, code(raw), options).unwrap();
        items.add_item(item).unwrap()
    }

    fn add_at(
        items: &mut ItemsCollection,
        env: &ItemEnv<'_>,
        raw: &str,
        location: Location,
    ) -> ItemHandle {
        let handle = add(items, env, raw);
        items.place(handle, location, CTX, env).unwrap();
        handle
    }

    fn stored(page: StoragePage, x: u8, y: u8) -> Location {
        Location::stored(page, x, y)
    }

    /// Occupied cells must equal the union of indexed footprints.
    fn assert_grid_matches(items: &ItemsCollection, page: StoragePage) {
        let mut expected = BTreeSet::new();
        for (_, item) in items.items() {
            if let Location::Stored { page: p, x, y } = item.location() {
                if p == page {
                    let footprint = Footprint::new(x, y, item.dimensions());
                    for cell in footprint.cells() {
                        assert!(expected.insert(cell), "footprints overlap at {cell:?}");
                    }
                }
            }
        }
        assert_eq!(items.index().occupied_cells(page), expected);
    }

    #[test]
    fn two_handed_weapons_evict_the_off_hand() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let shield = add_at(&mut items, &env, "buc", Location::Equipped(EquippedSlot::LeftHand));
        let sword = add(&mut items, &env, "2hs");

        let outcome = items
            .place(sword, Location::Equipped(EquippedSlot::RightHand), CTX, &env)
            .unwrap();

        assert_eq!(outcome.evicted, vec![shield]);
        assert!(items.is_staged(shield));
        assert_eq!(items.get(shield).unwrap().location(), Location::Buffer);
        assert_eq!(items.index().equipped(EquippedSlot::RightHand), Some(sword));
        assert_eq!(items.index().equipped(EquippedSlot::LeftHand), None);
        assert!(!items.categories().contains(Category::Armor, shield));
    }

    #[test]
    fn paired_two_hander_blocks_the_other_hand() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let sword = add_at(&mut items, &env, "2hs", Location::Equipped(EquippedSlot::RightHand));
        let shield = add(&mut items, &env, "buc");

        let err = items
            .place(shield, Location::Equipped(EquippedSlot::LeftHand), CTX, &env)
            .unwrap_err();
        assert_eq!(err, PlacementError::PairedTwoHanded(EquippedSlot::RightHand));
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert!(items.is_staged(shield));
        assert_eq!(items.index().equipped(EquippedSlot::RightHand), Some(sword));

        // the alternate set is independent
        items
            .place(shield, Location::Equipped(EquippedSlot::AltLeftHand), CTX, &env)
            .unwrap();
    }

    #[test]
    fn shrinking_the_belt_evicts_the_overflow() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let sash = add_at(&mut items, &env, "lbl", Location::Equipped(EquippedSlot::Belt));
        assert_eq!(items.index().belt_capacity(), 8);
        let potions: Vec<_> = (0..6)
            .map(|slot| add_at(&mut items, &env, "hp1", Location::Belt(slot)))
            .collect();

        let twine = add(&mut items, &env, "tbl");
        let outcome = items
            .place(twine, Location::Equipped(EquippedSlot::Belt), CTX, &env)
            .unwrap();

        let evicted_potions: Vec<_> = outcome
            .evicted
            .iter()
            .filter(|handle| potions.contains(handle))
            .copied()
            .collect();
        assert_eq!(evicted_potions, vec![potions[4], potions[5]]);
        assert!(outcome.evicted.contains(&sash));
        assert_eq!(items.index().belt_capacity(), 4);
        assert_eq!(items.index().belt_items().len(), 4);
        assert_eq!(items.categories().count(Category::Gps), 4);

        let outcome = items
            .place(sash, Location::Equipped(EquippedSlot::Belt), CTX, &env)
            .unwrap();
        assert_eq!(outcome.evicted, vec![twine]);
        assert_eq!(outcome.rehomed, vec![potions[4], potions[5]]);
        assert_eq!(items.index().belt_items().len(), 6);
    }

    #[test]
    fn growing_the_belt_returns_only_displaced_items() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let sash = add_at(&mut items, &env, "lbl", Location::Equipped(EquippedSlot::Belt));
        let potions: Vec<_> = (0..5)
            .map(|slot| add_at(&mut items, &env, "hp1", Location::Belt(slot)))
            .collect();
        let twine = add(&mut items, &env, "tbl");
        items
            .place(twine, Location::Equipped(EquippedSlot::Belt), CTX, &env)
            .unwrap();
        assert!(items.is_staged(potions[4]));

        let spare = add(&mut items, &env, "hp1");
        let outcome = items
            .place(sash, Location::Equipped(EquippedSlot::Belt), CTX, &env)
            .unwrap();
        assert_eq!(outcome.rehomed, vec![potions[4]]);
        assert!(items.is_staged(spare));
        assert_eq!(items.get(spare).unwrap().location(), Location::Buffer);
        assert_eq!(items.index().belt_items().len(), 5);
    }

    #[test]
    fn belt_slots_need_beltable_items_within_capacity() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let potion = add(&mut items, &env, "hp1");
        let ring = add(&mut items, &env, "rin");

        assert_eq!(
            items.place(potion, Location::Belt(4), CTX, &env),
            Err(PlacementError::OutOfBounds(Location::Belt(4)))
        );
        assert_eq!(
            items.place(ring, Location::Belt(0), CTX, &env),
            Err(PlacementError::NotBeltable(code("rin")))
        );
        items.place(potion, Location::Belt(3), CTX, &env).unwrap();
    }

    #[test]
    fn grid_moves_swap_single_occupants() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let first = add_at(&mut items, &env, "cap", stored(StoragePage::Inventory, 0, 0));
        let second = add_at(&mut items, &env, "lsd", stored(StoragePage::Inventory, 4, 0));
        assert_grid_matches(&items, StoragePage::Inventory);

        let third = add(&mut items, &env, "hax");
        let outcome = items
            .place(third, stored(StoragePage::Inventory, 1, 1), CTX, &env)
            .unwrap();
        assert_eq!(outcome.evicted, vec![first]);
        assert_grid_matches(&items, StoragePage::Inventory);

        // moving an item onto part of its own footprint is a plain move
        items
            .place(second, stored(StoragePage::Inventory, 4, 1), CTX, &env)
            .unwrap();
        assert_grid_matches(&items, StoragePage::Inventory);
        assert_eq!(items.len(), 2);
        assert_eq!(items.staging().count(), 1);
    }

    #[test]
    fn overlapping_two_items_is_refused() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        add_at(&mut items, &env, "cap", stored(StoragePage::Stash, 0, 0));
        add_at(&mut items, &env, "cap", stored(StoragePage::Stash, 2, 0));
        let sword = add(&mut items, &env, "lsd");
        let before = items.index().occupied_cells(StoragePage::Stash);

        let err = items
            .place(sword, stored(StoragePage::Stash, 1, 0), CTX, &env)
            .unwrap_err();
        assert!(matches!(err, PlacementError::MultipleOccupants { count: 2, .. }));
        assert_eq!(items.index().occupied_cells(StoragePage::Stash), before);
        assert!(items.is_staged(sword));

        assert_eq!(
            items.place(sword, stored(StoragePage::Inventory, 9, 0), CTX, &env),
            Err(PlacementError::OutOfBounds(stored(StoragePage::Inventory, 9, 0)))
        );
    }

    #[test]
    fn dropped_runes_socket_into_the_occupant() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let sword = add_at(&mut items, &env, "lsd", stored(StoragePage::Inventory, 0, 0));
        assert_eq!(
            items.get_mut(sword).unwrap().set_socket_count(2),
            Ok(crate::error::Mutation::Changed)
        );
        let rune = add_at(&mut items, &env, "r03", stored(StoragePage::Inventory, 5, 0));
        assert_eq!(items.categories().count(Category::Gps), 1);

        let outcome = items
            .place(rune, stored(StoragePage::Inventory, 1, 2), CTX, &env)
            .unwrap();
        assert_eq!(outcome.socketed_into, Some((sword, 0)));
        assert!(items.get(rune).is_none());
        assert_eq!(items.categories().count(Category::Gps), 0);
        assert_eq!(items.get(sword).unwrap().socketed_count(), 1);
        assert_grid_matches(&items, StoragePage::Inventory);

        let second = add(&mut items, &env, "r01");
        items.socket_item(sword, second, CTX, &env).unwrap();
        assert_eq!(items.get(sword).unwrap().runeword_id(), Some(testing::STEEL));

        let children = items.unsocket_all(sword).unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|child| items.is_staged(*child)));
        assert!(!items.get(sword).unwrap().is_runeword());
    }

    #[test]
    fn rejected_sockets_leave_the_child_in_place() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let sword = add_at(&mut items, &env, "lsd", stored(StoragePage::Inventory, 0, 0));
        let rune = add_at(&mut items, &env, "r01", stored(StoragePage::Inventory, 5, 0));

        let err = items.socket_item(sword, rune, CTX, &env).unwrap_err();
        assert_eq!(err, PlacementError::Item(crate::item::ItemError::NotSocketed));
        assert!(items.is_canonical(rune));
        let grid = items.index().grid(StoragePage::Inventory).unwrap();
        assert_eq!(grid.occupants(&Footprint::new(5, 0, (1, 1))), BTreeSet::from([rune]));
        assert_eq!(
            items.socket_item(rune, rune, CTX, &env),
            Err(PlacementError::SelfSocket(rune))
        );

        // a rune dropped on an unsocketed item swaps instead
        let outcome = items
            .place(rune, stored(StoragePage::Inventory, 0, 0), CTX, &env)
            .unwrap();
        assert_eq!(outcome.evicted, vec![sword]);
    }

    #[test]
    fn cube_contents_follow_the_cube() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let gem = add(&mut items, &env, "gcv");
        assert_eq!(
            items.place(gem, stored(StoragePage::Cube, 0, 0), CTX, &env),
            Err(PlacementError::NoCube)
        );

        let cube = add_at(&mut items, &env, "box", stored(StoragePage::Inventory, 0, 0));
        assert_eq!(
            items.place(cube, stored(StoragePage::Cube, 0, 0), CTX, &env),
            Err(PlacementError::CubeInCube)
        );
        items.place(gem, stored(StoragePage::Cube, 2, 3), CTX, &env).unwrap();
        assert_grid_matches(&items, StoragePage::Cube);

        let outcome = items.place(cube, Location::Buffer, CTX, &env).unwrap();
        assert_eq!(outcome.evicted, vec![gem]);
        assert!(items.index().occupied_cells(StoragePage::Cube).is_empty());

        let outcome = items
            .place(cube, stored(StoragePage::Stash, 4, 6), CTX, &env)
            .unwrap();
        assert_eq!(outcome.rehomed, vec![gem]);
        assert_eq!(items.get(gem).unwrap().location(), stored(StoragePage::Cube, 2, 3));
    }

    #[test]
    fn equip_slots_check_body_and_game_mode() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = ItemsCollection::new(ItemVersion::V110, BlockOptions::default().classic());
        let cap = add(&mut items, &env, "cap");
        let axe = add(&mut items, &env, "hax");

        assert_eq!(
            items.place(cap, Location::Equipped(EquippedSlot::RightHand), CTX, &env),
            Err(PlacementError::WrongSlot {
                code: code("cap"),
                slot: EquippedSlot::RightHand
            })
        );
        assert_eq!(
            items.place(axe, Location::Equipped(EquippedSlot::AltRightHand), CTX, &env),
            Err(PlacementError::ExpansionSlot(EquippedSlot::AltRightHand))
        );
        items.place(cap, Location::Equipped(EquippedSlot::Head), CTX, &env).unwrap();
        assert_eq!(items.categories().handles(Category::Armor).collect::<Vec<_>>(), vec![cap]);
    }

    #[test]
    fn removing_items_repairs_every_index() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = collection();
        let sash = add_at(&mut items, &env, "lbl", Location::Equipped(EquippedSlot::Belt));
        let potions: Vec<_> = (4..6)
            .map(|slot| add_at(&mut items, &env, "hp1", Location::Belt(slot)))
            .collect();
        let arrows = add_at(&mut items, &env, "aqv", stored(StoragePage::Inventory, 0, 0));
        assert_eq!(items.categories().count(Category::Stackable), 1);

        let removed = items.remove_item(arrows).unwrap();
        assert_eq!(removed.type_code(), code("aqv"));
        assert_eq!(items.categories().count(Category::Stackable), 0);
        assert!(items.index().occupied_cells(StoragePage::Inventory).is_empty());

        items.remove_item(sash).unwrap();
        assert_eq!(items.index().belt_capacity(), 4);
        assert!(potions.iter().all(|potion| items.is_staged(*potion)));
        assert_eq!(items.remove_item(sash).unwrap_err(), PlacementError::UnknownHandle(sash));
    }
}
