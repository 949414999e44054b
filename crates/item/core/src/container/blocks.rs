//! Item blocks of a character or shared-stash file.
//!
//! ```text
//! "JM" u16 count item*           top-level items
//! "JM" u16 count item*           corpse items
//! "jf" ["JM" u16 count item*]    hireling items (expansion; list only with a hireling)
//! "kf" u8 present [item]         summoned creature item (expansion)
//! ```
//!
//! Counts cover top-level items only; socketed children follow their
//! parent. Counts and boundaries are derived again on every write because
//! item lengths change under edits.
use super::{ItemsCollection, Location, SideList};
use crate::codec::CodecError;
use crate::config::EngineConfig;
use crate::env::ItemEnv;
use crate::item::Item;
use crate::version::ItemVersion;

pub const ITEM_LIST_MARKER: [u8; 2] = *b"JM";
pub const HIRELING_MARKER: [u8; 2] = *b"jf";
pub const GOLEM_MARKER: [u8; 2] = *b"kf";

/// Which blocks a file carries and how its containers are sized.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockOptions {
    /// Expansion game; enables the alternate weapon set and the hireling and
    /// summoned creature blocks.
    pub expansion: bool,
    /// The character has a hireling whose items follow the `jf` marker.
    pub hireling: bool,
    /// Character files follow the item block with the corpse, hireling and
    /// summoned creature blocks; stash pages do not.
    pub side_blocks: bool,
    pub config: EngineConfig,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            expansion: true,
            hireling: false,
            side_blocks: true,
            config: EngineConfig::default(),
        }
    }
}

impl BlockOptions {
    /// A shared-stash page: one item list and nothing else.
    pub fn stash_page() -> Self {
        Self {
            side_blocks: false,
            ..Self::default()
        }
    }

    pub fn classic(mut self) -> Self {
        self.expansion = false;
        self
    }

    pub fn with_hireling(mut self) -> Self {
        self.hireling = true;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

impl ItemsCollection {
    /// Reads the item blocks starting at byte `cursor` and advances it past
    /// the last block.
    pub fn read(
        source: &[u8],
        cursor: &mut usize,
        version: ItemVersion,
        options: BlockOptions,
        env: &ItemEnv<'_>,
    ) -> Result<Self, CodecError> {
        let start = *cursor;
        let mut items = Self::new(version, options);
        for item in read_list(source, cursor, version, env)? {
            let location = item.location();
            let handle = items.allocate(item);
            if !items.insert_canonical(handle) {
                return Err(occupancy(location));
            }
        }
        let capacity = items.belt_capacity_for_worn();
        items.index.set_belt_capacity(capacity);
        if let Some((slot, _)) = items.index.belt_items().into_iter().find(|(slot, _)| *slot >= capacity) {
            return Err(occupancy(Location::Belt(slot as u8)));
        }

        if items.options.side_blocks {
            let corpse = read_list(source, cursor, version, env)?;
            items.corpse = SideList {
                present: !corpse.is_empty(),
                items: corpse,
            };
            if items.is_expansion() {
                expect_marker(source, cursor, HIRELING_MARKER)?;
                if items.options.hireling {
                    items.hireling = SideList::new(read_list(source, cursor, version, env)?);
                }
                expect_marker(source, cursor, GOLEM_MARKER)?;
                if read_u8(source, cursor)? != 0 {
                    items.golem = Some(Item::decode(source, cursor, version, env)?);
                }
            }
        }

        tracing::debug!(
            %version,
            items = items.len(),
            corpse = items.corpse.items.len(),
            hireling = items.hireling.items.len(),
            golem = items.golem.is_some(),
            bytes = *cursor - start,
            "read item blocks"
        );
        Ok(items)
    }

    /// Appends every block to `out`. Staged items are not written.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let top: Vec<&Item> = self.items().map(|(_, item)| item).collect();
        write_list(out, &top)?;
        if !self.options.side_blocks {
            return Ok(());
        }
        let corpse: Vec<&Item> = self.corpse.items.iter().collect();
        write_list(out, &corpse)?;
        if self.is_expansion() {
            out.extend_from_slice(&HIRELING_MARKER);
            if self.hireling.present {
                let hireling: Vec<&Item> = self.hireling.items.iter().collect();
                write_list(out, &hireling)?;
            }
            out.extend_from_slice(&GOLEM_MARKER);
            match &self.golem {
                Some(item) => {
                    out.push(1);
                    out.extend(item.export_bytes());
                }
                None => out.push(0),
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }
}

fn occupancy(location: Location) -> CodecError {
    CodecError::Occupancy {
        location: location.to_string(),
    }
}

fn read_list(
    source: &[u8],
    cursor: &mut usize,
    version: ItemVersion,
    env: &ItemEnv<'_>,
) -> Result<Vec<Item>, CodecError> {
    expect_marker(source, cursor, ITEM_LIST_MARKER)?;
    let count = read_u16(source, cursor)?;
    (0..count)
        .map(|_| Item::decode(source, cursor, version, env))
        .collect()
}

fn write_list(out: &mut Vec<u8>, items: &[&Item]) -> Result<(), CodecError> {
    let count = u16::try_from(items.len()).map_err(|_| CodecError::TooManyItems(items.len()))?;
    out.extend_from_slice(&ITEM_LIST_MARKER);
    out.extend_from_slice(&count.to_le_bytes());
    for item in items {
        out.extend(item.export_bytes());
    }
    Ok(())
}

fn take<const N: usize>(source: &[u8], cursor: &mut usize) -> Result<[u8; N], CodecError> {
    let bytes = source
        .get(*cursor..*cursor + N)
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(CodecError::Truncated {
            offset: *cursor * 8,
            needed: N * 8,
            available: source.len().saturating_sub(*cursor) * 8,
        })?;
    *cursor += N;
    Ok(bytes)
}

fn expect_marker(source: &[u8], cursor: &mut usize, marker: [u8; 2]) -> Result<(), CodecError> {
    let offset = *cursor;
    let found = take::<2>(source, cursor)?;
    if found != marker {
        return Err(CodecError::BadMarker {
            offset,
            found: u16::from_le_bytes(found),
        });
    }
    Ok(())
}

fn read_u16(source: &[u8], cursor: &mut usize) -> Result<u16, CodecError> {
    take::<2>(source, cursor).map(u16::from_le_bytes)
}

fn read_u8(source: &[u8], cursor: &mut usize) -> Result<u8, CodecError> {
    take::<1>(source, cursor).map(|[byte]| byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Category, EquippedSlot, StoragePage};
    use crate::error::Mutation;
    use crate::item::{CharacterContext, CreateOptions};
    use crate::testing::{self, STEEL, code};

    const CTX: CharacterContext = CharacterContext::new(30);

    fn create(env: &ItemEnv<'_>, raw: &str, id: u32, location: Location) -> Item {
        let options = CreateOptions::default().with_id(id).at(location);
        Item::create(env, ItemVersion::V110, code(raw), options).unwrap()
    }

    fn stored(page: StoragePage, x: u8, y: u8) -> Location {
        Location::stored(page, x, y)
    }

    fn character(env: &ItemEnv<'_>) -> ItemsCollection {
        let mut items = ItemsCollection::new(ItemVersion::V110, BlockOptions::default().with_hireling());
        let mut place = |raw: &str, location: Location| {
            let id = items.len() as u32 + 1;
            let handle = items.add_item(create(env, raw, id, Location::Buffer)).unwrap();
            items.place(handle, location, CTX, env).unwrap();
            handle
        };
        place("lbl", Location::Equipped(EquippedSlot::Belt));
        for slot in 0..6 {
            place("hp1", Location::Belt(slot));
        }
        let sword = place("lsd", stored(StoragePage::Inventory, 0, 0));
        place("box", stored(StoragePage::Stash, 0, 0));
        place("gcv", stored(StoragePage::Cube, 1, 1));

        assert_eq!(items.get_mut(sword).unwrap().set_socket_count(2), Ok(Mutation::Changed));
        for raw in ["r03", "r01"] {
            let rune = items.add_item(create(env, raw, 0, Location::Buffer)).unwrap();
            items.socket_item(sword, rune, CTX, env).unwrap();
        }

        items.corpse_mut().items.push(create(env, "cap", 40, Location::Equipped(EquippedSlot::Head)));
        items.hireling_mut().items.push(create(env, "lea", 41, Location::Equipped(EquippedSlot::Torso)));
        assert!(items.set_golem(Some(create(env, "hax", 42, Location::Buffer))).is_none());
        items
    }

    #[test]
    fn character_blocks_survive_a_round_trip() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let items = character(&env);
        let bytes = items.to_bytes().unwrap();

        let mut cursor = 0;
        let read = ItemsCollection::read(
            &bytes,
            &mut cursor,
            ItemVersion::V110,
            BlockOptions::default().with_hireling(),
            &env,
        )
        .unwrap();
        assert_eq!(cursor, bytes.len());
        assert_eq!(read.len(), items.len());
        assert_eq!(read.index().belt_capacity(), 8);
        assert_eq!(read.index().belt_items().len(), 6);
        for page in [StoragePage::Inventory, StoragePage::Stash, StoragePage::Cube] {
            assert_eq!(read.index().occupied_cells(page), items.index().occupied_cells(page));
        }
        assert_eq!(read.categories().count(Category::Gps), 7);
        assert_eq!(read.categories().count(Category::Weapon), 1);

        let (_, sword) = read.items().find(|(_, item)| item.is_weapon()).unwrap();
        assert_eq!(sword.runeword_id(), Some(STEEL));
        assert_eq!(sword.socketed_count(), 2);
        assert!(read.corpse().present);
        assert_eq!(read.hireling().items[0].type_code(), code("lea"));
        assert_eq!(read.golem().map(Item::type_code), Some(code("hax")));
        assert_eq!(read.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn writes_follow_edited_lengths() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut items = character(&env);
        let (sword, _) = items.items().find(|(_, item)| item.is_weapon()).unwrap();
        assert_eq!(items.get_mut(sword).unwrap().personalize("Wirt"), Ok(Mutation::Changed));
        let staged = items.add_item(create(&env, "cap", 50, Location::Buffer)).unwrap();

        let bytes = items.to_bytes().unwrap();
        let mut cursor = 0;
        let read = ItemsCollection::read(
            &bytes,
            &mut cursor,
            ItemVersion::V110,
            BlockOptions::default().with_hireling(),
            &env,
        )
        .unwrap();
        let (_, sword) = read.items().find(|(_, item)| item.is_weapon()).unwrap();
        assert_eq!(sword.personalized_name().as_deref(), Some("Wirt"));
        assert!(items.is_staged(staged));
        assert_eq!(read.len(), items.len());
    }

    #[test]
    fn stash_pages_and_classic_files_skip_side_blocks() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let mut page = ItemsCollection::new(ItemVersion::V110, BlockOptions::stash_page());
        let cap = page.add_item(create(&env, "cap", 1, Location::Buffer)).unwrap();
        page.place(cap, stored(StoragePage::Stash, 4, 6), CTX, &env).unwrap();
        let mut bytes = page.to_bytes().unwrap();
        let length = bytes.len();
        bytes.extend_from_slice(b"next");

        let mut cursor = 0;
        let read =
            ItemsCollection::read(&bytes, &mut cursor, ItemVersion::V110, BlockOptions::stash_page(), &env)
                .unwrap();
        assert_eq!(cursor, length);
        assert_eq!(read.len(), 1);

        let classic = ItemsCollection::new(ItemVersion::V110, BlockOptions::default().classic());
        assert_eq!(classic.to_bytes().unwrap(), b"JM\0\0JM\0\0".to_vec());
        let expansion = ItemsCollection::new(ItemVersion::V110, BlockOptions::default());
        assert_eq!(expansion.to_bytes().unwrap(), b"JM\0\0JM\0\0jfkf\0".to_vec());
    }

    #[test]
    fn malformed_blocks_are_corrupt() {
        let catalogue = testing::catalogue();
        let env = catalogue.env();
        let options = BlockOptions::stash_page();
        let read = |bytes: &[u8]| {
            ItemsCollection::read(bytes, &mut 0, ItemVersion::V110, options.clone(), &env).map(|_| ())
        };

        assert_eq!(
            read(b"JX\x01\x00"),
            Err(CodecError::BadMarker {
                offset: 0,
                found: 0x584A
            })
        );
        assert_eq!(
            read(b"JM\x01"),
            Err(CodecError::Truncated {
                offset: 16,
                needed: 16,
                available: 8
            })
        );

        let cap = create(&env, "cap", 1, stored(StoragePage::Inventory, 0, 0));
        let mut bytes = b"JM\x02\x00".to_vec();
        bytes.extend(cap.export_bytes());
        bytes.extend(cap.export_bytes());
        assert!(matches!(read(&bytes), Err(CodecError::Occupancy { .. })));

        // six belt slots need a belt
        let potion = create(&env, "hp1", 2, Location::Belt(5));
        let mut bytes = b"JM\x01\x00".to_vec();
        bytes.extend(potion.export_bytes());
        assert_eq!(
            read(&bytes),
            Err(CodecError::Occupancy {
                location: String::from("belt 5")
            })
        );
    }
}
