//! Catalogue fixtures shared by the unit tests.
use crate::env::{
    AffixDefinition, AffixSnapshot, BodySlots, CatalogueSnapshot, ItemCode, ItemType,
    ItemTypeFlags, ModRange, RareName, RunewordDefinition, SetItemDefinition, SocketMods,
    StatDefinition, TypeSnapshot, UniqueDefinition,
};

/// Stat whose chain is longer than a property line can hold.
pub const STAT_OVERLONG: u16 = 400;

pub const MALICE: u16 = 100;
pub const STEEL: u16 = 140;

pub fn code(raw: &str) -> ItemCode {
    ItemCode::new(raw).unwrap()
}

pub fn catalogue() -> CatalogueSnapshot {
    CatalogueSnapshot::new(types(), affixes())
}

fn gem_mods(weapon: ModRange, armor: ModRange, shield: ModRange) -> SocketMods {
    SocketMods {
        weapon: vec![weapon],
        armor: vec![armor],
        shield: vec![shield],
    }
}

fn types() -> TypeSnapshot {
    use ItemTypeFlags as F;

    let weapon = |raw: &str, name: &str, flags: ItemTypeFlags| {
        ItemType::new(code(raw), name, F::WEAPON | flags).with_body_slots(BodySlots::HAND)
    };
    let filler = F::SOCKETABLE | F::SIMPLE;
    let rune = F::RUNE | F::EXPANSION | filler;
    let potion = F::POTION | F::BELTABLE | F::SIMPLE;

    TypeSnapshot::new([
        weapon("hax", "Hand Axe", F::empty())
            .with_size(1, 3)
            .with_level(3, 0)
            .with_damage(3, 6)
            .with_durability(28)
            .with_max_sockets([2, 2, 2]),
        weapon("lsd", "Long Sword", F::empty())
            .with_size(2, 3)
            .with_level(20, 0)
            .with_requirements(55, 39)
            .with_damage(3, 19)
            .with_durability(44)
            .with_max_sockets([3, 4, 4]),
        weapon("2hs", "Two-Handed Sword", F::TWO_HANDED)
            .with_size(2, 4)
            .with_level(10, 0)
            .with_requirements(35, 27)
            .with_damage(2, 9)
            .with_two_hand_damage(8, 17)
            .with_durability(44)
            .with_max_sockets([3, 4, 4]),
        weapon("mac", "Mace", F::BLUNT)
            .with_size(2, 3)
            .with_level(8, 0)
            .with_requirements(27, 0)
            .with_damage(3, 10)
            .with_durability(60)
            .with_max_sockets([2, 2, 2]),
        ItemType::new(code("buc"), "Buckler", F::ARMOR | F::SHIELD)
            .with_size(2, 2)
            .with_body_slots(BodySlots::HAND)
            .with_level(1, 0)
            .with_requirements(12, 0)
            .with_defense(4, 6)
            .with_durability(12)
            .with_max_sockets([1, 1, 1]),
        ItemType::new(code("lea"), "Leather Armor", F::ARMOR)
            .with_size(2, 3)
            .with_body_slots(BodySlots::TORSO)
            .with_level(3, 0)
            .with_requirements(15, 0)
            .with_defense(14, 17)
            .with_durability(24)
            .with_max_sockets([2, 2, 2]),
        ItemType::new(code("cap"), "Cap", F::ARMOR)
            .with_size(2, 2)
            .with_body_slots(BodySlots::HEAD)
            .with_level(1, 0)
            .with_defense(3, 5)
            .with_durability(12)
            .with_max_sockets([2, 2, 2]),
        ItemType::new(code("lbl"), "Sash", F::ARMOR | F::BELT)
            .with_size(2, 1)
            .with_body_slots(BodySlots::BELT)
            .with_level(3, 0)
            .with_defense(2, 2)
            .with_durability(12)
            .with_belt_rows(2),
        ItemType::new(code("tbl"), "Twine Belt", F::ARMOR | F::BELT)
            .with_size(2, 1)
            .with_body_slots(BodySlots::BELT)
            .with_level(1, 0)
            .with_defense(1, 1)
            .with_durability(8)
            .with_belt_rows(1),
        ItemType::new(code("rin"), "Ring", F::RING).with_body_slots(BodySlots::RING),
        ItemType::new(code("amu"), "Amulet", F::AMULET).with_body_slots(BodySlots::NECK),
        ItemType::new(code("aqv"), "Arrows", F::STACKABLE)
            .with_size(1, 3)
            .with_max_stack(350),
        ItemType::new(code("box"), "Horadric Cube", F::CUBE | F::QUEST).with_size(2, 2),
        ItemType::new(code("jew"), "Jewel", F::JEWEL | F::SOCKETABLE | F::EXPANSION)
            .with_level(1, 0),
        ItemType::new(code("hp1"), "Minor Healing Potion", potion).with_upgrade(code("hp2")),
        ItemType::new(code("hp2"), "Light Healing Potion", potion).with_level(5, 0),
        ItemType::new(code("gcv"), "Chipped Amethyst", F::GEM | filler)
            .with_level(1, 1)
            .with_socket_mods(gem_mods(
                ModRange::fixed(19, 40),
                ModRange::fixed(0, 3),
                ModRange::fixed(31, 8),
            ))
            .with_upgrade(code("gfv")),
        ItemType::new(code("gfv"), "Flawed Amethyst", F::GEM | filler)
            .with_level(5, 5)
            .with_socket_mods(gem_mods(
                ModRange::fixed(19, 60),
                ModRange::fixed(0, 4),
                ModRange::fixed(31, 12),
            )),
        ItemType::new(code("r01"), "El Rune", rune)
            .with_level(11, 11)
            .with_socket_mods(gem_mods(
                ModRange::fixed(19, 50),
                ModRange::fixed(31, 15),
                ModRange::fixed(31, 15),
            )),
        ItemType::new(code("r03"), "Tir Rune", rune)
            .with_level(13, 13)
            .with_socket_mods(gem_mods(
                ModRange::fixed(138, 2),
                ModRange::fixed(138, 2),
                ModRange::fixed(138, 2),
            )),
        ItemType::new(code("r05"), "Eth Rune", rune)
            .with_level(15, 15)
            .with_socket_mods(gem_mods(
                ModRange::fixed(27, 15),
                ModRange::fixed(27, 15),
                ModRange::fixed(27, 15),
            )),
        ItemType::new(code("r06"), "Ith Rune", rune)
            .with_level(15, 15)
            .with_socket_mods(gem_mods(
                ModRange::fixed(22, 9),
                ModRange::fixed(114, 15),
                ModRange::fixed(114, 15),
            )),
    ])
}

fn stats() -> Vec<StatDefinition> {
    vec![
        StatDefinition::new(0, "strength", 8).with_save_add(32).with_priority(67),
        StatDefinition::new(2, "dexterity", 7).with_save_add(32).with_priority(65),
        StatDefinition::new(7, "maxhp", 9).with_save_add(32).with_priority(59),
        StatDefinition::new(16, "item_armor_percent", 9).with_priority(74),
        StatDefinition::new(17, "item_maxdamage_percent", 9)
            .with_chain(1)
            .with_priority(129),
        StatDefinition::new(19, "tohit", 10).with_priority(115),
        StatDefinition::new(21, "mindamage", 6).with_priority(127),
        StatDefinition::new(22, "maxdamage", 7).with_priority(126),
        StatDefinition::new(27, "manarecoverybonus", 8).with_priority(55),
        StatDefinition::new(31, "armorclass", 11).with_save_add(10).with_priority(71),
        StatDefinition::new(73, "maxdurability", 8).with_priority(3),
        StatDefinition::new(75, "item_maxdurability_percent", 7)
            .with_save_add(20)
            .with_priority(3),
        StatDefinition::new(91, "item_req_percent", 8).with_save_add(100).with_priority(0),
        StatDefinition::new(93, "item_fasterattackrate", 7)
            .with_save_add(20)
            .with_priority(145),
        StatDefinition::new(97, "item_nonclassskill", 6)
            .with_param(9)
            .with_priority(81),
        StatDefinition::new(114, "item_damagetomana", 6).with_priority(11),
        StatDefinition::new(122, "item_undeaddamage_percent", 10).with_priority(12),
        StatDefinition::new(138, "item_manaafterkill", 7).with_priority(8),
        StatDefinition::new(152, "item_indesctructible", 1)
            .bitflag()
            .with_priority(1),
        StatDefinition::new(194, "item_numsockets", 4),
        StatDefinition::new(214, "item_armor_perlevel", 6).with_priority(86),
        StatDefinition::new(218, "item_maxdamage_perlevel", 6).with_priority(125),
        StatDefinition::new(STAT_OVERLONG, "overlong", 8)
            .with_param(8)
            .with_chain(3),
    ]
}

fn affix(
    id: u16,
    name: &str,
    level: u8,
    required_level: u8,
    applies_to: ItemTypeFlags,
    mods: Vec<ModRange>,
) -> AffixDefinition {
    AffixDefinition {
        id,
        name: name.to_string(),
        level,
        required_level,
        applies_to,
        mods,
    }
}

fn rare(id: u16, name: &str) -> RareName {
    RareName {
        id,
        name: name.to_string(),
    }
}

fn affixes() -> AffixSnapshot {
    use ItemTypeFlags as F;

    let gear = F::WEAPON | F::ARMOR;
    let jewellery = F::RING | F::AMULET;

    AffixSnapshot::new()
        .with_stats(stats())
        .with_magic_prefixes([
            affix(1, "Jagged", 1, 1, F::WEAPON, vec![ModRange::new(17, 11, 20)]),
            affix(2, "Sturdy", 1, 1, F::ARMOR, vec![ModRange::new(16, 10, 20)]),
            affix(3, "Artisan's", 26, 20, gear, vec![ModRange::fixed(194, 1)]),
            affix(
                4,
                "Sharp",
                6,
                4,
                F::WEAPON,
                vec![ModRange::new(19, 10, 20), ModRange::new(17, 10, 20)],
            ),
        ])
        .with_magic_suffixes([
            affix(1, "of Strength", 1, 1, gear | jewellery, vec![ModRange::new(0, 1, 2)]),
            affix(2, "of the Whale", 40, 35, F::ARMOR | jewellery, vec![ModRange::new(7, 41, 60)]),
            affix(3, "of Craftsmanship", 1, 1, F::WEAPON, vec![ModRange::new(73, 1, 2)]),
        ])
        .with_rare_names(
            [rare(1, "Beast"), rare(2, "Doom")],
            [rare(1, "Bite"), rare(2, "Shroud")],
        )
        .with_set_items([SetItemDefinition {
            id: 1,
            name: String::from("Sigon's Visor"),
            set_name: String::from("Sigon's Complete Steel"),
            code: code("cap"),
            level: 6,
            required_level: 6,
            mods: vec![ModRange::fixed(31, 25)],
            bonus_mods: vec![vec![ModRange::fixed(0, 5)], vec![ModRange::fixed(7, 20)]],
        }])
        .with_unique_items([
            UniqueDefinition {
                id: 1,
                name: String::from("Biggin's Bonnet"),
                code: code("cap"),
                level: 3,
                required_level: 3,
                mods: vec![ModRange::fixed(31, 14), ModRange::fixed(7, 15)],
            },
            UniqueDefinition {
                id: 2,
                name: String::from("The Gnasher"),
                code: code("hax"),
                level: 7,
                required_level: 5,
                mods: vec![ModRange::new(17, 60, 70)],
            },
        ])
        .with_runewords([
            RunewordDefinition {
                id: MALICE,
                name: String::from("Malice"),
                runes: vec![code("r06"), code("r01"), code("r05")],
                applies_to: F::WEAPON,
                mods: vec![ModRange::fixed(17, 33), ModRange::fixed(22, 9)],
            },
            RunewordDefinition {
                id: STEEL,
                name: String::from("Steel"),
                runes: vec![code("r03"), code("r01")],
                applies_to: F::WEAPON,
                mods: vec![ModRange::fixed(17, 20), ModRange::fixed(93, 25)],
            },
        ])
}
