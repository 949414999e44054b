use std::fs;

use item_content::{AffixLoader, CatalogueFile, ConfigLoader, ContentFactory, TypeLoader};
use tempfile::TempDir;

const TYPES: &str = r#"(
    types: [
        (code: "lsd", name: "Long Sword", flags: "WEAPON", width: 2, height: 3),
        (code: "r01", name: "El Rune", flags: "RUNE | SOCKETABLE | SIMPLE", width: 1, height: 1),
        (code: "gcv", name: "Chipped Amethyst", flags: "GEM | SOCKETABLE | SIMPLE", width: 1, height: 1),
    ],
)"#;

fn data_dir(types: &str, affixes: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::write(dir.path().join("types.ron"), types).expect("types.ron should be written");
    fs::write(dir.path().join("affixes.ron"), affixes).expect("affixes.ron should be written");
    dir
}

#[test]
fn test_missing_files_name_the_path() {
    let dir = TempDir::new().expect("temp dir should be created");
    let factory = ContentFactory::new(dir.path());

    let err = factory.load_config().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Failed to read engine config"));
    assert!(message.contains(CatalogueFile::Config.file_name()));
    let io = err.downcast_ref::<std::io::Error>().expect("I/O cause should be kept");
    assert_eq!(io.kind(), std::io::ErrorKind::NotFound);

    let message = factory.load_catalogue().unwrap_err().to_string();
    assert!(message.starts_with("Failed to read item type catalog"));
    assert!(message.contains("types.ron"));
}

#[test]
fn test_malformed_files_report_the_format() {
    let dir = TempDir::new().expect("temp dir should be created");
    let types = dir.path().join("types.ron");
    let affixes = dir.path().join("affixes.ron");
    let config = dir.path().join("config.toml");
    fs::write(&types, "(types: [(code: 12)])").expect("write");
    fs::write(&affixes, "stats: oops").expect("write");
    fs::write(&config, "inventory = 3").expect("write");

    let err = TypeLoader::load(&types).unwrap_err().to_string();
    assert!(err.contains("item type catalog RON"));
    let err = AffixLoader::load(&affixes).unwrap_err().to_string();
    assert!(err.contains("affix catalog RON"));
    let err = ConfigLoader::load(&config).unwrap_err().to_string();
    assert!(err.contains("config TOML"));
}

#[test]
fn test_invalid_type_codes_are_rejected() {
    let err = TypeLoader::parse(r#"(types: [(code: "long-sword", name: "Long Sword")])"#)
        .unwrap_err()
        .to_string();
    assert!(err.contains("invalid item code"));
}

#[test]
fn test_runewords_must_spell_runes() {
    let dir = data_dir(
        TYPES,
        r#"(
            stats: [(id: 19, name: "tohit", save_bits: 10)],
            runewords: [(id: 1, name: "Glitter", runes: ["r01", "gcv"], applies_to: "WEAPON")],
        )"#,
    );

    let err = ContentFactory::new(dir.path())
        .load_catalogue()
        .unwrap_err()
        .to_string();
    assert!(err.contains("Glitter"));
    assert!(err.contains("gcv"));
}

#[test]
fn test_set_items_need_a_known_base() {
    let dir = data_dir(
        TYPES,
        r#"(
            stats: [(id: 31, name: "armorclass", save_bits: 11, save_add: 10)],
            set_items: [(id: 1, name: "Sigon's Visor", code: "ghm", mods: [(stat: 31, min: 25, max: 25)])],
        )"#,
    );

    let err = ContentFactory::new(dir.path())
        .load_catalogue()
        .unwrap_err()
        .to_string();
    assert!(err.contains("unknown type 'ghm'"));
}

#[test]
fn test_socket_bonuses_need_known_stats() {
    let types = r#"(types: [(
        code: "gcv", name: "Chipped Amethyst", flags: "GEM | SOCKETABLE | SIMPLE", width: 1, height: 1,
        socket_mods: (weapon: [(stat: 19, min: 40, max: 40)]),
    )])"#;
    let dir = data_dir(types, "()");

    let err = ContentFactory::new(dir.path())
        .load_catalogue()
        .unwrap_err()
        .to_string();
    assert!(err.contains("unknown stat 19"));
}
