use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use worldscope::container::{AssetId, AssetKind};
use worldscope::session::SessionState;

fn write_pack(dir: &TempDir, file: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, contents).expect("write pack fixture");
    path
}

const FIRST_PACK: &str = r#"{
    "name": "first",
    "assets": [
        {"id": 1, "kind": "world", "data": {"name": "First World", "areas": [
            {"name": "Entry", "area": 2}
        ]}},
        {"id": 2, "kind": "area", "data": {"name": "Entry", "layers": []}}
    ]
}"#;

const SECOND_PACK: &str = r#"{
    "name": "second",
    "assets": [
        {"id": 9, "kind": "world", "data": {"name": "Second World", "areas": []}}
    ]
}"#;

#[test]
fn load_populates_index_and_serves_assets() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_pack(&dir, "first.json", FIRST_PACK);

    let mut session = SessionState::new();
    session.load(&path).expect("load succeeds");

    let loaded = session.active_mut().expect("container active");
    assert_eq!(loaded.label(), "first");
    assert_eq!(loaded.index().len(), 2);
    assert_eq!(loaded.cached_count(), 0, "nothing decodes before the first resolve");
    let world = loaded.resolve(AssetId(1), AssetKind::World).expect("world resolves");
    assert_eq!(world.name(), "First World");
    assert_eq!(loaded.cached_count(), 1);
}

#[test]
fn failed_load_leaves_previous_session_intact() {
    let dir = TempDir::new().expect("tempdir");
    let good = write_pack(&dir, "first.json", FIRST_PACK);
    let broken = write_pack(&dir, "broken.json", "{ not json");

    let mut session = SessionState::new();
    session.load(&good).expect("initial load succeeds");

    let err = session.load(&broken).unwrap_err();
    assert!(format!("{err:?}").contains("broken.json"));

    let loaded = session.active_mut().expect("previous container still active");
    assert_eq!(loaded.label(), "first");
    assert!(loaded.resolve(AssetId(1), AssetKind::World).is_ok());
}

#[test]
fn load_failure_on_missing_file_reports_the_path() {
    let mut session = SessionState::new();
    let err = session.load("no/such/pack.json").unwrap_err();
    assert!(format!("{err:?}").contains("no/such/pack.json"));
    assert!(!session.has_container());
}

#[test]
fn reload_swaps_containers_while_old_nodes_stay_usable() {
    let dir = TempDir::new().expect("tempdir");
    let first = write_pack(&dir, "first.json", FIRST_PACK);
    let second = write_pack(&dir, "second.json", SECOND_PACK);

    let mut session = SessionState::new();
    session.load(&first).expect("first load");
    let old_world = session
        .active_mut()
        .expect("container active")
        .resolve(AssetId(1), AssetKind::World)
        .expect("world resolves");

    session.load(&second).expect("second load");
    let loaded = session.active_mut().expect("new container active");
    assert_eq!(loaded.label(), "second");
    assert_eq!(loaded.index().len(), 1);
    assert!(loaded.resolve(AssetId(1), AssetKind::World).is_err(), "old ids are gone");

    // A panel holding the old node would still render it.
    assert_eq!(old_world.name(), "First World");
}

#[test]
fn duplicate_asset_ids_fail_the_load() {
    let dir = TempDir::new().expect("tempdir");
    let doubled = write_pack(
        &dir,
        "doubled.json",
        r#"{"assets": [
            {"id": 4, "kind": "world", "data": {"name": "w", "areas": []}},
            {"id": 4, "kind": "area", "data": {"name": "a", "layers": []}}
        ]}"#,
    );

    let mut session = SessionState::new();
    let err = session.load(&doubled).unwrap_err();
    assert!(format!("{err:?}").contains("more than once"));
    assert!(!session.has_container());
}
