//! Integration tests for node metadata and timestamps

mod common;

use brickmap::config::Config;
use brickmap::crypto::KeyIdentity;
use brickmap::map::{BrickMap, BrickMapError, MapSource, Metadata, NodeKind, CREATED_AT};
use serde_json::json;

use common::{brick, NOW};

#[test]
fn test_new_nodes_are_stamped() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("docs/a.txt", brick("h1")).unwrap();
    let stat = map.stat("docs/a.txt").unwrap();
    assert_eq!(stat.kind, NodeKind::File);
    assert!(!stat.deleted);
    assert_eq!(stat.created_at.unwrap().timestamp_millis(), NOW);
    assert_eq!(stat.updated_at.unwrap().timestamp_millis(), NOW);
}

#[tokio::test]
async fn test_updated_at_moves_with_clock() {
    let key = KeyIdentity::from_bytes(vec![1u8; 8]);
    let mut map = BrickMap::with_config(key.clone(), Config::fixed_clock(100));
    map.add("f", brick("h1")).unwrap();

    // load the same header into a map with a later clock and keep writing
    let mut later = BrickMap::with_config(key, Config::fixed_clock(200));
    later.load(MapSource::Header(map.get_state())).await.unwrap();
    later.append_bricks_to_file("f", [brick("h2")]).unwrap();

    let stat = later.stat("f").unwrap();
    assert_eq!(stat.created_at.unwrap().timestamp_millis(), 100);
    assert_eq!(stat.updated_at.unwrap().timestamp_millis(), 200);
}

#[test]
fn test_update_and_set_metadata() {
    let (mut map, _, _) = common::setup_test_env();

    map.create_file("f").unwrap();
    map.update_metadata("f", "author", "alice").unwrap();
    map.update_metadata("f", "tags", json!(["a", "b"])).unwrap();

    let metadata = map.get_metadata("f").unwrap();
    assert_eq!(metadata.get("author"), Some(&json!("alice")));
    assert_eq!(metadata.get("tags"), Some(&json!(["a", "b"])));
    assert!(metadata.contains_key(CREATED_AT));

    let mut replacement = Metadata::new();
    replacement.insert("only", 1);
    map.set_metadata("f", replacement.clone()).unwrap();
    assert_eq!(map.get_metadata("f").unwrap(), &replacement);
    assert!(map.stat("f").unwrap().created_at.is_none());
}

#[test]
fn test_metadata_errors() {
    let (mut map, _, _) = common::setup_test_env();

    assert!(matches!(
        map.get_metadata("missing"),
        Err(BrickMapError::NotFound(_))
    ));
    assert!(matches!(
        map.update_metadata("missing", "k", 1),
        Err(BrickMapError::NotFound(_))
    ));
    assert!(matches!(
        map.set_metadata("", Metadata::new()),
        Err(BrickMapError::EmptyPath)
    ));
    assert!(matches!(
        map.stat("missing"),
        Err(BrickMapError::NotFound(_))
    ));
}

#[test]
fn test_create_folder_and_file_conflicts() {
    let (mut map, _, _) = common::setup_test_env();

    map.create_folder("dir").unwrap();
    map.create_folder("dir").unwrap();
    map.add("file", brick("h1")).unwrap();

    assert!(matches!(
        map.create_folder("file"),
        Err(BrickMapError::NameConflict(_))
    ));
    assert!(matches!(
        map.create_file("dir"),
        Err(BrickMapError::NameConflict(_))
    ));
    assert!(matches!(
        map.create_folder("file/sub"),
        Err(BrickMapError::NameConflict(_))
    ));

    // an existing file keeps its content
    map.create_file("file").unwrap();
    assert_eq!(map.get_bricks_meta("file").unwrap().len(), 1);
}

#[tokio::test]
async fn test_loaded_node_without_metadata() {
    let (mut map, _, _) = common::setup_test_env();
    let text = r#"{
        "version": 1,
        "keyEncoding": "base64",
        "header": {
            "type": "directory",
            "items": { "f": { "type": "file", "hashLinks": [] } }
        }
    }"#;
    map.load(MapSource::Text(text.to_string())).await.unwrap();

    assert!(map.file_exists("f"));
    assert!(matches!(
        map.get_metadata("f"),
        Err(BrickMapError::NoMetadata(path)) if path == "f"
    ));

    // a write gives the node a metadata map again
    map.update_metadata("f", "k", 1).unwrap();
    assert_eq!(map.get_metadata("f").unwrap().len(), 1);
}
