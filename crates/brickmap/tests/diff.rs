//! Integration tests for recording and replaying operation logs

mod common;

use brickmap::brick::{ContentUnit, HashLink};
use brickmap::config::ClockConfig;
use brickmap::map::{BrickMapDiff, BrickMapError, DiffOperation, Metadata};

use common::brick;

#[tokio::test]
async fn test_replay_matches_direct_mutation() {
    let (mut direct, _, _) = common::setup_test_env();
    let (mut replayed, _, key) = common::setup_test_env();
    let mut diff = BrickMapDiff::with_clock(ClockConfig::Fixed { millis: 5 });

    direct.add("docs/a.txt", brick("h1")).unwrap();
    diff.add("docs/a.txt", brick("h1"));
    direct.append_bricks_to_file("docs/a.txt", [brick("h2")]).unwrap();
    diff.append_bricks("docs/a.txt", [brick("h2")]);
    direct.copy("docs", "backup").unwrap();
    diff.copy("docs", "backup");
    direct.rename("backup", "archive").unwrap();
    diff.rename("backup", "archive");
    direct.create_folder("empty").unwrap();
    diff.create_folder("empty");
    direct.create_file("empty/touch").unwrap();
    diff.create_file("empty/touch");
    direct.update_metadata("docs/a.txt", "mime", "text/plain").unwrap();
    diff.update_metadata("docs/a.txt", "mime", "text/plain");
    direct.add_file_entry("solo", [brick("h3")]).unwrap();
    diff.add_file_entry("solo", [brick("h3")]);
    direct.truncate("solo").unwrap();
    diff.truncate("solo");
    direct.delete("docs/a.txt").unwrap();
    diff.delete("docs/a.txt");

    assert_eq!(diff.len(), 10);
    assert!(diff.entries().iter().all(|entry| entry.timestamp == 5));

    // ship the log through its serialized form
    let unit = diff.to_brick(key).unwrap();
    let shipped = BrickMapDiff::from_bytes(&unit.raw().await.unwrap()).unwrap();

    replayed.apply_diff(&shipped).unwrap();
    assert_eq!(replayed.get_state(), direct.get_state());
    assert_eq!(
        replayed.get_hash_list("archive/a.txt").unwrap(),
        vec![HashLink::from("h1"), HashLink::from("h2")]
    );
}

#[test]
fn test_replay_stops_at_first_error() {
    let (mut map, _, _) = common::setup_test_env();
    let mut diff = BrickMapDiff::new();
    diff.add("first", brick("h1"));
    diff.copy("missing", "dst");
    diff.add("never", brick("h2"));

    let result = map.apply_diff(&diff);
    assert!(matches!(result, Err(BrickMapError::NotFound(_))));
    assert!(map.file_exists("first"));
    assert!(!map.file_exists("never"));
}

#[test]
fn test_set_metadata_operation() {
    let (mut map, _, _) = common::setup_test_env();
    map.create_file("f").unwrap();

    let mut metadata = Metadata::new();
    metadata.insert("owner", "bob");
    let mut diff = BrickMapDiff::new();
    diff.set_metadata("f", metadata.clone());

    assert!(matches!(
        diff.entries()[0].operation,
        DiffOperation::SetMetadata { .. }
    ));
    map.apply_diff(&diff).unwrap();
    assert_eq!(map.get_metadata("f").unwrap(), &metadata);
}
