//! Integration tests for copy and rename

mod common;

use brickmap::brick::HashLink;
use brickmap::map::{BrickMapError, NodeKind};

use common::brick;

#[test]
fn test_copy_directory_is_independent() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("dirA/f.txt", brick("h1")).unwrap();
    map.add("dirA/sub/g.txt", brick("h2")).unwrap();
    map.copy("dirA", "dirB").unwrap();

    assert_eq!(
        map.get_file_list("dirB", true).unwrap(),
        vec!["dirB/f.txt", "dirB/sub/g.txt"]
    );

    map.replace_last_brick("dirB/f.txt", brick("changed")).unwrap();
    map.append_bricks_to_file("dirB/sub/g.txt", [brick("more")]).unwrap();

    assert_eq!(
        map.get_hash_list("dirA/f.txt").unwrap(),
        vec![HashLink::from("h1")]
    );
    assert_eq!(
        map.get_hash_list("dirA/sub/g.txt").unwrap(),
        vec![HashLink::from("h2")]
    );
    assert_eq!(
        map.get_hash_list("dirB/f.txt").unwrap(),
        vec![HashLink::from("changed")]
    );
}

#[test]
fn test_copy_file_replaces_destination() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("src.txt", brick("h1")).unwrap();
    map.add_file_entry("dst.txt", [brick("old1"), brick("old2")]).unwrap();
    map.copy("src.txt", "dst.txt").unwrap();

    assert_eq!(
        map.get_hash_list("dst.txt").unwrap(),
        vec![HashLink::from("h1")]
    );
}

#[test]
fn test_copy_missing_or_deleted_source() {
    let (mut map, _, _) = common::setup_test_env();

    assert!(matches!(
        map.copy("missing", "dst"),
        Err(BrickMapError::NotFound(_))
    ));

    map.add("gone", brick("h1")).unwrap();
    map.delete("gone").unwrap();
    assert!(matches!(
        map.copy("gone", "dst"),
        Err(BrickMapError::NotFound(_))
    ));
    assert!(map.get_node("dst").is_none());
}

#[test]
fn test_copy_kind_mismatch() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("file", brick("h1")).unwrap();
    map.create_folder("dir").unwrap();

    assert!(matches!(
        map.copy("file", "dir"),
        Err(BrickMapError::IsDirectory(_))
    ));
    assert!(matches!(
        map.copy("dir", "file"),
        Err(BrickMapError::IsFile(_))
    ));
}

#[test]
fn test_rename_moves_and_tombstones() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("old/a.txt", brick("h1")).unwrap();
    map.rename("old", "new").unwrap();

    assert!(map.file_deleted("old"));
    assert_eq!(map.stat("new").unwrap().kind, NodeKind::Directory);
    assert_eq!(
        map.get_hash_list("new/a.txt").unwrap(),
        vec![HashLink::from("h1")]
    );
}

#[test]
fn test_rename_into_itself() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("dir/a.txt", brick("h1")).unwrap();
    assert!(matches!(
        map.rename("dir", "dir/inner"),
        Err(BrickMapError::MoveIntoSelf { .. })
    ));
    assert!(map.file_exists("dir/a.txt"));
}

#[test]
fn test_rename_onto_ancestor() {
    let (mut map, _, _) = common::setup_test_env();

    map.add("a/b/b/keep.txt", brick("h1")).unwrap();
    let before = map.get_state();

    assert!(matches!(
        map.rename("a/b", "a"),
        Err(BrickMapError::MoveOntoAncestor { .. })
    ));
    assert!(matches!(
        map.rename("a/b/b/keep.txt", "a"),
        Err(BrickMapError::MoveOntoAncestor { .. })
    ));
    assert_eq!(map.get_state(), before);
    assert_eq!(map.get_file_list("/", true).unwrap(), vec!["a/b/b/keep.txt"]);
}
