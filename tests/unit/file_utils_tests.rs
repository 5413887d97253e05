/*!
 * Tests for file utility functions
 */

use std::fs;

use ectrans::file_utils::{FileManager, TEXT_EXTENSION};
use crate::common;

/// Test recursive discovery of certificate text files
#[test]
fn test_findFiles_withNestedDirectories_shouldFindMatchingExtension() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("2013");
    fs::create_dir_all(&nested).unwrap();

    common::create_test_file(temp_dir.path(), "b.txt", "b").unwrap();
    common::create_test_file(temp_dir.path(), "a.TXT", "a").unwrap();
    common::create_test_file(&nested, "c.txt", "c").unwrap();
    common::create_test_file(temp_dir.path(), "scan.pdf", "%PDF").unwrap();

    let files = FileManager::find_files(temp_dir.path(), TEXT_EXTENSION).unwrap();

    let names: Vec<String> = files.iter().map(FileManager::display_name).collect();
    assert_eq!(names, vec!["c.txt", "a.TXT", "b.txt"]);
}

#[test]
fn test_findFiles_withDottedExtension_shouldMatchToo() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "ec.txt", "x").unwrap();

    assert_eq!(FileManager::find_files(temp_dir.path(), ".txt").unwrap().len(), 1);
}

#[test]
fn test_writeThenRead_shouldRoundTripBytes() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("out").join("ec.txt");

    FileManager::write_to_file(&path, "200/2013 முருகன்").unwrap();

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(temp_dir.path().join("out")));
    assert_eq!(FileManager::read_bytes(&path).unwrap(), "200/2013 முருகன்".as_bytes());
}

#[test]
fn test_readBytes_withMissingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    assert!(FileManager::read_bytes(temp_dir.path().join("missing.txt")).is_err());
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
}
