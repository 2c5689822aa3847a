//! Tests for the tail reader

use super::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn append(path: &Path, bytes: &[u8]) {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(bytes).unwrap();
}

// ============================================================================
// Steady append
// ============================================================================

#[test]
fn test_reads_appended_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "").unwrap();

    let mut reader = TailReader::new(&path);
    assert_eq!(reader.read_next().unwrap(), "");

    append(&path, b"hello\n");
    assert_eq!(reader.read_next().unwrap(), "hello\n");
}

#[test]
fn test_idempotent_poll_without_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "some content").unwrap();

    let mut reader = TailReader::new(&path);
    assert_eq!(reader.read_next().unwrap(), "some content");
    assert_eq!(reader.read_next().unwrap(), "");
    assert_eq!(reader.read_next().unwrap(), "");
}

#[test]
fn test_concatenation_over_polls_has_no_gaps_or_duplicates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "").unwrap();

    let mut reader = TailReader::new(&path);
    let mut collected = String::new();

    for piece in ["first ", "second ", "", "third\n", "fourth"] {
        append(&path, piece.as_bytes());
        collected.push_str(&reader.read_next().unwrap());
    }

    assert_eq!(collected, "first second third\nfourth");
    assert_eq!(reader.offset(), collected.len() as u64);
}

#[test]
fn test_offset_tracks_bytes_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "abcdef").unwrap();

    let mut reader = TailReader::new(&path);
    assert_eq!(reader.offset(), 0);
    reader.read_next().unwrap();
    assert_eq!(reader.offset(), 6);
}

// ============================================================================
// Skip existing content
// ============================================================================

#[test]
fn test_skip_existing_starts_at_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "preexisting").unwrap();

    let mut reader = TailReader::skipping_existing(&path);
    assert_eq!(reader.read_next().unwrap(), "");

    append(&path, b"more");
    assert_eq!(reader.read_next().unwrap(), "more");
}

#[test]
fn test_skip_existing_on_missing_file_replays_later_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");

    let mut reader = TailReader::skipping_existing(&path);
    assert!(reader.read_next().is_none());

    fs::write(&path, "late").unwrap();
    assert_eq!(reader.read_next().unwrap(), "late");
}

// ============================================================================
// Rotation and truncation
// ============================================================================

#[test]
fn test_shrink_restarts_from_beginning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "x".repeat(100)).unwrap();

    let mut reader = TailReader::new(&path);
    assert_eq!(reader.read_next().unwrap().len(), 100);
    assert_eq!(reader.offset(), 100);

    fs::write(&path, "0123456789").unwrap();
    assert_eq!(reader.read_next().unwrap(), "0123456789");
    assert_eq!(reader.offset(), 10);
    assert_eq!(reader.metrics().snapshot().rotations, 1);
}

#[test]
fn test_rotation_by_replacement_delivers_new_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "old old old old old").unwrap();

    let mut reader = TailReader::new(&path);
    reader.read_next().unwrap();

    fs::remove_file(&path).unwrap();
    fs::write(&path, "fresh").unwrap();
    assert_eq!(reader.read_next().unwrap(), "fresh");
}

#[test]
fn test_growth_after_shrink_is_not_a_rotation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "abc").unwrap();

    let mut reader = TailReader::new(&path);
    reader.read_next().unwrap();

    // Same length as the offset: nothing new, nothing reset.
    assert_eq!(reader.read_next().unwrap(), "");
    assert_eq!(reader.metrics().snapshot().rotations, 0);
}

// ============================================================================
// Failure recovery
// ============================================================================

#[test]
fn test_missing_file_fails_then_recovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");

    let mut reader = TailReader::new(&path);
    assert!(reader.read_next().is_none());
    assert!(reader.read_next().is_none());
    assert_eq!(reader.metrics().snapshot().failures, 2);

    fs::write(&path, "recovered").unwrap();
    assert_eq!(reader.read_next().unwrap(), "recovered");
}

#[test]
fn test_file_disappearing_mid_session_resets_offset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "content").unwrap();

    let mut reader = TailReader::new(&path);
    reader.read_next().unwrap();
    assert_eq!(reader.offset(), 7);

    fs::remove_file(&path).unwrap();
    assert!(reader.read_next().is_none());
    assert_eq!(reader.offset(), 0);

    // A recreated file is replayed from the start.
    fs::write(&path, "again").unwrap();
    assert_eq!(reader.read_next().unwrap(), "again");
}

// ============================================================================
// UTF-8 chunk boundaries
// ============================================================================

#[test]
fn test_utf8_sequence_split_across_polls() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "").unwrap();

    let mut reader = TailReader::new(&path);

    // "é" is 0xC3 0xA9; split it across two appends.
    append(&path, b"h\xC3");
    assert_eq!(reader.read_next().unwrap(), "h");

    append(&path, b"\xA9llo");
    assert_eq!(reader.read_next().unwrap(), "\u{e9}llo");
}

#[test]
fn test_invalid_bytes_are_replaced_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, b"ok\xFFok").unwrap();

    let mut reader = TailReader::new(&path);
    let text = reader.read_next().unwrap();
    assert_eq!(text, "ok\u{fffd}ok");
}
