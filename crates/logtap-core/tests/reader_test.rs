use logtap_core::{get_file_lines, get_file_lines_async, tail, tail_async, TailError, TailReader};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_log(dir: &TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============ TAIL ============

#[test]
fn test_tail_basic() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "line 1\nline 2\nline 3");

    assert_eq!(tail(&path, 3).unwrap(), vec!["line 1", "line 2", "line 3"]);
}

#[test]
fn test_tail_limit() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..10).map(|i| format!("log {i}")).collect();
    let path = write_log(&dir, "test.log", lines.join("\n"));

    assert_eq!(
        tail(&path, 5).unwrap(),
        vec!["log 5", "log 6", "log 7", "log 8", "log 9"]
    );
}

#[test]
fn test_tail_limit_larger_than_file() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "only\ntwo\n");

    assert_eq!(tail(&path, 1000).unwrap(), vec!["only", "two"]);
}

#[test]
fn test_tail_large_file() {
    let dir = TempDir::new().unwrap();
    let content = vec!["test log line"; 1_000_000].join("\n");
    let path = write_log(&dir, "large.log", content);

    let result = tail(&path, 10).unwrap();
    assert_eq!(result.len(), 10);
    assert!(result.iter().all(|line| line == "test log line"));
}

#[test]
fn test_tail_large_multibyte_file() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..1_000_000)
        .map(|i| format!("ligne {i} é日🚀\n"))
        .collect();
    let path = write_log(&dir, "large-utf8.log", content);

    // odd chunk size so chunk edges land inside multi-byte characters
    let reader = TailReader::with_chunk_size(8191);
    assert_eq!(
        reader.tail(&path, 3).unwrap(),
        vec!["ligne 999997 é日🚀", "ligne 999998 é日🚀", "ligne 999999 é日🚀"]
    );
    assert_eq!(reader.tail(&path, 1000).unwrap()[0], "ligne 999000 é日🚀");
}

#[test]
fn test_tail_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "empty.log", "");

    assert!(tail(&path, 10).unwrap().is_empty());
}

#[test]
fn test_tail_utf8() {
    let dir = TempDir::new().unwrap();
    let lines = ["test log containing non-ASCII character: ö", "日本語テスト", "emoji: 🚀"];
    let path = write_log(&dir, "utf8.log", lines.join("\n"));

    assert_eq!(tail(&path, 3).unwrap(), lines);
}

#[test]
fn test_tail_preserves_empty_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "line 1\n\nline 3");

    assert_eq!(tail(&path, 3).unwrap(), vec!["line 1", "", "line 3"]);
}

#[test]
fn test_tail_zero_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "a\nb\n");

    assert!(tail(&path, 0).unwrap().is_empty());
}

#[test]
fn test_small_chunks_match_default() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..200).map(|i| format!("entry {i} ✓ done")).collect();
    let path = write_log(&dir, "chunks.log", lines.join("\n") + "\n");

    let expected = tail(&path, 25).unwrap();
    assert_eq!(expected, lines[175..].to_vec());
    for chunk_size in [1, 2, 3, 7, 16, 4096] {
        let reader = TailReader::with_chunk_size(chunk_size);
        assert_eq!(reader.tail(&path, 25).unwrap(), expected, "chunk size {chunk_size}");
    }
}

// ============ ERRORS ============

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = tail(dir.path().join("missing.log"), 10).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = tail(dir.path(), 10).unwrap_err();

    assert!(matches!(err, TailError::NotFound { .. }));
}

#[test]
fn test_invalid_utf8_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "bad.log", b"good\n\xc3\x28 broken\nlast\n");

    let err = tail(&path, 2).unwrap_err();
    assert!(matches!(err, TailError::Decode { line: 2, .. }));

    // the bad line is outside the requested window
    assert_eq!(tail(&path, 1).unwrap(), vec!["last"]);
}

// ============ ASYNC ============

#[tokio::test]
async fn test_tail_async_matches_sync() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..500).map(|i| format!("async line {i}")).collect();
    let path = write_log(&dir, "async.log", lines.join("\n"));

    for limit in [1, 10, 499, 500, 1000] {
        assert_eq!(tail_async(&path, limit).await.unwrap(), tail(&path, limit).unwrap());
    }

    let reader = TailReader::with_chunk_size(5);
    assert_eq!(reader.tail_async(&path, 40).await.unwrap(), lines[460..].to_vec());
}

#[tokio::test]
async fn test_tail_async_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = tail_async(dir.path().join("nope.log"), 5).await.unwrap_err();

    assert!(err.is_not_found());
}

// ============ GET FILE LINES ============

#[test]
fn test_get_file_lines_no_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "line 1\nline 2\nline 3");

    assert_eq!(
        get_file_lines(&path, None, 3).unwrap(),
        vec!["line 1", "line 2", "line 3"]
    );
}

#[test]
fn test_get_file_lines_with_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_log(
        &dir,
        "test.log",
        "error: something failed\ninfo: all good\nerror: another failure",
    );

    assert_eq!(
        get_file_lines(&path, Some("error"), 10).unwrap(),
        vec!["error: something failed", "error: another failure"]
    );
    assert!(get_file_lines(&path, Some("nonexistent"), 10).unwrap().is_empty());
    // case-sensitive
    assert!(get_file_lines(&path, Some("ERROR"), 10).unwrap().is_empty());
}

#[test]
fn test_get_file_lines_filters_after_tail() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "match 1\nmatch 2\nother\nother\n");

    // only the last two lines are searched
    assert!(get_file_lines(&path, Some("match"), 2).unwrap().is_empty());
}

#[tokio::test]
async fn test_get_file_lines_async_utf8_search() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "test.log", "test log containing non-ASCII character: ö\nplain");

    assert_eq!(
        get_file_lines_async(&path, Some("ö"), 10).await.unwrap(),
        vec!["test log containing non-ASCII character: ö"]
    );
}
