use std::path::{Path, PathBuf};

use troverai::config::*;

#[test]
fn test_strip_quotes() {
    assert_eq!(strip_quotes("\"secret\""), "secret");
    assert_eq!(strip_quotes("'secret'"), "secret");
    assert_eq!(strip_quotes("  secret  "), "secret");

    // Mismatched or inner quotes are kept
    assert_eq!(strip_quotes("\"secret'"), "\"secret'");
    assert_eq!(strip_quotes("pa\"ss"), "pa\"ss");
    assert_eq!(strip_quotes("\""), "\"");
}

#[test]
fn test_catalog_file_explicit_path_wins() {
    let explicit = Path::new("/tmp/dump/rai.json");
    assert_eq!(catalog_file(Some(explicit)), PathBuf::from("/tmp/dump/rai.json"));
}

#[test]
fn test_cache_dir_is_below_data_dir() {
    assert_eq!(cache_dir(), data_dir().join("cache"));
}
