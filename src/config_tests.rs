#![allow(clippy::unwrap_used)]

use super::*;
use std::collections::HashMap;

fn config(vars: &[(&str, &str)]) -> Result<Config> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let cfg = config(&[(STORE_VAR, "/tmp/store.csv")]).unwrap();
    assert_eq!(cfg.delimiter, b'|');
    assert_eq!(cfg.unmatched, UnmatchedPolicy::FileUngrouped);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/store.csv"));
}

#[test]
fn test_default_store_file_name() {
    // Only meaningful where the platform has a home directory.
    if let Ok(path) = default_store_path() {
        assert!(path.ends_with(STORE_FILE));
    }
}

#[test]
fn test_overrides() {
    let cfg = config(&[
        (STORE_VAR, "data/tx.csv"),
        (DELIMITER_VAR, ";"),
        (UNMATCHED_VAR, "return"),
    ])
    .unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("data/tx.csv"));
    assert_eq!(cfg.delimiter, b';');
    assert_eq!(cfg.unmatched, UnmatchedPolicy::ReturnToCaller);
}

#[test]
fn test_tab_delimiter() {
    let cfg = config(&[(STORE_VAR, "x"), (DELIMITER_VAR, "\t")]).unwrap();
    assert_eq!(cfg.delimiter, b'\t');
}

#[test]
fn test_invalid_delimiter() {
    for bad in ["", "||", "a", "7", "\"", "€"] {
        let err = config(&[(STORE_VAR, "x"), (DELIMITER_VAR, bad)]).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfig { key, .. } if key == DELIMITER_VAR),
            "{bad:?}"
        );
    }
}

#[test]
fn test_invalid_unmatched_policy() {
    let err = config(&[(STORE_VAR, "x"), (UNMATCHED_VAR, "discard")]).unwrap_err();
    assert!(err.to_string().contains("discard"), "{err}");
}
