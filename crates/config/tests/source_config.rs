//! Integration tests for configuration discovery

#![allow(unsafe_code)]

use mirra_config::{CONFIG_FILE_NAME, Config, default_source_dir};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
#[serial]
fn test_default_source_dir_follows_xdg_data_home() {
    let td = tempdir().unwrap();
    let previous = std::env::var_os("XDG_DATA_HOME");

    // Serialized: the environment is process-wide
    unsafe {
        std::env::set_var("XDG_DATA_HOME", td.path());
    }
    let resolved = default_source_dir();
    unsafe {
        match previous {
            Some(value) => std::env::set_var("XDG_DATA_HOME", value),
            None => std::env::remove_var("XDG_DATA_HOME"),
        }
    }

    assert_eq!(resolved, Some(td.path().join("mirra")));
}

#[test]
fn test_source_config_with_custom_root_entry() {
    let td = tempdir().unwrap();
    fs::write(
        td.path().join(CONFIG_FILE_NAME),
        r#"
[general]
rootEntry = "dotfiles"
dstDir = "sandbox"

[data]
hostname = "workstation"
"#,
    )
    .unwrap();

    let config = Config::load_from_source(td.path()).unwrap();

    assert_eq!(config.dotfiles_dir(td.path()), td.path().join("dotfiles"));
    assert_eq!(config.dest_dir(), Some(&td.path().join("sandbox")));
    assert_eq!(config.data["hostname"], "workstation");
}

#[test]
fn test_source_without_config_has_no_overrides() {
    let td = tempdir().unwrap();
    let config = Config::load_from_source(td.path()).unwrap();

    assert!(config.source_dir().is_none());
    assert!(config.dest_dir().is_none());
    assert_eq!(config.general.root_entry, PathBuf::from("home"));
}
