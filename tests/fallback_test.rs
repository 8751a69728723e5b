mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{write_config, write_requests};
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let config = write_config("tags:\n  - \"VIP:0\"\n");
    let requests = write_requests(&["buy, alice, 0"]);

    let mut cmd = Command::new(cargo_bin!("tagshop"));
    cmd.arg(requests.path())
        .arg("--config")
        .arg(config.path())
        .arg("--db-path")
        .arg("some_db");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("alice,0"))
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let config = write_config("tags:\n  - \"VIP:0\"\n");
    let requests = write_requests(&["buy, alice, 0"]);

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("tagshop"));
    cmd.arg(requests.path())
        .arg("--config")
        .arg(config.path())
        .arg("--db-path")
        .arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}
