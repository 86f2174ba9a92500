//! Binary-level tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DUMP: &str = r#"{"subject":{"iri":"https://wordnet.dk/dannet/data/synset-1"},"predicate":"http://www.w3.org/2000/01/rdf-schema#label","object":{"literal":{"value":"hus","lang":"da"}}}
{"subject":{"iri":"https://wordnet.dk/dannet/data/synset-1"},"predicate":"https://globalwordnet.github.io/schemas/wn#hypernym","object":{"iri":"https://wordnet.dk/dannet/data/synset-2"}}
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dump.jsonl"), DUMP).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lexlink").unwrap();
        cmd.env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("config.toml"));
        cmd
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_config_lifecycle() {
    let fx = Fixture::new();
    let config = fx.path("config.toml");

    fx.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path_str(&config)));

    fx.cmd().args(["config", "init"]).assert().success();
    assert!(config.exists());
    fx.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    fx.cmd()
        .args(["config", "get", "bind"])
        .assert()
        .success()
        .stdout("127.0.0.1:3456\n");

    fx.cmd()
        .args(["config", "set", "store.backend", "sqlite"])
        .assert()
        .success();
    fx.cmd()
        .args(["config", "get", "store.backend"])
        .assert()
        .success()
        .stdout("sqlite\n");

    fx.cmd()
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_show_renders_resource() {
    let fx = Fixture::new();
    let dump = fx.path("dump.jsonl");

    fx.cmd()
        .args(["show", "dn:synset-1", "--load", path_str(&dump)])
        .assert()
        .success()
        .stdout(predicate::str::contains("| predicate"))
        .stdout(predicate::str::contains("\"hus\"@da"))
        .stdout(predicate::str::contains("dn:synset-2"));

    fx.cmd()
        .args(["show", "dn:synset-1", "--format", "turtle", "--load", path_str(&dump)])
        .assert()
        .success()
        .stdout(predicate::str::contains("@prefix dn: <https://wordnet.dk/dannet/data/> ."));
}

#[test]
fn test_show_missing_resource_fails() {
    let fx = Fixture::new();
    let dump = fx.path("dump.jsonl");

    fx.cmd()
        .args(["show", "dn:nothing", "--load", path_str(&dump)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No facts about"));

    fx.cmd()
        .args(["show", "zz:thing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown prefix"));
}

#[test]
fn test_import_then_show_from_sqlite() {
    let fx = Fixture::new();
    let dump = fx.path("dump.jsonl");
    let db = fx.path("store.sqlite");

    fx.cmd()
        .args(["import", path_str(&dump), "--backend", "sqlite", "--path", path_str(&db)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 new triples"));

    fx.cmd()
        .args(["show", "dn:synset-1", "--format", "json"])
        .args(["--backend", "sqlite", "--path", path_str(&db)])
        .assert()
        .success()
        .stdout(predicate::str::contains("synset-2"));
}

#[test]
fn test_import_into_memory_is_refused() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["import", path_str(&fx.path("dump.jsonl")), "--backend", "memory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("memory backend"));
}

#[test]
fn test_completions() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lexlink"));
}
