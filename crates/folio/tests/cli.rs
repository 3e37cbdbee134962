//! CLI integration tests for folio commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test)
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Helper to get a folio command run from `dir` with HOME isolated to it.
fn folio(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

/// Creates a workspace with a `docs/` tree.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("finance")).unwrap();
    fs::write(
        docs.join("finance/report.txt"),
        "Intro page\x0cRevenue grew 20% this year",
    )
    .unwrap();
    fs::write(docs.join("notes.md"), "# Notes\nmeeting about the garden").unwrap();
    fs::write(docs.join("image.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();
    dir
}

/// Runs `folio index docs` in `dir`.
fn index_docs(dir: &Path) {
    folio(dir)
        .args(["index", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 2 file(s), skipped 0."));
}

/// Runs a command and parses its stdout as JSON.
fn json_output(dir: &Path, args: &[&str]) -> Value {
    let output = folio(dir).args(args).assert().success().get_output().clone();
    serde_json::from_slice(&output.stdout).unwrap()
}

mod index {
    use super::*;

    #[test]
    fn creates_index_under_cwd() {
        let dir = workspace();
        index_docs(dir.path());
        assert!(dir.path().join(".folio/index/folio-index.json").exists());
    }

    #[test]
    fn reindex_replaces_documents() {
        let dir = workspace();
        index_docs(dir.path());
        index_docs(dir.path());

        let stats = json_output(dir.path(), &["stats", "--json"]);
        assert_eq!(stats["total_documents"], 2);
    }

    #[test]
    fn bad_files_are_reported_not_fatal() {
        let dir = workspace();
        fs::write(dir.path().join("docs/broken.txt"), [0xffu8, 0xfe]).unwrap();

        folio(dir.path())
            .args(["index", "docs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("skipped 1"))
            .stdout(predicate::str::contains("broken.txt"));
    }

    #[test]
    fn oversized_files_are_skipped() {
        let dir = workspace();
        folio(dir.path())
            .args(["index", "docs", "--max-file-size", "20"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 0 file(s), skipped 2."));
    }

    #[test]
    fn missing_path_fails() {
        let dir = workspace();
        folio(dir.path())
            .args(["index", "nowhere"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));
    }

    #[test]
    fn unknown_tokenizer_fails() {
        let dir = workspace();
        folio(dir.path())
            .args(["index", "docs", "--tokenizer", "morse"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown tokenizer"));
    }

    #[test]
    fn explicit_index_dir() {
        let dir = workspace();
        folio(dir.path())
            .args(["index", "docs", "--index-dir", "elsewhere"])
            .assert()
            .success();
        assert!(dir.path().join("elsewhere/folio-index.json").exists());
        assert!(!dir.path().join(".folio").exists());

        let stats = json_output(dir.path(), &["stats", "--json", "--index-dir", "elsewhere"]);
        assert_eq!(stats["total_documents"], 2);
    }

    #[test]
    fn config_excludes_are_honored() {
        let dir = workspace();
        fs::write(
            dir.path().join(".folio.toml"),
            "[index]\nexclude = [\"finance/**\"]\n",
        )
        .unwrap();

        folio(dir.path())
            .args(["index", "docs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 1 file(s)"));
    }
}

mod search {
    use super::*;

    #[test]
    fn finds_paged_match() {
        let dir = workspace();
        index_docs(dir.path());

        let out = json_output(dir.path(), &["search", "revenue", "--json"]);
        assert_eq!(out["query"], "revenue");
        assert_eq!(out["total_matches"], 1);
        let hit = &out["results"][0];
        assert_eq!(hit["file_name"], "report.txt");
        assert_eq!(hit["matched_pages"], serde_json::json!([2]));
        assert!(
            hit["snippet"]
                .as_str()
                .unwrap()
                .to_lowercase()
                .contains("revenue")
        );
    }

    #[test]
    fn text_output() {
        let dir = workspace();
        index_docs(dir.path());

        folio(dir.path())
            .args(["search", "garden"])
            .assert()
            .success()
            .stdout(predicate::str::contains("notes.md"));
    }

    #[test]
    fn no_results_is_success() {
        let dir = workspace();
        index_docs(dir.path());

        folio(dir.path())
            .args(["search", "zanzibar"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No results found."));
    }

    #[test]
    fn max_results_limits_output() {
        let dir = workspace();
        index_docs(dir.path());

        let out = json_output(dir.path(), &["search", "revenue OR garden", "-n", "1", "--json"]);
        assert_eq!(out["total_matches"], 1);
    }

    #[test]
    fn query_error_fails() {
        let dir = workspace();
        index_docs(dir.path());

        folio(dir.path())
            .args(["search", "(revenue"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));

        folio(dir.path())
            .args(["search", "author:ada"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown field"));
    }

    #[test]
    fn missing_index_fails() {
        let dir = workspace();
        folio(dir.path())
            .args(["search", "revenue"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("folio index"));
    }
}

mod list {
    use super::*;

    #[test]
    fn lists_documents_as_json() {
        let dir = workspace();
        index_docs(dir.path());

        let out = json_output(dir.path(), &["list", "--json"]);
        let docs = out.as_array().unwrap();
        assert_eq!(docs.len(), 2);
        let report = docs.iter().find(|d| d["file_name"] == "report.txt").unwrap();
        assert_eq!(report["page_count"], 2);
        assert_eq!(report["metadata"]["extension"], "txt");
    }

    #[test]
    fn table_output() {
        let dir = workspace();
        index_docs(dir.path());

        folio(dir.path())
            .arg("ls")
            .assert()
            .success()
            .stdout(predicate::str::contains("report.txt"))
            .stdout(predicate::str::contains("notes.md"));
    }
}

mod stats {
    use super::*;

    #[test]
    fn text_output() {
        let dir = workspace();
        index_docs(dir.path());

        folio(dir.path())
            .arg("stats")
            .assert()
            .success()
            .stdout(predicate::str::contains("documents: 2"));
    }
}

mod clear {
    use super::*;

    #[test]
    fn removes_everything() {
        let dir = workspace();
        index_docs(dir.path());

        folio(dir.path())
            .arg("clear")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared 2 document(s)"));

        let stats = json_output(dir.path(), &["stats", "--json"]);
        assert_eq!(stats["total_documents"], 0);

        folio(dir.path())
            .args(["search", "revenue"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No results found."));
    }

    #[test]
    fn missing_index_fails() {
        let dir = workspace();
        folio(dir.path()).arg("clear").assert().failure();
    }
}

mod logging {
    use super::*;

    #[test]
    fn verbose_logs_to_stderr() {
        let dir = workspace();
        folio(dir.path())
            .args(["-v", "index", "docs"])
            .assert()
            .success()
            .stderr(predicate::str::contains("ingested files"));
    }
}
