//! Integration tests for local-cache

/// Whether the external archiver pair is installed on this host
fn archiver_available() -> bool {
    ["tar", "zstd"].iter().all(|bin| {
        std::process::Command::new(bin)
            .arg("--version")
            .output()
            .is_ok()
    })
}

mod cli_tests {
    use super::archiver_available;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command isolated from the host runner environment
    fn local_cache(temp: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("local-cache");
        for var in [
            "GITHUB_OUTPUT",
            "GITHUB_WORKSPACE",
            "GITHUB_RUN_ID",
            "LOCAL_CACHE_DIR",
            "LOCAL_CACHE_RUN_ID",
            "INPUT_PATH",
            "INPUT_KEY",
            "INPUT_RESTORE-KEYS",
            "INPUT_FAIL-ON-CACHE-MISS",
            "INPUT_LOOKUP-ONLY",
            "INPUT_COMPRESSION-LEVEL",
            "INPUT_TARGET-DIR",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("RUNNER_TOOL_CACHE", temp.join("cache"))
            .env("RUNNER_TEMP", temp.join("tmp"))
            .env("LOCAL_CACHE_CONFIG", temp.join("absent.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Filesystem-backed artifact cache"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("local-cache"));
    }

    #[test]
    fn restore_requires_key() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .args(["restore", "--path", "node_modules"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Input required and not supplied: key"));
    }

    #[test]
    fn save_requires_path() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .env("INPUT_KEY", "k")
            .env("INPUT_PATH", "\n   \n")
            .arg("save")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Input required and not supplied: path"));
    }

    #[test]
    fn restore_miss_prints_outputs() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .args(["restore", "--key", "x", "--path", "node_modules"])
            .args(["--restore-keys", "y\nz"])
            .arg("--target-dir")
            .arg(temp.path().join("out"))
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-primary-key=x"))
            .stdout(predicate::str::contains("cache-hit=false"))
            .stdout(predicate::str::contains("cache-matched-key=\n"));
    }

    #[test]
    fn fail_on_cache_miss_from_environment() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .env("INPUT_KEY", "never-saved")
            .env("INPUT_PATH", "node_modules")
            .env("INPUT_FAIL-ON-CACHE-MISS", "true")
            .arg("restore")
            .assert()
            .failure()
            .stderr(predicate::str::contains("fail-on-cache-miss"));
    }

    #[test]
    fn outputs_written_to_github_output_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("github_output");

        local_cache(temp.path())
            .env("GITHUB_OUTPUT", &output)
            .args(["restore", "--lookup-only", "--key", "k", "--path", "a"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit").not());

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "cache-primary-key=k\ncache-hit=false\ncache-matched-key=\n"
        );
    }

    #[test]
    fn save_with_nothing_to_cache_succeeds() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .args(["save", "--key", "k", "--path"])
            .arg(temp.path().join("missing"))
            .assert()
            .success();

        assert!(!temp.path().join("cache").join("k.tar.zst").exists());
    }

    #[test]
    fn post_without_pending_saves() {
        let temp = TempDir::new().unwrap();
        local_cache(temp.path())
            .args(["post", "--run-id", "nothing-here"])
            .assert()
            .success()
            .stderr(predicate::str::contains("No pending cache saves"));
    }

    #[test]
    fn save_then_restore_roundtrip() {
        if !archiver_available() {
            eprintln!("skipping: tar or zstd not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let modules = temp.path().join("node_modules");
        std::fs::create_dir_all(&modules).unwrap();
        std::fs::write(modules.join("pkg.json"), "{}").unwrap();

        local_cache(temp.path())
            .args(["save", "--key", "linux-node-abc123", "--path"])
            .arg(&modules)
            .assert()
            .success();
        assert!(temp
            .path()
            .join("cache")
            .join("linux_node_abc123.tar.zst")
            .is_file());

        local_cache(temp.path())
            .args(["restore", "--lookup-only", "--key", "linux-node-abc123"])
            .args(["--restore-keys", "linux-node-", "--path", "node_modules"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=true"))
            .stdout(predicate::str::contains("cache-matched-key=linux-node-abc123"));

        let out = temp.path().join("out");
        local_cache(temp.path())
            .args(["restore", "--key", "linux-node-abc123", "--path", "node_modules"])
            .arg("--target-dir")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=true"));

        let relative = modules.strip_prefix("/").unwrap();
        assert!(out.join(relative).join("pkg.json").is_file());
    }

    #[test]
    fn restore_miss_then_post_saves() {
        if !archiver_available() {
            eprintln!("skipping: tar or zstd not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("build.log"), "ok").unwrap();

        local_cache(temp.path())
            .env("LOCAL_CACHE_RUN_ID", "job-1")
            .args(["restore", "--key", "cargo-1", "--path"])
            .arg(&target)
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=false"));

        local_cache(temp.path())
            .env("LOCAL_CACHE_RUN_ID", "job-1")
            .arg("post")
            .assert()
            .success();

        assert!(temp.path().join("cache").join("cargo_1.tar.zst").is_file());
    }
}

mod engine_tests {
    use super::archiver_available;
    use local_cache::cache::{CacheEngine, CacheStore, LocalCacheStore};
    use local_cache::codec::{CompressionLevel, TarZstdCodec};
    use std::path::Path;
    use tempfile::TempDir;

    fn engine(temp: &Path) -> CacheEngine {
        CacheEngine::new(
            Box::new(LocalCacheStore::new(temp.join("cache"))),
            Box::new(TarZstdCodec::new(temp.join("tmp"))),
        )
    }

    #[tokio::test]
    async fn save_twice_leaves_one_extractable_archive() {
        if !archiver_available() {
            eprintln!("skipping: tar or zstd not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("deps");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("a.txt"), "first").unwrap();
        let paths = vec![src.display().to_string()];
        let engine = engine(temp.path());

        assert!(engine.save(&paths, "k1", CompressionLevel::DEFAULT).await);
        std::fs::write(src.join("a.txt"), "second").unwrap();
        assert!(engine.save(&paths, "k1", CompressionLevel::DEFAULT).await);

        let archives: Vec<_> = std::fs::read_dir(temp.path().join("cache"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(archives, vec!["k1.tar.zst"]);

        let out = temp.path().join("out");
        let outcome = engine.restore(&[], "k1", &[], &out).await;
        assert!(outcome.cache_hit);
        assert_eq!(outcome.matched_key.as_deref(), Some("k1"));
        assert_eq!(outcome.restored_to.as_deref(), Some(out.as_path()));

        let restored = out.join(src.strip_prefix("/").unwrap()).join("a.txt");
        assert_eq!(std::fs::read_to_string(restored).unwrap(), "second");
    }

    #[tokio::test]
    async fn corrupt_primary_falls_back_to_restore_key() {
        if !archiver_available() {
            eprintln!("skipping: tar or zstd not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("deps");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("a.txt"), "fallback").unwrap();
        let engine = engine(temp.path());

        assert!(
            engine
                .save(&[src.display().to_string()], "linux-", CompressionLevel(1))
                .await
        );
        let store = LocalCacheStore::new(temp.path().join("cache"));
        std::fs::write(store.archive_path("linux-abc").unwrap(), b"garbage").unwrap();

        let outcome = engine
            .restore(
                &[],
                "linux-abc",
                &["linux-".to_string()],
                &temp.path().join("out"),
            )
            .await;

        assert!(!outcome.cache_hit);
        assert_eq!(outcome.matched_key.as_deref(), Some("linux-"));
    }
}
