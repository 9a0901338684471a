//! Integration tests for the usb-watchguard binary
//!
//! Runs the real executable against a throwaway config folder:
//! - Single-pair commands and their persistence
//! - Import/export through files and stdin
//! - Lockdown mode refusing changes
//! - Recovery from a corrupted snapshot

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn watchguard(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("usb-watchguard");
    cmd.env_remove("APPDATA")
        .env_remove("RUST_LOG")
        .env_remove("VISUAL")
        .env("XDG_CONFIG_HOME", config_home)
        .env("EDITOR", "true");
    cmd
}

fn run(config_home: &Path, args: &[&str]) {
    watchguard(config_home).args(args).assert().success();
}

mod basic_commands {
    use super::*;

    #[test]
    fn test_first_run_creates_config_folder() {
        let home = TempDir::new().unwrap();

        watchguard(home.path())
            .arg("list")
            .assert()
            .success()
            .stdout("Denylist is empty\n");

        assert!(home.path().join("filter-usb").join("config.toml").exists());
        assert!(home.path().join("filter-usb").join("denylist.bin").exists());
    }

    #[test]
    fn test_add_list_remove() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);
        run(home.path(), &["add", "046d", "c52e"]);

        watchguard(home.path())
            .arg("list")
            .assert()
            .success()
            .stdout("046d:c52b\n046d:c52e\n");

        run(home.path(), &["remove", "046d", "c52b"]);

        watchguard(home.path())
            .arg("list")
            .assert()
            .success()
            .stdout("046d:c52e\n");
    }

    #[test]
    fn test_check_exit_status() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);

        watchguard(home.path())
            .args(["check", "046d", "c52b"])
            .assert()
            .code(1)
            .stdout("046d:c52b denylisted\n");

        watchguard(home.path())
            .args(["check", "046d", "0001"])
            .assert()
            .success()
            .stdout("046d:0001 allowed\n");
    }

    #[test]
    fn test_add_invalid_entry_fails() {
        let home = TempDir::new().unwrap();

        watchguard(home.path())
            .args(["add", "04:6d", "c52b"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid entry"));
    }

    #[test]
    fn test_clear() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);
        run(home.path(), &["clear"]);

        watchguard(home.path())
            .arg("list")
            .assert()
            .stdout("Denylist is empty\n");
    }

    #[test]
    fn test_help_lists_subcommands() {
        let home = TempDir::new().unwrap();

        watchguard(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("import"))
            .stdout(predicate::str::contains("export"))
            .stdout(predicate::str::contains("mode"));
    }
}

mod bulk {
    use super::*;

    #[test]
    fn test_import_from_stdin_replaces() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "dead", "beef"]);

        watchguard(home.path())
            .arg("import")
            .write_stdin("a:b\nbad\nc:d\n")
            .assert()
            .success()
            .stdout("Imported 2 entries (1 lines rejected)\n")
            .stderr(predicate::str::contains("Couldn't understand `bad`"));

        watchguard(home.path())
            .arg("list")
            .assert()
            .stdout("a:b\nc:d\n");
    }

    #[test]
    fn test_export_import_file_roundtrip() {
        let home = TempDir::new().unwrap();
        let file = home.path().join("blocked.txt");
        let file_arg = file.to_str().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);
        run(home.path(), &["add", "0781", "5567"]);

        run(home.path(), &["export", file_arg]);
        assert_eq!(fs::read_to_string(&file).unwrap(), "046d:c52b\n0781:5567\n");

        run(home.path(), &["clear"]);
        run(home.path(), &["import", file_arg]);

        watchguard(home.path())
            .arg("export")
            .assert()
            .success()
            .stdout("046d:c52b\n0781:5567\n");
    }

    #[test]
    fn test_edit_without_changes() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);

        watchguard(home.path())
            .arg("edit")
            .assert()
            .success()
            .stdout("No changes\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_replaces_denylist() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);

        watchguard(home.path())
            .env("EDITOR", "sh -c 'printf \"0781:5567\\nbad\\n\" > \"$0\"'")
            .arg("edit")
            .assert()
            .success()
            .stdout("Imported 1 entries (1 lines rejected)\n")
            .stderr(predicate::str::contains("Couldn't understand `bad`"));

        watchguard(home.path())
            .arg("list")
            .assert()
            .stdout("0781:5567\n");
    }

    #[test]
    fn test_edit_cancelled_by_failing_editor() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);

        watchguard(home.path())
            .env("EDITOR", "false")
            .arg("edit")
            .assert()
            .success()
            .stdout("Edit cancelled\n");

        watchguard(home.path())
            .arg("list")
            .assert()
            .stdout("046d:c52b\n");
    }

    #[test]
    fn test_populate_count() {
        let home = TempDir::new().unwrap();

        watchguard(home.path())
            .args(["populate", "--count", "3"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Added "));

        watchguard(home.path())
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains(":"));
    }
}

mod lockdown {
    use super::*;

    #[test]
    fn test_lockdown_refuses_changes() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["add", "046d", "c52b"]);
        run(home.path(), &["mode", "lockdown"]);

        watchguard(home.path())
            .arg("mode")
            .assert()
            .success()
            .stdout("lockdown\n");

        for args in [
            vec!["add", "0781", "5567"],
            vec!["remove", "046d", "c52b"],
            vec!["clear"],
            vec!["import"],
            vec!["edit"],
            vec!["populate"],
        ] {
            watchguard(home.path())
                .args(&args)
                .assert()
                .code(2)
                .stderr(predicate::str::contains("Lockdown mode is active"));
        }

        // Queries still work and nothing changed
        watchguard(home.path())
            .arg("list")
            .assert()
            .success()
            .stdout("046d:c52b\n");

        run(home.path(), &["mode", "normal"]);
        run(home.path(), &["clear"]);
    }

    #[test]
    fn test_mode_persists_in_config() {
        let home = TempDir::new().unwrap();
        run(home.path(), &["mode", "lockdown"]);

        let content =
            fs::read_to_string(home.path().join("filter-usb").join("config.toml")).unwrap();
        let config: toml::Value = toml::from_str(&content).unwrap();
        assert_eq!(
            config
                .get("guard")
                .unwrap()
                .get("mode")
                .unwrap()
                .as_str()
                .unwrap(),
            "lockdown"
        );
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let home = TempDir::new().unwrap();

        watchguard(home.path())
            .args(["mode", "paranoid"])
            .assert()
            .failure();
    }
}

mod storage {
    use super::*;

    #[test]
    fn test_corrupted_snapshot_recovers() {
        let home = TempDir::new().unwrap();
        let folder = home.path().join("filter-usb");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("denylist.bin"), b"garbage").unwrap();

        watchguard(home.path())
            .arg("list")
            .assert()
            .success()
            .stdout("Denylist is empty\n")
            .stderr(predicate::str::contains("unreadable"));
    }

    #[test]
    fn test_storage_override() {
        let home = TempDir::new().unwrap();
        let custom = home.path().join("elsewhere").join("list.bin");
        let custom_arg = custom.to_str().unwrap();

        run(home.path(), &["--storage", custom_arg, "add", "046d", "c52b"]);
        assert!(custom.exists());

        watchguard(home.path())
            .args(["--storage", custom_arg, "list"])
            .assert()
            .stdout("046d:c52b\n");

        // The default snapshot is untouched
        watchguard(home.path())
            .arg("list")
            .assert()
            .stdout("Denylist is empty\n");
    }

    #[test]
    fn test_snapshot_path_from_config() {
        let home = TempDir::new().unwrap();
        let config_path = home.path().join("custom.toml");
        let snapshot_path = home.path().join("from-config.bin");
        fs::write(
            &config_path,
            format!(
                "[storage]\nsnapshot_path = \"{}\"\n",
                snapshot_path.display()
            ),
        )
        .unwrap();

        run(
            home.path(),
            &["--config", config_path.to_str().unwrap(), "add", "046d", "c52b"],
        );
        assert!(snapshot_path.exists());
    }

    #[test]
    fn test_invalid_config_fails() {
        let home = TempDir::new().unwrap();
        let config_path = home.path().join("bad.toml");
        fs::write(&config_path, "[guard]\nlog_level = \"loud\"\n").unwrap();

        watchguard(home.path())
            .args(["--config", config_path.to_str().unwrap(), "list"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to load configuration"));
    }

    #[test]
    fn test_check_error_distinct_from_denylisted() {
        let home = TempDir::new().unwrap();
        let folder = home.path().join("filter-usb");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("config.toml"), "[guard]\nlog_level = \"loud\"\n").unwrap();

        watchguard(home.path())
            .args(["check", "046d", "c52b"])
            .assert()
            .code(3)
            .stdout("");
    }

    #[test]
    fn test_save_config() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("custom.toml");

        run(
            home.path(),
            &["--config", path.to_str().unwrap(), "--save-config"],
        );

        let config: toml::Value = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let guard = config.get("guard").unwrap();
        assert_eq!(guard.get("log_level").unwrap().as_str().unwrap(), "info");
        assert_eq!(guard.get("mode").unwrap().as_str().unwrap(), "normal");
    }
}
