//! Integration tests for depstash

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn depstash() -> Command {
        cargo_bin_cmd!("depstash")
    }

    /// One isolated job environment: home, work dir, state file, store dir
    struct Job {
        _root: TempDir,
        home: PathBuf,
        work_dir: PathBuf,
        state_file: PathBuf,
        store_dir: PathBuf,
    }

    impl Job {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            let home = root.path().join("home");
            let work_dir = root.path().join("work");
            fs::create_dir_all(&home).unwrap();
            fs::create_dir_all(&work_dir).unwrap();
            Self {
                home,
                work_dir,
                state_file: root.path().join("state.json"),
                store_dir: root.path().join("store"),
                _root: root,
            }
        }

        fn cmd(&self, args: &[&str]) -> Command {
            self.cmd_with_state(&self.state_file, args)
        }

        /// Like `cmd` but with an explicit state file, for simulating a
        /// second job run against the same store.
        fn cmd_with_state(&self, state_file: &Path, args: &[&str]) -> Command {
            let mut cmd = depstash();
            cmd.env("HOME", &self.home)
                .arg("--work-dir")
                .arg(&self.work_dir)
                .arg("--state-file")
                .arg(state_file)
                .arg("--store-dir")
                .arg(&self.store_dir)
                .args(args);
            cmd
        }

        fn write(&self, rel: &str, content: &str) {
            let path = self.work_dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }

        fn next_state(&self) -> PathBuf {
            self.state_file.with_extension("next.json")
        }
    }

    fn stdout_of(cmd: &mut Command) -> String {
        let output = cmd.assert().success().get_output().stdout.clone();
        String::from_utf8(output).unwrap().trim().to_string()
    }

    #[test]
    fn help_displays() {
        depstash()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dependency cache keying"));
    }

    #[test]
    fn version_displays() {
        depstash()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depstash"));
    }

    #[test]
    fn key_is_deterministic() {
        let job = Job::new();
        job.write("pom.xml", "<project><artifactId>a</artifactId></project>");

        let first = stdout_of(&mut job.cmd(&["key", "maven"]));
        let second = stdout_of(&mut job.cmd(&["key", "maven"]));

        assert!(first.starts_with("depstash-"));
        assert!(first.contains("-maven-"));
        assert_eq!(first, second);
    }

    #[test]
    fn key_changes_with_content() {
        let job = Job::new();
        job.write("pom.xml", "<project>v1</project>");
        let before = stdout_of(&mut job.cmd(&["key", "maven"]));

        job.write("pom.xml", "<project>v2</project>");
        let after = stdout_of(&mut job.cmd(&["key", "maven"]));

        assert_ne!(before, after);
    }

    #[test]
    fn key_changes_when_file_added() {
        let job = Job::new();
        job.write("build.sbt", "name := \"app\"");
        job.write("project/Build.scala", "object Build");
        let before = stdout_of(&mut job.cmd(&["key", "sbt"]));

        job.write("project/Deps.scala", "object Deps");
        let after = stdout_of(&mut job.cmd(&["key", "sbt"]));

        assert_ne!(before, after);
    }

    #[test]
    fn override_pattern_narrows_matching() {
        let job = Job::new();
        job.write("build.gradle.kts", "plugins {}");
        job.write("sub-project1/build.gradle.kts", "dependencies {}");

        let full = stdout_of(&mut job.cmd(&["key", "gradle"]));
        let narrowed = stdout_of(&mut job.cmd(&[
            "key",
            "gradle",
            "--dependency-path",
            "sub-project1/**/*.gradle*",
        ]));

        assert_ne!(full, narrowed);
    }

    #[test]
    fn restore_unknown_package_manager_fails() {
        let job = Job::new();
        job.cmd(&["restore", "ant"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "unknown package manager specified: ant",
            ));
    }

    #[test]
    fn save_unknown_package_manager_fails() {
        let job = Job::new();
        job.cmd(&["save", "ant"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "unknown package manager specified: ant",
            ));
    }

    #[test]
    fn restore_without_matching_files_fails() {
        let job = Job::new();
        job.cmd(&["restore", "maven"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No file in"))
            .stderr(predicate::str::contains("matched to [**/pom.xml]"));
    }

    #[test]
    fn restore_miss_reports_no_hit() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");

        job.cmd(&["-v", "restore", "maven"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=false"))
            .stderr(predicate::str::contains("cache is not found for key"));
    }

    #[test]
    fn save_without_restore_warns_and_succeeds() {
        let job = Job::new();
        job.cmd(&["save", "maven"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Error retrieving key from state."));
        // Nothing was uploaded
        assert!(!job.store_dir.join("index.json").exists());
    }

    #[test]
    fn resolve_only_persists_key_without_store_access() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");

        job.cmd(&["restore", "maven", "--resolve-only"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=false"));

        let state = fs::read_to_string(&job.state_file).unwrap();
        assert!(state.contains("cache-primary-key"));
        assert!(!state.contains("cache-matched-key"));
        assert!(!job.store_dir.exists());
    }

    #[test]
    fn full_restore_save_cycle() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");

        // First job: miss, then save
        job.cmd(&["restore", "maven"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=false"));
        job.cmd(&["-v", "save", "maven"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Cache saved with the key:"));

        // Second job with identical content: exact hit, save skipped
        job.cmd_with_state(&job.next_state(), &["-v", "restore", "maven"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=true"))
            .stderr(predicate::str::contains("Cache restored from key:"));

        job.cmd_with_state(&job.next_state(), &["-v", "save", "maven"])
            .assert()
            .success()
            .stderr(predicate::str::contains("not saving cache"));
    }

    #[test]
    fn cached_files_round_trip_through_store() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");

        let repo = job.home.join(".m2").join("repository");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("artifact.jar"), "bytes").unwrap();

        job.cmd(&["restore", "maven"]).assert().success();
        job.cmd(&["save", "maven"]).assert().success();

        // A later job on a clean machine gets the repository back
        fs::remove_dir_all(&repo).unwrap();
        job.cmd_with_state(&job.next_state(), &["restore", "maven"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=true"));

        assert_eq!(
            fs::read_to_string(repo.join("artifact.jar")).unwrap(),
            "bytes"
        );
    }

    #[test]
    fn changed_dependencies_fall_back_then_resave() {
        let job = Job::new();
        job.write("pom.xml", "<project>v1</project>");
        job.cmd(&["restore", "maven"]).assert().success();
        job.cmd(&["save", "maven"]).assert().success();

        // Dependency change: exact miss, fallback hit, save proceeds
        job.write("pom.xml", "<project>v2</project>");
        job.cmd_with_state(&job.next_state(), &["-v", "restore", "maven"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=false"))
            .stderr(predicate::str::contains("Cache restored from key:"));

        job.cmd_with_state(&job.next_state(), &["-v", "save", "maven"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Cache saved with the key:"));
    }

    #[test]
    fn forced_duplicate_save_swallows_reserve_conflict() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");
        job.cmd(&["restore", "maven"]).assert().success();
        job.cmd(&["save", "maven"]).assert().success();

        // Same key again: the store reports a reservation conflict, which
        // the save phase treats as benign.
        job.cmd(&["-v", "save", "maven", "--force"])
            .assert()
            .success()
            .stderr(predicate::str::contains("another job may be creating"));
    }

    #[test]
    fn state_file_env_var_respected() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");

        let state = job.work_dir.parent().unwrap().join("env-state.json");
        depstash()
            .env("HOME", &job.home)
            .env("DEPSTASH_STATE_FILE", &state)
            .arg("--work-dir")
            .arg(&job.work_dir)
            .arg("--store-dir")
            .arg(&job.store_dir)
            .args(["restore", "maven", "--resolve-only"])
            .assert()
            .success();

        assert!(state.exists());
    }

    #[test]
    fn config_file_provides_defaults() {
        let job = Job::new();
        job.write("pom.xml", "<project/>");

        let root = job.work_dir.parent().unwrap();
        let config_path = root.join("config.toml");
        fs::write(
            &config_path,
            format!(
                "[store]\ndir = \"{}\"\n\n[state]\nfile = \"{}\"\n",
                root.join("cfg-store").display(),
                root.join("cfg-state.json").display()
            ),
        )
        .unwrap();

        depstash()
            .env("HOME", &job.home)
            .arg("--config")
            .arg(&config_path)
            .arg("--work-dir")
            .arg(&job.work_dir)
            .args(["restore", "maven", "--resolve-only"])
            .assert()
            .success();

        assert!(root.join("cfg-state.json").exists());
    }
}
