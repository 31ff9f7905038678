use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

pub const TEST_USER: &str = "0191f6a0-0000-7000-8000-00000000beef";
pub const OTHER_USER: &str = "0191f6a0-0000-7000-8000-00000000cafe";

/// Test harness for running CLI commands against a temporary database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// A `cadence` invocation acting as [`TEST_USER`].
    pub fn command(&self) -> Command {
        self.command_as(TEST_USER)
    }

    pub fn command_as(&self, user: &str) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
        cmd.current_dir(self.temp_dir.path())
            .env("CADENCE_DATABASE_PATH", &self.db_path)
            .env("CADENCE_USER_ID", user)
            .env_remove("CADENCE_LOG");
        cmd
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs with `--json` and parses stdout.
    pub fn run_json(&self, args: &[&str]) -> Value {
        let output = self.command().arg("--json").args(args).output().expect("Failed to run cadence");
        assert!(
            output.status.success(),
            "cadence {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
    }

    /// Adds a daily task anchored at 2024-01-01 and returns its id.
    pub fn add_daily_task(&self, title: &str) -> String {
        let task = self.run_json(&[
            "add",
            title,
            "--due",
            "2024-01-01T00:00:00Z",
            "--every",
            "1",
            "--unit",
            "day",
        ]);
        task["id"].as_str().expect("task id").to_string()
    }
}
