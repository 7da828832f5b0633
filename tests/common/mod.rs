//! Shared helpers for integration tests that spawn the `imagr-validator`
//! binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use imagr_validator::observability::logging::LOG_LEVEL_ENV;

/// Finished run of the `imagr-validator` binary.
pub struct ValidatorProcess {
    output: Output,
}

impl ValidatorProcess {
    /// Runs the binary with `args` and waits for it to exit.
    ///
    /// Logging is pinned to `warn` so stderr carries only results.
    pub fn spawn_command(args: &[&str]) -> Self {
        let output = Command::new(env!("CARGO_BIN_EXE_imagr-validator"))
            .args(args)
            .env(LOG_LEVEL_ENV, "warn")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to spawn imagr-validator");
        Self { output }
    }

    /// Runs the binary with `args` and an explicit log filter directive.
    pub fn spawn_with_log_level(args: &[&str], directive: &str) -> Self {
        let output = Command::new(env!("CARGO_BIN_EXE_imagr-validator"))
            .args(args)
            .env(LOG_LEVEL_ENV, directive)
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to spawn imagr-validator");
        Self { output }
    }

    /// Runs `validate` against fixture files.
    pub fn validate_fixtures(names: &[&str], extra: &[&str]) -> Self {
        let paths: Vec<String> = names
            .iter()
            .map(|name| fixture_path(name).to_string_lossy().into_owned())
            .collect();
        let mut args = vec!["validate"];
        args.extend(paths.iter().map(String::as_str));
        args.extend_from_slice(extra);
        Self::spawn_command(&args)
    }

    pub fn code(&self) -> i32 {
        self.output.status.code().expect("process was killed by a signal")
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Parses each stdout line as a JSON object.
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
            .collect()
    }
}

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
