//! Shared testing utilities for ballot-dapp CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Write a configuration file and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.root().join("ballot-dapp.toml");
        fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Build a command for invoking the compiled `ballot-dapp` binary.
    pub fn cli(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("ballot-dapp").expect("Failed to locate ballot-dapp binary");
        cmd.current_dir(self.root()).env_remove("ROLLUP_HTTP_SERVER_URL").env("RUST_LOG", "warn");
        cmd
    }
}
