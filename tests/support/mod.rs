//! Test support utilities for pipegen integration tests.
//!
//! Provides an isolated working directory and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// Child processes run with `.current_dir()` set to the temp dir, so a
/// `pipegen.toml` written here is picked up by discovery and tests can run
/// in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// An empty directory; commands fall back to the built-in registry.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// A directory containing `pipegen.toml` with `contents`.
    pub fn with_registry(contents: &str) -> Self {
        let t = Self::new();
        t.write("pipegen.toml", contents);
        t
    }

    /// Write a file relative to the test directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Path relative to the test directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
