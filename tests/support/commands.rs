//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a pipegen command running in the test directory.
    ///
    /// Inherited selector and log variables are cleared and color is off.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("pipegen").expect("failed to find pipegen binary");
        cmd.env_remove("PIPEGEN_ENV");
        cmd.env_remove("PIPEGEN_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run `pipegen --env <env> <args...>`.
    pub fn run(&self, env: &str, args: &[&str]) -> Output {
        self.cmd()
            .args(["--env", env])
            .args(args)
            .output()
            .expect("failed to run pipegen")
    }

    /// Shortcut for `pipegen synth`.
    pub fn synth(&self, env: &str, args: &[&str]) -> Output {
        let mut full = vec!["synth"];
        full.extend_from_slice(args);
        self.run(env, &full)
    }

    /// Shortcut for `pipegen names --json`.
    pub fn names_json(&self, env: &str) -> Output {
        self.run(env, &["names", "--json"])
    }

    /// Shortcut for `pipegen stages <variant>`.
    pub fn stages(&self, env: &str, variant: &str) -> Output {
        self.run(env, &["stages", variant])
    }

    /// Shortcut for `pipegen check`.
    pub fn check(&self, env: &str) -> Output {
        self.run(env, &["check"])
    }

    /// Shortcut for `pipegen envs`.
    pub fn envs(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("envs")
            .args(args)
            .output()
            .expect("failed to run pipegen envs")
    }
}
