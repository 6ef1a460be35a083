//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a fabrix command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - NO_COLOR set and FABRIX_SECRETS_KEY cleared
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("fabrix").expect("failed to find fabrix binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("FABRIX_SECRETS_KEY");
        cmd.env_remove("FABRIX_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run fabrix with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run fabrix")
    }

    /// Shortcut for `fabrix keygen`.
    pub fn keygen(&self) -> Output {
        self.run(&["keygen"])
    }

    /// Shortcut for `fabrix validate <file> --schema <schema>`.
    pub fn validate(&self, file: &str, schema: &str) -> Output {
        self.run(&["validate", file, "--schema", schema])
    }

    /// Shortcut for `fabrix split <descriptor> --out <dir>`.
    pub fn split(&self, descriptor: &str, out: &str) -> Output {
        self.run(&["split", descriptor, "--out", out])
    }

    /// Shortcut for `fabrix merge <dir> --out <file>`.
    pub fn merge(&self, dir: &str, out: &str) -> Output {
        self.run(&["merge", dir, "--out", out])
    }

    /// Shortcut for `fabrix seal <value>`.
    pub fn seal(&self, value: &str) -> Output {
        self.run(&["seal", value])
    }

    /// Shortcut for `fabrix open <sealed>`.
    pub fn open(&self, sealed: &str) -> Output {
        self.run(&["open", sealed])
    }

    /// Shortcut for `fabrix diff <old> <new>`.
    pub fn diff(&self, old: &str, new: &str) -> Output {
        self.run(&["diff", old, new])
    }
}
