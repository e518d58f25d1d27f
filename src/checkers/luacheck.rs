// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Lua checker using luacheck.
//!
//! luacheck exits with status 1 when it reports warnings and 2 when it
//! reports errors, so only an empty report combined with a failing status is
//! treated as a broken invocation.

use crate::checkers::Checker;
use crate::{Result, ReviewError};
use std::process::Command;

/// Lua checker using luacheck's JUnit formatter.
pub struct LuacheckChecker {
    executable: String,
}

impl LuacheckChecker {
    pub fn new() -> Self {
        Self {
            executable: "luacheck".to_string(),
        }
    }

    /// Use a different executable name or path.
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Command line arguments for a run over `targets`.
    fn args(&self, targets: &[String]) -> Vec<String> {
        let mut args = targets.to_vec();
        args.push("--formatter".to_string());
        args.push("JUnit".to_string());
        args
    }
}

impl Default for LuacheckChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for LuacheckChecker {
    fn name(&self) -> &str {
        "luacheck"
    }

    fn extension(&self) -> &str {
        ".lua"
    }

    fn check(&self, targets: &[String]) -> Result<String> {
        log::debug!("Running {} on {} file(s)", self.executable, targets.len());

        let output = Command::new(&self.executable)
            .args(self.args(targets))
            .output()
            .map_err(|e| ReviewError::Checker(format!("Failed to run luacheck: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReviewError::Checker(format!(
                "luacheck exited with {} and no report: {}",
                output.status,
                stderr.trim()
            )));
        }

        log::debug!("luacheck exited with {}", output.status);
        Ok(stdout)
    }

    fn is_available(&self) -> bool {
        which::which(&self.executable).is_ok()
    }
}
