// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Checker trait definition for external linters.

use crate::Result;

/// Trait for implementing checkers (linters) that produce a structured report.
///
/// Each checker implementation should shell out to an external linter over a
/// list of files and return its raw JUnit XML report.
pub trait Checker {
    /// Returns the name of this checker (e.g., "luacheck").
    fn name(&self) -> &str;

    /// File suffix of the sources this checker understands (e.g., ".lua").
    fn extension(&self) -> &str;

    /// Check the given files and return the raw report.
    ///
    /// # Arguments
    /// * `targets` - Paths of the files to check, relative to the working directory
    ///
    /// # Returns
    /// The report text, or an error if the tool could not be run.
    fn check(&self, targets: &[String]) -> Result<String>;

    /// Check if the external linter tool is available.
    fn is_available(&self) -> bool;
}
