// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Core types for run results and submitted comments.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A failing comment submitted to a review host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment body
    pub message: String,
    /// File the comment is anchored to (inline comments only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line the comment is anchored to (1-indexed, inline comments only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Comment {
    pub fn new(message: String) -> Self {
        Self {
            message,
            file: None,
            line: None,
        }
    }

    pub fn at(mut self, file: String, line: usize) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    pub fn is_inline(&self) -> bool {
        self.file.is_some()
    }
}

/// Summary of a lint run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Number of changed files handed to the checker
    pub targets: usize,
    /// Number of findings parsed from the reports
    pub findings: usize,
    /// Number of failing comments submitted to the host
    pub comments_posted: usize,
    /// Whether the comment limit cut the run short
    pub limit_reached: bool,
    /// Whether the checker executable was missing
    pub tool_missing: bool,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    /// Exit code: 0 = no comments, 1 = comments posted, 2 = error
    pub exit_code: i32,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate exit code based on results
    pub fn calculate_exit_code(&mut self) {
        self.exit_code = if self.comments_posted > 0 { 1 } else { 0 };
    }

    /// Record the elapsed time and final exit code.
    pub fn finish(&mut self, start: Instant) {
        self.duration_ms = start.elapsed().as_millis() as u64;
        self.calculate_exit_code();
    }
}
