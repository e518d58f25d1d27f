// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! In-memory host and checker used by unit tests.

use crate::checkers::Checker;
use crate::host::{ReviewHost, ReviewService};
use crate::utils::types::Comment;
use crate::Result;
use std::cell::RefCell;

/// luacheck JUnit output with two warnings in one file.
pub const TWO_FAILURES_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="Luacheck report" tests="2" failures="2" errors="0">
    <testcase name="AMClick/src/AMClickResManager.lua" classname="AMClick/src/AMClickResManager.lua">
        <failure type="W211" message="AMClick/src/AMClickResManager.lua:20:7: unused variable 'self'"/>
        <failure type="W113" message="AMClick/src/AMClickResManager.lua:75:5: accessing undefined variable 'foo'"/>
    </testcase>
</testsuite>
"#;

/// Records every submitted failure.
pub struct StubHost {
    pub provider: String,
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub failures: Vec<Comment>,
}

impl StubHost {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            added: Vec::new(),
            modified: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn with_added(mut self, files: &[&str]) -> Self {
        self.added = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_modified(mut self, files: &[&str]) -> Self {
        self.modified = files.iter().map(|f| f.to_string()).collect();
        self
    }
}

impl ReviewHost for StubHost {
    fn scm_provider(&self) -> &str {
        &self.provider
    }

    fn added_files(&self) -> &[String] {
        &self.added
    }

    fn modified_files(&self) -> &[String] {
        &self.modified
    }

    fn html_link(&self, service: ReviewService, target: &str) -> String {
        format!("<a href='{}/{}'>{}</a>", service.name(), target, target)
    }

    fn fail(&mut self, message: &str) {
        self.failures.push(Comment::new(message.to_string()));
    }

    fn fail_at(&mut self, message: &str, file: &str, line: usize) {
        self.failures
            .push(Comment::new(message.to_string()).at(file.to_string(), line));
    }
}

/// Returns a canned report and counts invocations.
pub struct StubChecker {
    available: bool,
    report: String,
    calls: RefCell<Vec<Vec<String>>>,
}

impl StubChecker {
    pub fn with_report(report: &str) -> Self {
        Self {
            available: true,
            report: report.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            report: String::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_targets(&self) -> Vec<String> {
        self.calls.borrow().last().cloned().unwrap_or_default()
    }
}

impl Checker for StubChecker {
    fn name(&self) -> &str {
        "stub"
    }

    fn extension(&self) -> &str {
        ".lua"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn check(&self, targets: &[String]) -> Result<String> {
        self.calls.borrow_mut().push(targets.to_vec());
        Ok(self.report.clone())
    }
}
