// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Parser for luacheck's JUnit report.
//!
//! Every `failure` element carries a `message` attribute shaped like
//! `path:line:column: description`, for example:
//!
//! ```xml
//! <testcase name="src/a.lua" classname="src/a.lua">
//!     <failure type="W211" message="src/a.lua:1:7: unused variable 'x'"/>
//! </testcase>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::path::Path;

/// A single issue reported by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Path as written in the report
    pub file: String,
    /// Line token as written in the report (not validated)
    pub line: String,
    /// Column number, when the report has one
    pub column: Option<usize>,
    /// Warning code from the `type` attribute (e.g. "W211")
    pub code: Option<String>,
    /// Human-readable description
    pub message: String,
}

impl Finding {
    /// Build a finding from a `path:line[:rest]` message.
    ///
    /// Returns `None` when the message has fewer than two colon separated
    /// segments or either of them is empty.
    pub fn from_message(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, ':');
        let file = parts.next()?.trim();
        let line = parts.next()?.trim();
        if file.is_empty() || line.is_empty() {
            return None;
        }

        let rest = parts.next().unwrap_or("");
        let (column, message) = match rest.split_once(':') {
            Some((col, tail)) => match col.trim().parse::<usize>() {
                Ok(col) => (Some(col), tail.trim()),
                Err(_) => (None, rest.trim()),
            },
            None => (None, rest.trim()),
        };

        Some(Self {
            file: file.to_string(),
            line: line.to_string(),
            column,
            code: None,
            message: message.to_string(),
        })
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// The line as a 1-based number, if the token is one.
    pub fn line_number(&self) -> Option<usize> {
        self.line.parse::<usize>().ok().filter(|n| *n >= 1)
    }

    /// Strip a leading `dir/` so the path compares against changed files.
    pub fn relative_to(mut self, dir: &Path) -> Self {
        let prefix = format!("{}/", dir.display());
        if let Some(stripped) = self.file.strip_prefix(&prefix) {
            self.file = stripped.to_string();
        }
        self
    }
}

/// Extract every well-formed `failure` entry of a JUnit report, in order.
///
/// Malformed entries are dropped. A syntax error ends parsing and the
/// findings collected so far are returned.
pub fn parse_junit_report(xml: &str) -> Vec<Finding> {
    let mut reader = Reader::from_str(xml);
    let mut findings = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"failure" =>
            {
                if let Some(finding) = finding_from_failure(e) {
                    findings.push(finding);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!(
                    "Stopped reading luacheck report at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    findings
}

fn finding_from_failure(element: &BytesStart) -> Option<Finding> {
    let mut message = None;
    let mut code = None;

    for attr in element.attributes().flatten() {
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => continue,
        };
        match attr.key.as_ref() {
            b"message" => message = Some(value),
            b"type" => code = Some(value),
            _ => {}
        }
    }

    Finding::from_message(&message?).map(|f| f.with_code(code))
}
