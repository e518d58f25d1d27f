// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Output formatting utilities for submitted comments.

use crate::utils::types::{Comment, RunResult};
use colored::Colorize;
use serde::Serialize;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    GithubActions,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            "github-actions" | "github" | "ga" => Some(OutputFormat::GithubActions),
            _ => None,
        }
    }
}

/// Format a single comment for human-readable output.
pub fn format_comment_human(comment: &Comment) -> String {
    match (&comment.file, comment.line) {
        (Some(file), Some(line)) => format!(
            "{}: {}: {}",
            format!("{}:{}", file, line).bold(),
            "error".red().bold(),
            comment.message
        ),
        _ => format!("{}: {}", "error".red().bold(), comment.message),
    }
}

/// Escape data for a GitHub Actions workflow command.
fn escape_workflow_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Format a single comment for GitHub Actions output.
pub fn format_comment_github_actions(comment: &Comment) -> String {
    let message = escape_workflow_data(&comment.message);
    match (&comment.file, comment.line) {
        (Some(file), Some(line)) => format!("::error file={},line={}::{}", file, line, message),
        _ => format!("::error::{}", message),
    }
}

/// Format the run summary for human-readable output.
pub fn format_summary_human(result: &RunResult) -> String {
    if result.comments_posted == 0 {
        return format!(
            "{} ({} file{} checked)",
            "No luacheck issues".green().bold(),
            result.targets,
            if result.targets == 1 { "" } else { "s" }
        );
    }

    let mut summary = format!(
        "{} {} comment{} posted for {} finding{} in {} changed file{}",
        "✗".red(),
        result.comments_posted,
        if result.comments_posted == 1 { "" } else { "s" },
        result.findings,
        if result.findings == 1 { "" } else { "s" },
        result.targets,
        if result.targets == 1 { "" } else { "s" }
    );

    if result.limit_reached {
        summary.push_str(&format!("\n{} comment limit reached", "!".yellow()));
    }

    let duration_str = if result.duration_ms >= 1000 {
        format!("{:.2}s", result.duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", result.duration_ms)
    };
    summary.push_str(&format!("\nDone in {}", duration_str.cyan()));

    summary
}

/// Format every comment plus the summary for human-readable output.
pub fn format_result_human(comments: &[Comment], result: &RunResult) -> String {
    let mut output = String::new();

    for (idx, comment) in comments.iter().enumerate() {
        output.push_str(&format!(
            "{} {}",
            format!("[E{}]", idx + 1).red().bold(),
            format_comment_human(comment)
        ));
        output.push('\n');
    }

    if !comments.is_empty() {
        output.push('\n');
    }

    output.push_str(&format_summary_human(result));

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    comments: &'a [Comment],
    summary: &'a RunResult,
}

/// Format comments and summary as JSON.
pub fn format_result_json(comments: &[Comment], result: &RunResult) -> String {
    let report = JsonReport {
        comments,
        summary: result,
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

/// Format comments as GitHub Actions workflow commands.
pub fn format_result_github_actions(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(format_comment_github_actions)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format result according to the specified output format.
pub fn format_result(comments: &[Comment], result: &RunResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_result_human(comments, result),
        OutputFormat::Json => format_result_json(comments, result),
        OutputFormat::GithubActions => format_result_github_actions(comments),
    }
}
