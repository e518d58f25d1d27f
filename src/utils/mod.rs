// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Utility modules for luacheck-review.

pub mod output;
pub mod types;
pub mod walker;

use std::path::{Path, PathBuf};
use std::process::Command;

/// Kind of change selected with `git diff --diff-filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
}

impl ChangeKind {
    fn diff_filter(&self) -> &'static str {
        match self {
            ChangeKind::Added => "--diff-filter=A",
            ChangeKind::Modified => "--diff-filter=M",
        }
    }
}

/// Get the files of one change kind, in git's order.
///
/// With a `base`, compares `base...HEAD` (the merge-base diff a pull request
/// shows); otherwise the staged index against `HEAD`.
pub fn get_changed_files(
    repo: &Path,
    base: Option<&str>,
    kind: ChangeKind,
) -> crate::Result<Vec<String>> {
    let mut args = vec!["diff".to_string(), "--name-only".to_string()];
    args.push(kind.diff_filter().to_string());
    match base {
        Some(base) => args.push(format!("{}...HEAD", base)),
        None => args.push("--cached".to_string()),
    }

    let output = Command::new("git")
        .args(&args)
        .current_dir(repo)
        .output()
        .map_err(crate::ReviewError::Io)?;

    if !output.status.success() {
        return Err(crate::ReviewError::Config(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
}

/// Split `git diff --name-only` output into paths.
fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Run a git query and return its trimmed stdout on success.
fn git_query(repo: &Path, args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get the project root directory (git root or current directory).
pub fn get_project_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_default();
    git_query(&cwd, &["rev-parse", "--show-toplevel"])
        .map(PathBuf::from)
        .unwrap_or(cwd)
}

/// Check if we're in a git repository.
pub fn is_git_repo(dir: &Path) -> bool {
    git_query(dir, &["rev-parse", "--git-dir"]).is_some()
}

/// Commit hash of `HEAD`.
pub fn get_head_commit(repo: &Path) -> Option<String> {
    git_query(repo, &["rev-parse", "HEAD"])
}

/// URL of the `origin` remote.
pub fn get_remote_url(repo: &Path) -> Option<String> {
    git_query(repo, &["remote", "get-url", "origin"])
}
