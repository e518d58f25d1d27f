// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Review host backed by the local git checkout.
//!
//! Changed files come from `git diff`, links point at the `origin` remote's
//! web UI for the `HEAD` commit, and submitted comments are collected so the
//! command line can print them.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

use super::{ReviewHost, ReviewService};
use crate::utils::types::Comment;
use crate::utils::{self, ChangeKind};

/// Options for [`GitHost::discover`].
#[derive(Debug, Clone, Default)]
pub struct GitHostOptions {
    /// Review service identifier; detected from the CI environment or remote when unset
    pub service: Option<String>,
    /// Base ref of the change; the staged index is used when unset
    pub base: Option<String>,
    /// Web URL of the repository; derived from the `origin` remote when unset
    pub repo_url: Option<String>,
}

/// A [`ReviewHost`] over a local git repository.
#[derive(Debug, Clone)]
pub struct GitHost {
    provider: String,
    repo: PathBuf,
    added: Vec<String>,
    modified: Vec<String>,
    web_url: Option<String>,
    commit: Option<String>,
    comments: Vec<Comment>,
}

impl GitHost {
    /// Inspect the repository containing `repo` and collect the change.
    pub fn discover(repo: &Path, options: &GitHostOptions) -> Result<Self> {
        if !utils::is_git_repo(repo) {
            bail!("{} is not inside a git repository", repo.display());
        }

        let remote = utils::get_remote_url(repo);
        let provider = match &options.service {
            Some(service) => service.clone(),
            None => detect_provider(|key| std::env::var(key).ok(), remote.as_deref())
                .context("Cannot detect the review service, pass --service")?
                .to_string(),
        };

        let base = options.base.as_deref();
        let added = utils::get_changed_files(repo, base, ChangeKind::Added)
            .context("Failed to list added files")?;
        let modified = utils::get_changed_files(repo, base, ChangeKind::Modified)
            .context("Failed to list modified files")?;
        log::debug!(
            "{} added and {} modified file(s) against {}",
            added.len(),
            modified.len(),
            base.unwrap_or("the index")
        );

        let web_url = options
            .repo_url
            .as_ref()
            .map(|url| url.trim_end_matches('/').to_string())
            .or_else(|| remote.as_deref().and_then(web_url_from_remote));

        Ok(Self {
            provider,
            repo: repo.to_path_buf(),
            added,
            modified,
            web_url,
            commit: utils::get_head_commit(repo),
            comments: Vec::new(),
        })
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Comments submitted so far, in submission order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }
}

impl ReviewHost for GitHost {
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
        match (&self.web_url, &self.commit) {
            (Some(web), Some(commit)) => {
                let href = blob_url(service, web, commit, target);
                format!("<a href='{}'>{}</a>", href, target)
            }
            _ => target.to_string(),
        }
    }

    fn fail(&mut self, message: &str) {
        self.comments.push(Comment::new(message.to_string()));
    }

    fn fail_at(&mut self, message: &str, file: &str, line: usize) {
        self.comments
            .push(Comment::new(message.to_string()).at(file.to_string(), line));
    }
}

/// Guess the review service from CI variables, then from the remote host.
fn detect_provider<F>(env: F, remote: Option<&str>) -> Option<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    if env("GITHUB_ACTIONS").is_some() {
        return Some("github");
    }
    if env("GITLAB_CI").is_some() {
        return Some("gitlab");
    }

    let remote = remote?.to_lowercase();
    if remote.contains("github") {
        Some("github")
    } else if remote.contains("gitlab") {
        Some("gitlab")
    } else if remote.contains("bitbucket") {
        Some("bitbucket_server")
    } else {
        None
    }
}

/// Turn an https or ssh remote into the repository's https web URL.
fn web_url_from_remote(remote: &str) -> Option<String> {
    let re = Regex::new(
        r"^(?:(?:https?|ssh|git)://)?(?:[^@/]+@)?([^/:]+)(?::\d+)?[:/](.+?)(?:\.git)?/?$",
    )
    .ok()?;
    let caps = re.captures(remote.trim())?;
    Some(format!("https://{}/{}", &caps[1], &caps[2]))
}

/// Source view URL of `target` at `commit` for each service.
fn blob_url(service: ReviewService, web: &str, commit: &str, target: &str) -> String {
    match service {
        ReviewService::GitHub => format!("{}/blob/{}/{}", web, commit, target),
        ReviewService::GitLab => format!("{}/-/blob/{}/{}", web, commit, target),
        ReviewService::BitbucketServer => format!("{}/browse/{}?at={}", web, target, commit),
    }
}
