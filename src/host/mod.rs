// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! The review host seen from the linting core.
//!
//! The host owns the change being reviewed and the way comments reach it.
//! [`git::GitHost`] is the binding used by the command line tool.

pub mod git;

pub use git::GitHost;

use crate::{Result, ReviewError};

/// Operations the core needs from a review host.
pub trait ReviewHost {
    /// Identifier of the active review service (e.g. "github").
    fn scm_provider(&self) -> &str;

    /// Files added by the change, in diff order.
    fn added_files(&self) -> &[String];

    /// Files modified by the change, in diff order.
    fn modified_files(&self) -> &[String];

    /// Render an HTML link to `target` (a path, optionally with a line anchor).
    fn html_link(&self, service: ReviewService, target: &str) -> String;

    /// Submit a failing finding for the whole run.
    fn fail(&mut self, message: &str);

    /// Submit a failing finding anchored at a file and line.
    fn fail_at(&mut self, message: &str, file: &str, line: usize);
}

/// Supported review services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewService {
    GitHub,
    GitLab,
    BitbucketServer,
}

impl ReviewService {
    pub const ALL: [ReviewService; 3] = [
        ReviewService::GitHub,
        ReviewService::GitLab,
        ReviewService::BitbucketServer,
    ];

    /// Parse a service identifier, rejecting anything outside the supported set.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "github" => Ok(ReviewService::GitHub),
            "gitlab" => Ok(ReviewService::GitLab),
            "bitbucket_server" | "bitbucket-server" => Ok(ReviewService::BitbucketServer),
            _ => Err(ReviewError::UnsupportedService(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReviewService::GitHub => "github",
            ReviewService::GitLab => "gitlab",
            ReviewService::BitbucketServer => "bitbucket_server",
        }
    }

    /// What a source link should point at for a finding.
    ///
    /// GitHub understands `#L<line>` anchors; the other services get the
    /// bare path.
    pub fn link_target(&self, file: &str, line: &str) -> String {
        match self {
            ReviewService::GitHub => format!("{}#L{}", file, line),
            ReviewService::GitLab | ReviewService::BitbucketServer => file.to_string(),
        }
    }
}

impl std::fmt::Display for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
