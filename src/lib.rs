// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! luacheck-review - run luacheck on the changed files of a pull request and
//! report the findings as review comments.
//!
//! The review host (diff information, comment posting, link rendering) is
//! reached only through the [`ReviewHost`] trait. [`lint`] drives one run:
//! select targets, invoke the checker, parse its JUnit report and submit
//! comments.

pub mod checkers;
pub mod config;
pub mod emit;
pub mod host;
pub mod report;
pub mod targets;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use checkers::Checker;
use emit::send_comments;
use report::parse_junit_report;
use targets::select_targets;
use utils::walker::find_report_files;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Unsupported service '{0}'. Currently supported services are GitHub, GitLab and Bitbucket Server."
    )]
    UnsupportedService(String),

    #[error("Checker error: {0}")]
    Checker(String),

    #[error("Report error: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Message submitted when the luacheck executable cannot be found.
pub const TOOL_NOT_FOUND_MESSAGE: &str = "Couldn't find luacheck command. Install first.";

/// Message submitted in skip-lint mode when no report file is usable.
pub const REPORT_NOT_FOUND_MESSAGE: &str = "Couldn't find luacheck report file.\n\
     You must specify it with `report_file` or `report_files_pattern` in your configuration.";

/// Maximum number of comments a run may submit.
///
/// Only non-negative integers are accepted; anything else is rejected with
/// [`ReviewError::Config`] at the point of assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "serde_json::Value", into = "u64")]
pub struct Limit(u64);

impl Limit {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    fn invalid(shown: impl std::fmt::Display) -> ReviewError {
        ReviewError::Config(format!(
            "limit must be a non-negative integer, got {}",
            shown
        ))
    }
}

impl From<Limit> for u64 {
    fn from(limit: Limit) -> Self {
        limit.0
    }
}

impl TryFrom<i64> for Limit {
    type Error = ReviewError;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Limit)
            .map_err(|_| Limit::invalid(value))
    }
}

impl TryFrom<serde_json::Value> for Limit {
    type Error = ReviewError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value.as_u64() {
            Some(n) => Ok(Limit(n)),
            None => Err(Limit::invalid(value)),
        }
    }
}

impl std::str::FromStr for Limit {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Limit)
            .map_err(|_| Limit::invalid(format!("'{}'", s)))
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How findings are submitted to the review host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMode {
    /// One failing entry per finding in the run-wide comment, with a source link.
    #[default]
    Aggregate,
    /// One failing entry per finding anchored at its file and line.
    Inline,
}

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Read pre-generated reports instead of running luacheck
    pub skip_lint: bool,
    /// Pre-generated report used in skip-lint mode
    pub report_file: Option<PathBuf>,
    /// Glob for several pre-generated reports used in skip-lint mode
    pub report_files_pattern: Option<String>,
    /// Maximum number of comments to submit
    pub limit: Option<Limit>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the comment limit from a dynamically typed value.
    ///
    /// Fails with [`ReviewError::Config`] unless the value is a non-negative
    /// integer. The previous limit is kept on failure.
    pub fn set_limit<V>(&mut self, value: V) -> Result<()>
    where
        V: TryInto<Limit, Error = ReviewError>,
    {
        self.limit = Some(value.try_into()?);
        Ok(())
    }
}

/// Values resolved once when a run starts and passed down the pipeline.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub service: host::ReviewService,
    pub working_dir: PathBuf,
}

impl RunContext {
    /// Resolve the review service and capture the current directory.
    pub fn detect(scm_provider: &str) -> Result<Self> {
        let service = host::ReviewService::from_name(scm_provider)?;
        let working_dir = std::env::current_dir()?;
        Ok(Self {
            service,
            working_dir,
        })
    }
}

/// Run luacheck over the changed files and submit the findings to `host`.
///
/// Fails only on configuration problems (unsupported service, bad glob) or
/// IO errors reading report files. A missing luacheck executable is reported
/// to the host as a failing comment and the run still returns `Ok`.
pub fn lint(
    host: &mut dyn host::ReviewHost,
    checker: &dyn Checker,
    config: &RunConfig,
    mode: CommentMode,
) -> Result<utils::types::RunResult> {
    let ctx = RunContext::detect(host.scm_provider())?;
    lint_with_context(host, checker, config, mode, &ctx)
}

/// Same as [`lint`] with an already resolved [`RunContext`].
pub fn lint_with_context(
    host: &mut dyn host::ReviewHost,
    checker: &dyn Checker,
    config: &RunConfig,
    mode: CommentMode,
    ctx: &RunContext,
) -> Result<utils::types::RunResult> {
    let start = Instant::now();
    let mut result = utils::types::RunResult::new();

    let targets = select_targets(
        host.added_files(),
        host.modified_files(),
        checker.extension(),
    );
    log::debug!("{} target file(s): {:?}", targets.len(), targets);
    result.targets = targets.len();

    let reports = match collect_reports(host, checker, config, &targets, ctx, &mut result)? {
        Some(reports) => reports,
        None => {
            result.finish(start);
            return Ok(result);
        }
    };

    let findings: Vec<_> = reports
        .iter()
        .flat_map(|report| parse_junit_report(report))
        .map(|finding| finding.relative_to(&ctx.working_dir))
        .collect();
    result.findings = findings.len();
    log::info!("{} parsed {} finding(s)", checker.name(), findings.len());

    if !findings.is_empty() {
        let emitted = send_comments(host, ctx, &findings, &targets, config.limit, mode);
        result.comments_posted = emitted.count;
        result.limit_reached = emitted.limit_reached;
    }

    result.finish(start);
    Ok(result)
}

/// Produce the raw reports for this run, or `None` when there is nothing to do.
fn collect_reports(
    host: &mut dyn host::ReviewHost,
    checker: &dyn Checker,
    config: &RunConfig,
    targets: &[String],
    ctx: &RunContext,
    result: &mut utils::types::RunResult,
) -> Result<Option<Vec<String>>> {
    if config.skip_lint {
        let files = report_files(config, &ctx.working_dir)?;
        if files.is_empty() {
            log::warn!("skip-lint mode without a usable report file");
            host.fail(REPORT_NOT_FOUND_MESSAGE);
            result.comments_posted += 1;
            return Ok(None);
        }
        let mut reports = Vec::with_capacity(files.len());
        for file in &files {
            log::debug!("Reading report {}", file.display());
            reports.push(std::fs::read_to_string(file)?);
        }
        return Ok(Some(reports));
    }

    if targets.is_empty() {
        log::info!("No changed {} files, skipping {}", checker.extension(), checker.name());
        return Ok(None);
    }

    if !checker.is_available() {
        log::warn!("{} executable not found", checker.name());
        host.fail(TOOL_NOT_FOUND_MESSAGE);
        result.tool_missing = true;
        result.comments_posted += 1;
        return Ok(None);
    }

    Ok(Some(vec![checker.check(targets)?]))
}

/// Resolve the report files for skip-lint mode.
///
/// An existing `report_file` wins; otherwise `report_files_pattern` is
/// matched under `root`. Empty strings count as unset.
fn report_files(config: &RunConfig, root: &Path) -> Result<Vec<PathBuf>> {
    if let Some(file) = config
        .report_file
        .as_ref()
        .filter(|f| !f.as_os_str().is_empty())
    {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            root.join(file)
        };
        if path.is_file() {
            return Ok(vec![path]);
        }
        log::debug!("report_file {} does not exist", path.display());
    }

    match config
        .report_files_pattern
        .as_deref()
        .filter(|p| !p.is_empty())
    {
        Some(pattern) => find_report_files(root, pattern),
        None => Ok(Vec::new()),
    }
}

// Re-export commonly used types
pub use host::{ReviewHost, ReviewService};
pub use report::Finding;
pub use utils::types::{Comment, RunResult};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubChecker, StubHost, TWO_FAILURES_REPORT};
    use serde_json::json;

    fn ctx(service: ReviewService) -> RunContext {
        RunContext {
            service,
            working_dir: PathBuf::from("/work/repo"),
        }
    }

    fn lua_host() -> StubHost {
        StubHost::new("github").with_added(&["AMClick/src/AMClickResManager.lua"])
    }

    // ==================== Limit tests ====================

    #[test]
    fn test_set_limit_accepts_integers() {
        let mut config = RunConfig::new();
        config.set_limit(json!(0)).unwrap();
        assert_eq!(config.limit, Some(Limit::new(0)));

        config.set_limit(5i64).unwrap();
        assert_eq!(config.limit, Some(Limit::new(5)));
    }

    #[test]
    fn test_set_limit_rejects_non_integers() {
        let mut config = RunConfig::new();
        for value in [json!("3"), json!(1.5), json!(null), json!(true), json!([1])] {
            let err = config.set_limit(value).unwrap_err();
            assert!(matches!(err, ReviewError::Config(_)));
        }
        assert!(config.set_limit(-1i64).is_err());
        assert_eq!(config.limit, None);
    }

    #[test]
    fn test_limit_from_str() {
        assert_eq!("7".parse::<Limit>().unwrap(), Limit::new(7));
        assert!("seven".parse::<Limit>().is_err());
        assert!("-2".parse::<Limit>().is_err());
    }

    // ==================== lint tests ====================

    #[test]
    fn test_unsupported_service_fails_before_work() {
        let mut host = StubHost::new("bitbucket_cloud").with_added(&["a.lua"]);
        let checker = StubChecker::with_report(TWO_FAILURES_REPORT);

        let err = lint(&mut host, &checker, &RunConfig::new(), CommentMode::Aggregate)
            .unwrap_err();

        assert!(matches!(err, ReviewError::UnsupportedService(_)));
        assert!(host.failures.is_empty());
        assert_eq!(checker.invocations(), 0);
    }

    #[test]
    fn test_empty_targets_runs_nothing() {
        let mut host = StubHost::new("github").with_added(&["README.md", "src/main.kt"]);
        let checker = StubChecker::with_report(TWO_FAILURES_REPORT);

        let result = lint_with_context(
            &mut host,
            &checker,
            &RunConfig::new(),
            CommentMode::Aggregate,
            &ctx(ReviewService::GitHub),
        )
        .unwrap();

        assert_eq!(result.targets, 0);
        assert_eq!(checker.invocations(), 0);
        assert!(host.failures.is_empty());
    }

    #[test]
    fn test_missing_tool_posts_single_failure() {
        let mut host = lua_host();
        let checker = StubChecker::unavailable();

        let result = lint_with_context(
            &mut host,
            &checker,
            &RunConfig::new(),
            CommentMode::Aggregate,
            &ctx(ReviewService::GitHub),
        )
        .unwrap();

        assert!(result.tool_missing);
        assert_eq!(checker.invocations(), 0);
        assert_eq!(host.failures.len(), 1);
        assert_eq!(host.failures[0].message, TOOL_NOT_FOUND_MESSAGE);
        assert!(host.failures[0].file.is_none());
    }

    #[test]
    fn test_aggregate_mode_posts_linked_messages() {
        let mut host = lua_host();
        let checker = StubChecker::with_report(TWO_FAILURES_REPORT);

        let result = lint_with_context(
            &mut host,
            &checker,
            &RunConfig::new(),
            CommentMode::Aggregate,
            &ctx(ReviewService::GitHub),
        )
        .unwrap();

        assert_eq!(checker.invocations(), 1);
        assert_eq!(checker.last_targets(), vec!["AMClick/src/AMClickResManager.lua"]);
        assert_eq!(result.findings, 2);
        assert_eq!(result.comments_posted, 2);
        assert_eq!(host.failures.len(), 2);
        assert!(host.failures[0]
            .message
            .contains("AMClick/src/AMClickResManager.lua#L20"));
        assert!(host.failures[1]
            .message
            .contains("AMClick/src/AMClickResManager.lua#L75"));
        assert!(host.failures.iter().all(|c| c.file.is_none()));
    }

    #[test]
    fn test_inline_mode_anchors_comments() {
        let mut host = lua_host();
        let checker = StubChecker::with_report(TWO_FAILURES_REPORT);

        lint_with_context(
            &mut host,
            &checker,
            &RunConfig::new(),
            CommentMode::Inline,
            &ctx(ReviewService::GitLab),
        )
        .unwrap();

        assert_eq!(host.failures.len(), 2);
        assert_eq!(
            host.failures[0].file.as_deref(),
            Some("AMClick/src/AMClickResManager.lua")
        );
        assert_eq!(host.failures[0].line, Some(20));
        assert_eq!(host.failures[1].line, Some(75));
    }

    #[test]
    fn test_limit_stops_early_in_both_modes() {
        for mode in [CommentMode::Aggregate, CommentMode::Inline] {
            let mut host = lua_host();
            let checker = StubChecker::with_report(TWO_FAILURES_REPORT);
            let mut config = RunConfig::new();
            config.set_limit(1i64).unwrap();

            let result = lint_with_context(
                &mut host,
                &checker,
                &config,
                mode,
                &ctx(ReviewService::GitHub),
            )
            .unwrap();

            assert_eq!(host.failures.len(), 1);
            assert!(result.limit_reached);
        }
    }

    #[test]
    fn test_absolute_report_paths_are_made_relative() {
        let report = r#"<testsuite>
  <testcase name="/work/repo/src/a.lua">
    <failure type="W211" message="/work/repo/src/a.lua:3:7: unused variable 'x'"/>
  </testcase>
</testsuite>"#;
        let mut host = StubHost::new("gitlab").with_modified(&["src/a.lua"]);
        let checker = StubChecker::with_report(report);

        lint_with_context(
            &mut host,
            &checker,
            &RunConfig::new(),
            CommentMode::Inline,
            &ctx(ReviewService::GitLab),
        )
        .unwrap();

        assert_eq!(host.failures.len(), 1);
        assert_eq!(host.failures[0].file.as_deref(), Some("src/a.lua"));
    }

    // ==================== skip-lint tests ====================

    #[test]
    fn test_skip_lint_reads_report_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("luacheck.xml"), TWO_FAILURES_REPORT).unwrap();

        let mut host = lua_host();
        let checker = StubChecker::unavailable();
        let config = RunConfig {
            skip_lint: true,
            report_file: Some(PathBuf::from("luacheck.xml")),
            ..Default::default()
        };
        let ctx = RunContext {
            service: ReviewService::GitHub,
            working_dir: dir.path().to_path_buf(),
        };

        let result =
            lint_with_context(&mut host, &checker, &config, CommentMode::Inline, &ctx).unwrap();

        assert_eq!(checker.invocations(), 0);
        assert_eq!(result.comments_posted, 2);
    }

    #[test]
    fn test_skip_lint_falls_back_to_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("reports")).unwrap();
        std::fs::write(dir.path().join("reports/one.xml"), TWO_FAILURES_REPORT).unwrap();
        std::fs::write(dir.path().join("reports/two.xml"), TWO_FAILURES_REPORT).unwrap();
        std::fs::write(dir.path().join("reports/notes.txt"), "ignored").unwrap();

        let mut host = lua_host();
        let checker = StubChecker::unavailable();
        let config = RunConfig {
            skip_lint: true,
            report_file: Some(PathBuf::from("missing.xml")),
            report_files_pattern: Some("reports/*.xml".to_string()),
            ..Default::default()
        };
        let ctx = RunContext {
            service: ReviewService::BitbucketServer,
            working_dir: dir.path().to_path_buf(),
        };

        let result =
            lint_with_context(&mut host, &checker, &config, CommentMode::Aggregate, &ctx)
                .unwrap();

        assert_eq!(result.findings, 4);
        assert_eq!(host.failures.len(), 4);
    }

    #[test]
    fn test_skip_lint_without_reports_posts_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = lua_host();
        let checker = StubChecker::unavailable();
        let config = RunConfig {
            skip_lint: true,
            ..Default::default()
        };
        let ctx = RunContext {
            service: ReviewService::GitHub,
            working_dir: dir.path().to_path_buf(),
        };

        lint_with_context(&mut host, &checker, &config, CommentMode::Aggregate, &ctx).unwrap();

        assert_eq!(host.failures.len(), 1);
        assert_eq!(host.failures[0].message, REPORT_NOT_FOUND_MESSAGE);
    }
}
