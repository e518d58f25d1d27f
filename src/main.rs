// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! luacheck-review CLI - lint the Lua files of a change and report review comments.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use luacheck_review::checkers::LuacheckChecker;
use luacheck_review::config::Config;
use luacheck_review::host::git::{GitHost, GitHostOptions};
use luacheck_review::utils::output::{format_result, OutputFormat};
use luacheck_review::{lint, utils, CommentMode, Limit};

#[derive(Parser, Debug)]
#[command(name = "luacheck-review")]
#[command(
    author,
    version,
    about = "Run luacheck on the Lua files of a change and report findings as review comments"
)]
struct Cli {
    /// Review service: github, gitlab or bitbucket_server (detected when omitted)
    #[arg(long)]
    service: Option<String>,

    /// Post one comment per finding anchored at its file and line
    #[arg(long)]
    inline: bool,

    /// Maximum number of comments to post
    #[arg(long, value_name = "N")]
    limit: Option<Limit>,

    /// Read pre-generated JUnit reports instead of running luacheck
    #[arg(long)]
    skip_lint: bool,

    /// Pre-generated report (with --skip-lint)
    #[arg(long, value_name = "FILE")]
    report_file: Option<PathBuf>,

    /// Glob matching pre-generated reports (with --skip-lint)
    /// Example: --report-files-pattern 'build/luacheck/*.xml'
    #[arg(long, value_name = "GLOB")]
    report_files_pattern: Option<String>,

    /// Base ref of the change (compares BASE...HEAD); staged files when omitted
    #[arg(long, value_name = "REF")]
    base: Option<String>,

    /// luacheck executable name or path
    #[arg(long, value_name = "PATH")]
    luacheck: Option<String>,

    /// Repository web URL used for source links (derived from origin when omitted)
    #[arg(long, value_name = "URL")]
    repo_url: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: human, json, github-actions
    #[arg(short, long, default_value = "human")]
    output: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Settings given on the command line, as the highest config layer.
    fn to_config(&self) -> Config {
        Config {
            service: self.service.clone(),
            inline_mode: self.inline.then_some(true),
            limit: self.limit,
            skip_lint: self.skip_lint.then_some(true),
            report_file: self.report_file.clone(),
            report_files_pattern: self.report_files_pattern.clone(),
            base: self.base.clone(),
            executable: self.luacheck.clone(),
            repo_url: self.repo_url.clone(),
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::parse(&cli.output)
        .with_context(|| format!("Unknown output format '{}'", cli.output))?;

    let project_root = utils::get_project_root();
    std::env::set_current_dir(&project_root)
        .with_context(|| format!("Cannot enter {}", project_root.display()))?;

    let mut config = Config::load_merged(&project_root, cli.config.as_deref())?;
    config.merge(cli.to_config());
    log::debug!("Effective configuration: {:?}", config);

    let options = GitHostOptions {
        service: config.service.clone(),
        base: config.base.clone(),
        repo_url: config.repo_url.clone(),
    };
    let mut host = GitHost::discover(&project_root, &options)?;

    let checker = match &config.executable {
        Some(executable) => LuacheckChecker::with_executable(executable.clone()),
        None => LuacheckChecker::new(),
    };
    let mode = if config.inline_mode.unwrap_or(false) {
        CommentMode::Inline
    } else {
        CommentMode::Aggregate
    };

    let result = lint(&mut host, &checker, &config.to_run_config(), mode)?;

    let rendered = format_result(host.comments(), &result, format);
    if !rendered.is_empty() {
        println!("{}", rendered);
    }

    Ok(ExitCode::from(result.exit_code as u8))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(2)
        }
    }
}
