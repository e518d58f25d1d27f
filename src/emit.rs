// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Turning findings into review comments.

use crate::host::ReviewHost;
use crate::report::Finding;
use crate::{CommentMode, Limit, RunContext};

/// Outcome of [`send_comments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emitted {
    /// Comments submitted to the host
    pub count: usize,
    /// Whether the limit ended the loop before all findings were examined
    pub limit_reached: bool,
}

/// Submit one comment per finding whose file is among `targets`.
///
/// With a limit, the loop ends as soon as the number of submitted comments
/// reaches it; remaining findings are not examined.
pub fn send_comments(
    host: &mut dyn ReviewHost,
    ctx: &RunContext,
    findings: &[Finding],
    targets: &[String],
    limit: Option<Limit>,
    mode: CommentMode,
) -> Emitted {
    let mut emitted = Emitted::default();

    for finding in findings {
        if !targets.contains(&finding.file) {
            log::debug!("Skipping {}: not a changed file", finding.file);
            continue;
        }

        match mode {
            CommentMode::Aggregate => {
                let message = aggregate_message(&*host, ctx, finding);
                host.fail(&message);
            }
            CommentMode::Inline => match finding.line_number() {
                Some(line) => host.fail_at(&finding.message, &finding.file, line),
                None => host.fail(&finding.message),
            },
        }
        emitted.count += 1;

        if let Some(limit) = limit {
            if emitted.count as u64 >= limit.get() {
                log::info!("Comment limit of {} reached", limit);
                emitted.limit_reached = true;
                break;
            }
        }
    }

    emitted
}

/// `<link>: <message>` for the run-wide comment.
fn aggregate_message(host: &dyn ReviewHost, ctx: &RunContext, finding: &Finding) -> String {
    let target = ctx.service.link_target(&finding.file, &finding.line);
    format!(
        "{}: {}",
        host.html_link(ctx.service, &target),
        finding.message
    )
}
