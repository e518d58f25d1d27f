// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! File system walker for locating pre-generated report files.

use crate::{Result, ReviewError};
use globset::GlobBuilder;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether a path component contains glob syntax.
fn has_glob_meta(component: &str) -> bool {
    component.contains(|c| matches!(c, '*' | '?' | '[' | '{'))
}

/// Longest leading part of `pattern` without glob syntax.
///
/// The last component is always treated as the file pattern, so
/// `reports/a.xml` walks `reports` and `/ci/*.xml` walks `/ci`.
fn literal_base(pattern: &str) -> PathBuf {
    let components: Vec<_> = Path::new(pattern).components().collect();
    let mut base = PathBuf::new();

    for component in components.iter().take(components.len().saturating_sub(1)) {
        if has_glob_meta(&component.as_os_str().to_string_lossy()) {
            break;
        }
        base.push(component.as_os_str());
    }
    base
}

/// Return every file matching `pattern`, sorted.
///
/// Relative patterns are matched against paths relative to `root`, absolute
/// patterns against absolute paths. The walk starts at the pattern's literal
/// prefix so absolute patterns may point outside `root`. `*` does not cross
/// directory separators; use `**` for that. An invalid pattern is a
/// configuration error.
pub fn find_report_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| {
            ReviewError::Config(format!("Invalid report_files_pattern '{}': {}", pattern, e))
        })?
        .compile_matcher();

    let absolute = Path::new(pattern).is_absolute();
    let base = literal_base(pattern);
    let start = if absolute { base } else { root.join(base) };
    if !start.exists() {
        log::debug!("Pattern '{}': {} does not exist", pattern, start.display());
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&start)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            if absolute {
                matcher.is_match(e.path())
            } else {
                matcher.is_match(e.path().strip_prefix(root).unwrap_or(e.path()))
            }
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    log::debug!("Pattern '{}' matched {} report(s)", pattern, files.len());
    Ok(files)
}
