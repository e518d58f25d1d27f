// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Selection of the changed files the checker should look at.

/// Added files followed by modified files, keeping only those ending in
/// `extension`. Order is preserved and duplicates are kept.
pub fn select_targets(added: &[String], modified: &[String], extension: &str) -> Vec<String> {
    added
        .iter()
        .chain(modified.iter())
        .filter(|file| file.ends_with(extension))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_lua_files_in_order() {
        let added = paths(&["b.lua", "README.md", "src/a.lua"]);
        let modified = paths(&["init.lua", "build.gradle"]);

        let targets = select_targets(&added, &modified, ".lua");

        assert_eq!(targets, paths(&["b.lua", "src/a.lua", "init.lua"]));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let added = paths(&["a.lua"]);
        let modified = paths(&["a.lua"]);
        assert_eq!(select_targets(&added, &modified, ".lua").len(), 2);
    }

    #[test]
    fn test_empty_change_set() {
        assert!(select_targets(&[], &[], ".lua").is_empty());
    }

    #[test]
    fn test_extension_must_be_suffix() {
        let added = paths(&["lua/config.json", "a.lua.bak", "x.kt"]);
        assert!(select_targets(&added, &[], ".lua").is_empty());
    }
}
