//! Include directive scanning.
//!
//! Only local quoted includes (`#include "name.h"`) are collected. System
//! includes (`#include <stdio.h>`) and directives inside comments are ignored.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Bare names (no quotes, no `.h`) included by one file.
pub type IncludeSet = BTreeSet<String>;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));

static LOCAL_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*include\s+"(\w+)\.h""#).expect("valid include regex")
});

/// Collect the local includes of a source text.
pub fn parse_includes(source: &str) -> IncludeSet {
    // Keep line breaks so directives after a comment stay line-anchored.
    let stripped = BLOCK_COMMENT.replace_all(source, |caps: &Captures<'_>| {
        "\n".repeat(caps[0].matches('\n').count())
    });

    stripped
        .lines()
        .filter_map(|line| LOCAL_INCLUDE.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}
