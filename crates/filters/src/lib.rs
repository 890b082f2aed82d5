#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` decides which relative paths are excluded from a comparison.
//! Rules use a small shell-like grammar with three wildcards: `.` matches a
//! literal dot, `?` matches a single character other than `/`, and `*`
//! matches any run of characters other than `/`. A rule starting with `/` is
//! anchored at the root of the walk; any other rule matches at every
//! directory depth. Other regex metacharacters pass through to the engine
//! untouched, so users who need them escape them themselves.
//!
//! # Design
//!
//! All rules compile into a single anchored alternation so matching a path is
//! one regex test regardless of how many rules were supplied. A path is
//! ignored when at least one rule matches it end-to-end.
//!
//! # Errors
//!
//! [`IgnoreFilter::new`] reports [`IgnoreError`] when a rule expands to an
//! invalid expression or when no rules are supplied at all; both are
//! configuration errors the caller treats as fatal.
//!
//! # Examples
//!
//! ```
//! use filters::IgnoreFilter;
//!
//! let filter = IgnoreFilter::new(["*.log", "/cache"]).expect("rules compile");
//! assert!(filter.is_ignored("build/output.log"));
//! assert!(filter.is_ignored("cache"));
//! assert!(!filter.is_ignored("src/cache"));
//! ```

use regex::Regex;
use thiserror::Error;

/// Error produced when an ignore filter cannot be built.
#[derive(Debug, Error)]
pub enum IgnoreError {
    /// The unified expression failed to compile.
    #[error("failed to compile ignore rules: {0}")]
    Compile(#[from] regex::Error),
    /// No rules were supplied; an empty filter has nothing to match.
    #[error("no ignore rules supplied")]
    Empty,
}

/// Compiled set of ignore rules.
#[derive(Clone, Debug)]
pub struct IgnoreFilter {
    regex: Regex,
}

impl IgnoreFilter {
    /// Compiles `rules` into a single matcher.
    ///
    /// # Errors
    ///
    /// Returns [`IgnoreError::Empty`] for an empty rule sequence and
    /// [`IgnoreError::Compile`] when a rule is not a valid expression.
    pub fn new<I, S>(rules: I) -> Result<Self, IgnoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unified = String::new();
        for rule in rules {
            if !unified.is_empty() {
                unified.push('|');
            }
            unified.push('(');
            unified.push_str(&translate_rule(rule.as_ref()));
            unified.push(')');
        }
        if unified.is_empty() {
            return Err(IgnoreError::Empty);
        }

        let regex = Regex::new(&format!("^(?:{unified})$"))?;
        Ok(Self { regex })
    }

    /// Reports whether `rel_path` is excluded from the comparison.
    ///
    /// Matching is a full-path test and is stable: the same path always gets
    /// the same answer.
    #[must_use]
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.regex.is_match(rel_path)
    }
}

/// Expands one rule into a regex fragment.
///
/// The `*` substitution runs last: the earlier passes introduce no `*` into
/// the fragment, so each pass only ever rewrites characters of the original
/// rule.
fn translate_rule(rule: &str) -> String {
    let fragment = rule
        .replace('.', "\\.")
        .replace('?', "[^/]")
        .replace('*', "[^/]*");

    match fragment.strip_prefix('/') {
        // Anchored rule: matches from the start of the relative path.
        Some(anchored) => anchored.to_string(),
        // Floating rule: may match below any directory.
        None => format!("(.*/)?{fragment}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RuleCase {
        rule: &'static str,
        ignored: &'static [&'static str],
        not_ignored: &'static [&'static str],
    }

    const CASES: &[RuleCase] = &[
        RuleCase {
            rule: "a",
            ignored: &["a", "dir/a", "another_dir/subdir/a"],
            not_ignored: &["A", "aa", "alpha", "dir_with_a/beta", "aaaa/aa/aa"],
        },
        RuleCase {
            rule: "foo",
            ignored: &["foo", "dir/foo", "another_dir/subdir/foo"],
            not_ignored: &["FOO", "foo.txt", "another_foo", "dir_foo/beta"],
        },
        RuleCase {
            rule: "linux.bak",
            ignored: &["linux.bak", "dir/linux.bak"],
            not_ignored: &["linux.txt", "linux-bak", ".linux.bak", "linux.bak.gz", "dir/.linux.bak"],
        },
        RuleCase {
            rule: "dish??.exe",
            ignored: &["dish00.exe", "dir/dishZZ.exe", "another_dir/subdir/dish--.exe"],
            not_ignored: &["dish.exe", "dish0.exe", "dish000.exe", "dish000exe"],
        },
        RuleCase {
            rule: "*.log",
            ignored: &["some.log", "dir/.another.file.log", "another_dir/subdir/.log"],
            not_ignored: &["log", "zlog"],
        },
        RuleCase {
            rule: "/cache",
            ignored: &["cache"],
            not_ignored: &[".cache", "cache.zzz", "dir/cache"],
        },
        RuleCase {
            rule: "omega/delete",
            ignored: &["omega/delete", "dir/omega/delete"],
            not_ignored: &["omega", "omega/bar", "bar/delete", "omega/bar/delete"],
        },
        RuleCase {
            rule: "/gamma/absolute",
            ignored: &["gamma/absolute"],
            not_ignored: &[".gamma/absolute", "dir/gamma/absolute"],
        },
        RuleCase {
            rule: "regex.*/*/complex?.*",
            ignored: &["regex.txt/dir/complex0.zip", "dir/regex.c/dir/complexZ.x.y"],
            not_ignored: &[
                "regex.txt",
                "regex.txt/dir/complex",
                "regex.txt/dir/complex.z",
                "regex.txt/dir/sub_dir/complex0.zip",
                "dir/regex/dir/complex0.zip",
            ],
        },
    ];

    #[test]
    fn one_rule_at_a_time() {
        for case in CASES {
            let filter = IgnoreFilter::new([case.rule]).expect("rule compiles");
            for path in case.ignored {
                assert!(filter.is_ignored(path), "rule {} should ignore {}", case.rule, path);
            }
            for path in case.not_ignored {
                assert!(
                    !filter.is_ignored(path),
                    "rule {} should not ignore {}",
                    case.rule,
                    path
                );
            }
        }
    }

    #[test]
    fn all_rules_together() {
        let rules: Vec<&str> = CASES.iter().map(|c| c.rule).collect();
        let filter = IgnoreFilter::new(&rules).expect("rules compile");
        for case in CASES {
            for path in case.ignored {
                assert!(filter.is_ignored(path), "{} should be ignored", path);
            }
        }
        // Paths rejected by one rule may be accepted by another; check a few
        // that no rule claims.
        for path in ["README", "src/main.rs", "deep/tree/keep.txt"] {
            assert!(!filter.is_ignored(path));
        }
    }

    #[test]
    fn matching_is_stable() {
        let filter = IgnoreFilter::new(["*.tmp"]).expect("rule compiles");
        for _ in 0..3 {
            assert!(filter.is_ignored("work/file.tmp"));
            assert!(!filter.is_ignored("work/file.txt"));
        }
    }

    #[test]
    fn empty_rule_set_is_rejected() {
        let rules: [&str; 0] = [];
        assert!(matches!(IgnoreFilter::new(rules), Err(IgnoreError::Empty)));
    }

    #[test]
    fn invalid_expression_reports_compile_error() {
        assert!(matches!(
            IgnoreFilter::new(["(unclosed"]),
            Err(IgnoreError::Compile(_))
        ));
    }

    #[test]
    fn passthrough_metacharacters_keep_regex_meaning() {
        // Character classes are not part of the wildcard grammar and reach
        // the engine as-is.
        let filter = IgnoreFilter::new(["file[0-9]"]).expect("rule compiles");
        assert!(filter.is_ignored("file7"));
        assert!(!filter.is_ignored("fileX"));
    }
}
