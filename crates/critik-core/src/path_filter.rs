//! Path inclusion/exclusion rules for reviewable files.

use globset::{GlobBuilder, GlobMatcher};
use tracing::info;

use crate::error::{Error, Result};

/// A single glob rule, kept in configuration order for diagnostics.
#[derive(Debug)]
struct PathRule {
    /// Original pattern text, after trimming and `!` stripping
    pattern: String,
    /// Compiled matcher
    matcher: GlobMatcher,
    /// Whether a match excludes the path
    exclude: bool,
}

/// Evaluates ordered inclusion/exclusion glob rules against file paths.
///
/// Rule strings are trimmed and empty entries dropped; a leading `!` marks
/// an exclusion and is stripped before compiling. With no rules every path
/// is included. Once at least one inclusion rule exists a path must match
/// one to be included, and a matching exclusion always wins.
#[derive(Debug, Default)]
pub struct PathFilter {
    rules: Vec<PathRule>,
}

impl PathFilter {
    /// Build a filter from raw rule strings.
    ///
    /// An uncompilable pattern is a configuration error.
    pub fn new(rules: &[String]) -> Result<Self> {
        let mut compiled = Vec::new();
        for rule in rules {
            let trimmed = rule.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (pattern, exclude) = match trimmed.strip_prefix('!') {
                Some(rest) => (rest.trim(), true),
                None => (trimmed, false),
            };
            // literal_separator keeps `*` within one path segment; `**`
            // still crosses segments.
            let matcher = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::Config(format!("invalid path filter '{pattern}': {e}")))?
                .compile_matcher();
            compiled.push(PathRule {
                pattern: pattern.to_string(),
                matcher,
                exclude,
            });
        }
        Ok(Self { rules: compiled })
    }

    /// Decide whether a path participates in review.
    pub fn check(&self, path: &str) -> bool {
        let ok = self.evaluate(path);
        info!("checking path: {} => {}", path, ok);
        ok
    }

    fn evaluate(&self, path: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let mut included = false;
        let mut excluded = false;
        let mut inclusion_rule_exists = false;

        for rule in &self.rules {
            if rule.matcher.is_match(path) {
                if rule.exclude {
                    excluded = true;
                } else {
                    included = true;
                }
            }
            if !rule.exclude {
                inclusion_rule_exists = true;
            }
        }

        (!inclusion_rule_exists || included) && !excluded
    }

    /// Number of active rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the filter has no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule patterns in configuration order, `!`-prefixed for exclusions.
    pub fn patterns(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|r| {
                if r.exclude {
                    format!("!{}", r.pattern)
                } else {
                    r.pattern.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(rules: &[&str]) -> PathFilter {
        let rules: Vec<String> = rules.iter().map(|s| s.to_string()).collect();
        PathFilter::new(&rules).unwrap()
    }

    #[test]
    fn test_empty_rule_set_includes_everything() {
        let f = filter(&[]);
        assert!(f.check("src/main.rs"));
        assert!(f.check("anything/at/all.txt"));
    }

    #[test]
    fn test_inclusion_with_exclusion_override() {
        let f = filter(&["src/**", "!src/generated/**"]);
        assert!(f.check("src/a.ts"));
        assert!(!f.check("src/generated/x.ts"));
        assert!(!f.check("docs/readme.md"));
    }

    #[test]
    fn test_exclusion_only_rules_include_everything_else() {
        let f = filter(&["!*.min.js"]);
        assert!(f.check("src/app.js"));
        assert!(f.check("README.md"));
        assert!(!f.check("app.min.js"));
    }

    #[test]
    fn test_star_does_not_cross_segments() {
        let f = filter(&["src/*.rs"]);
        assert!(f.check("src/lib.rs"));
        assert!(!f.check("src/nested/lib.rs"));
    }

    #[test]
    fn test_rules_are_trimmed_and_blank_rules_dropped() {
        let f = filter(&["  src/**  ", "", "   ", "! target/** "]);
        assert_eq!(f.len(), 2);
        assert!(f.check("src/lib.rs"));
        assert!(!f.check("target/debug/build.rs"));
    }

    #[test]
    fn test_exclusion_wins_over_inclusion() {
        let f = filter(&["**/*.ts", "!vendor/**"]);
        assert!(f.check("src/index.ts"));
        assert!(!f.check("vendor/lib.ts"));
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let rules = vec!["src/[".to_string()];
        assert!(PathFilter::new(&rules).is_err());
    }

    #[test]
    fn test_patterns_preserve_order_and_negation() {
        let f = filter(&["src/**", "!src/generated/**"]);
        assert_eq!(f.patterns(), vec!["src/**", "!src/generated/**"]);
    }
}
