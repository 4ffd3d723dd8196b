//! Data-driven checks shared by the exercise checkers.
//!
//! Source rules match against [`normalize`]d source text, so patterns are
//! written lowercase and without any whitespace, e.g. `intpocetokien=8;`.
//! Output rules match the program's stdout byte for byte.

use std::sync::{LazyLock, OnceLock};

use itertools::Itertools;
use regex::Regex;

use crate::{
    constants::PLACEHOLDER,
    core::{
        domain::{CheckOutcome, Hint},
        traits::checker::{Checker, CheckerError},
    },
};

static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*").expect("line comment pattern is valid"));
static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("block comment pattern is valid"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strips comments, lowercases and removes all whitespace.
pub fn normalize(source: &str) -> String {
    let without_line = LINE_COMMENT_RE.replace_all(source, "");
    let without_block = BLOCK_COMMENT_RE.replace_all(&without_line, "");
    WHITESPACE_RE
        .replace_all(&without_block.to_lowercase(), "")
        .into_owned()
}

/// A regex compiled on first use, so a broken pattern surfaces as a
/// [`CheckerError`] while grading instead of at startup.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    compiled: OnceLock<Result<Regex, CheckerError>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    pub fn regex(&self) -> Result<&Regex, CheckerError> {
        self.compiled
            .get_or_init(|| {
                Regex::new(&self.source).map_err(|e| CheckerError::Pattern {
                    pattern: self.source.clone(),
                    msg: e.to_string(),
                })
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn is_match(&self, haystack: &str) -> Result<bool, CheckerError> {
        Ok(self.regex()?.is_match(haystack))
    }
}

/// Structural check over normalized source.
#[derive(Debug)]
pub struct SourceRule {
    patterns: Vec<Pattern>,
    message: String,
    in_partial: bool,
}

impl SourceRule {
    pub fn new(pattern: &str, message: impl Into<String>) -> Self {
        Self::all(&[pattern], message)
    }

    /// Passes only when every pattern matches; reported once.
    pub fn all(patterns: &[&str], message: impl Into<String>) -> Self {
        Self {
            patterns: patterns.iter().map(|p| Pattern::new(*p)).collect(),
            message: message.into(),
            in_partial: true,
        }
    }

    /// Excludes the rule from partial checks.
    pub fn full_only(mut self) -> Self {
        self.in_partial = false;
        self
    }

    pub fn passes(&self, normalized: &str) -> Result<bool, CheckerError> {
        for pattern in &self.patterns {
            if !pattern.is_match(normalized)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Expectation on what the program printed.
#[derive(Debug)]
pub enum OutputRule {
    Contains { expected: String, message: String },
    Matches { pattern: Pattern, message: String },
}

impl OutputRule {
    pub fn contains(expected: impl Into<String>, message: impl Into<String>) -> Self {
        OutputRule::Contains {
            expected: expected.into(),
            message: message.into(),
        }
    }

    pub fn matches(pattern: &str, message: impl Into<String>) -> Self {
        OutputRule::Matches {
            pattern: Pattern::new(pattern),
            message: message.into(),
        }
    }

    pub fn passes(&self, stdout: &str) -> Result<bool, CheckerError> {
        match self {
            OutputRule::Contains { expected, .. } => Ok(stdout.contains(expected.as_str())),
            OutputRule::Matches { pattern, .. } => pattern.is_match(stdout),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            OutputRule::Contains { message, .. } | OutputRule::Matches { message, .. } => message,
        }
    }
}

/// Reference checker: an ordered list of rules plus messages.
///
/// The placeholder guard, when set, is evaluated first by both operations.
#[derive(Debug)]
pub struct RuleSet {
    placeholder: Option<String>,
    source_rules: Vec<SourceRule>,
    output_rules: Vec<OutputRule>,
    success: String,
}

impl RuleSet {
    pub fn new(success: impl Into<String>) -> Self {
        Self {
            placeholder: None,
            source_rules: Vec::new(),
            output_rules: Vec::new(),
            success: success.into(),
        }
    }

    pub fn placeholder_guard(mut self, message: impl Into<String>) -> Self {
        self.placeholder = Some(message.into());
        self
    }

    pub fn rule(mut self, rule: SourceRule) -> Self {
        self.source_rules.push(rule);
        self
    }

    pub fn require(self, pattern: &str, message: impl Into<String>) -> Self {
        self.rule(SourceRule::new(pattern, message))
    }

    pub fn output(mut self, rule: OutputRule) -> Self {
        self.output_rules.push(rule);
        self
    }

    pub fn expect_output(self, expected: impl Into<String>, message: impl Into<String>) -> Self {
        self.output(OutputRule::contains(expected, message))
    }

    fn placeholder_message(&self, normalized: &str) -> Option<&str> {
        self.placeholder
            .as_deref()
            .filter(|_| normalized.contains(PLACEHOLDER))
    }

    /// Messages of every failing rule, in declaration order.
    pub fn failures(&self, normalized: &str, stdout: &str) -> Result<Vec<String>, CheckerError> {
        let mut failures = Vec::new();

        if let Some(message) = self.placeholder_message(normalized) {
            failures.push(message.to_string());
        }
        for rule in &self.source_rules {
            if !rule.passes(normalized)? {
                failures.push(rule.message().to_string());
            }
        }
        for rule in &self.output_rules {
            if !rule.passes(stdout)? {
                failures.push(rule.message().to_string());
            }
        }

        Ok(failures)
    }

    /// First issue a partial check should report, if any.
    pub fn first_hint(&self, normalized: &str) -> Result<Option<String>, CheckerError> {
        if let Some(message) = self.placeholder_message(normalized) {
            return Ok(Some(message.to_string()));
        }
        for rule in self.source_rules.iter().filter(|r| r.in_partial) {
            if !rule.passes(normalized)? {
                return Ok(Some(rule.message().to_string()));
            }
        }
        Ok(None)
    }

    /// Folds failure messages into a verdict.
    pub fn verdict(&self, failures: Vec<String>) -> CheckOutcome {
        if failures.is_empty() {
            CheckOutcome::passed(&self.success)
        } else {
            CheckOutcome::failed(failures.iter().join("\n"))
        }
    }
}

impl Checker for RuleSet {
    fn full_check(
        &self,
        source: &str,
        stdout: &str,
        _stderr: &str,
    ) -> Result<CheckOutcome, CheckerError> {
        let failures = self.failures(&normalize(source), stdout)?;
        Ok(self.verdict(failures))
    }

    fn partial_check(&self, source: &str) -> Result<Hint, CheckerError> {
        Ok(match self.first_hint(&normalize(source))? {
            Some(hint) => Hint::Available(hint),
            None => Hint::Unavailable,
        })
    }
}
