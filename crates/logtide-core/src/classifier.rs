//! Classifier: assigns one [`Severity`] to a message using ordered,
//! declarative rule groups.
//!
//! Groups are evaluated top to bottom and the first group with any matching
//! pattern wins. Error and warning signals come before success and info so
//! that "failed to complete successfully" is an error. Lines no group claims
//! are [`Severity::Debug`].
//!
//! Every pattern is matched case-insensitively. Each group is compiled into a
//! single [`RegexSet`] once per process.

use once_cell::sync::Lazy;
use regex::{RegexSet, RegexSetBuilder};

use crate::ansi;
use crate::types::Severity;

/// A named list of patterns for one severity.
#[derive(Debug, Clone, Copy)]
pub struct RuleGroup {
    pub severity: Severity,
    pub patterns: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

pub const ERROR_RULES: RuleGroup = RuleGroup {
    severity: Severity::Error,
    patterns: &[
        r"^\s*(?:error|err)\b",
        r"\b(?:exception|failed|failure)\b",
        r"\b(?:stack\s?trace|traceback)\b",
        r"^\s*at\s+[^\s(]+\s*\(?.*:\d+:\d+\)?\s*$",
        r"\b(?:uncaught|unhandled)\s+(?:exception|error)",
        r"\[(?:error|err|fatal)\]",
        r"\b(?:crash(?:ed|es)?|critical|fatal)\b",
    ],
};

pub const WARNING_RULES: RuleGroup = RuleGroup {
    severity: Severity::Warning,
    patterns: &[
        r"^\s*(?:warning|warn)\b",
        r"\[(?:warn|warning|attention)\]",
        r"\b(?:deprecated|obsolete)\b",
        r"^\s*(?:caution|attention|notice)\b",
        r"⚠",
    ],
};

pub const SUCCESS_RULES: RuleGroup = RuleGroup {
    severity: Severity::Success,
    patterns: &[
        r"\b(?:successfully|completed)\s+(?:initialized|started|completed|created|done|deployed)\b",
        r"\b(?:initialized|started|created|done|deployed)\s+successfully\b",
        r"\[(?:success|ok|done)\]",
        r"\b(?:listening|running)\s+(?:on|at)\s+(?:port\s*)?:?\d+",
        r"\b(?:listening|running)\s+(?:on|at)\b.*\bport\s*:?\s*\d+",
        r"\b(?:connected|established|ready)\s+(?:to|for|on)\b",
        r"[✓✔✅🎉]",
        r"\b(?:success|completed|ready)\b",
    ],
};

pub const INFO_RULES: RuleGroup = RuleGroup {
    severity: Severity::Info,
    patterns: &[
        r"^\s*(?:information|info|inf)\b",
        r"\[info\]",
        r"^\s*(?:status|state|current|progress)\b",
        r"\b(?:processing|executing|performing)\b",
        r"\b(?:cloning|building|installing|downloading|fetching)\b",
    ],
};

/// The built-in rule groups in detection precedence.
pub const DEFAULT_RULES: &[RuleGroup] = &[ERROR_RULES, WARNING_RULES, SUCCESS_RULES, INFO_RULES];

static DEFAULT_CLASSIFIER: Lazy<Classifier> = Lazy::new(|| {
    Classifier::new(DEFAULT_RULES).expect("built-in severity rules must compile")
});

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// A compiled, ordered set of rule groups.
#[derive(Debug, Clone)]
pub struct Classifier {
    groups: Vec<(Severity, RegexSet)>,
}

impl Classifier {
    /// Compile `groups` in the order given.
    pub fn new(groups: &[RuleGroup]) -> Result<Self, regex::Error> {
        let groups = groups
            .iter()
            .map(|g| {
                RegexSetBuilder::new(g.patterns)
                    .case_insensitive(true)
                    .build()
                    .map(|set| (g.severity, set))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { groups })
    }

    /// Classify `message`. Terminal escape sequences are removed first so a
    /// coloured `ERROR` token still counts as leading.
    pub fn classify(&self, message: &str) -> Severity {
        let text = ansi::strip(message);
        self.groups
            .iter()
            .find(|(_, set)| set.is_match(&text))
            .map_or(Severity::Debug, |(severity, _)| *severity)
    }
}

/// Classify `message` with the built-in rule tables.
pub fn classify(message: &str) -> Severity {
    DEFAULT_CLASSIFIER.classify(message)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
