//! Language-policy classifier.
//!
//! Decides whether a block of text (issue/PR title and body, or a README)
//! breaks the English-only policy by scoring how much of it is CJK. The
//! classifier is a pure function: every policy knob (exception phrases,
//! threshold, section exclusion) is passed in explicitly, and the caller
//! layer supplies the standard defaults from [`crate::config`].
//!
//! Scoring pipeline:
//! 1. optionally drop the "Self Checks" section,
//! 2. optionally strip fenced code blocks and collapse whitespace,
//! 3. remove every exception phrase, in order, with no re-scan,
//! 4. count CJK codepoints and non-whitespace codepoints,
//! 5. compare against the [`Threshold`].

pub mod cjk;
pub mod markdown;

use serde::{Deserialize, Serialize};

pub use cjk::CjkScope;

/// How the CJK score is turned into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    /// Violation when `cjk / non_whitespace >= ratio`.
    Ratio(f64),
    /// Violation when the raw CJK count exceeds the allowed maximum.
    MaxCount(usize),
}

impl Threshold {
    fn is_violated(self, cjk_count: usize, ratio: f64) -> bool {
        match self {
            Self::Ratio(limit) => cjk_count > 0 && ratio >= limit,
            Self::MaxCount(max) => cjk_count > max,
        }
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ratio(limit) => write!(f, ">= {:.0}%", limit * 100.0),
            Self::MaxCount(max) => write!(f, "allowed_zh<={max}"),
        }
    }
}

/// Everything besides the text that shapes a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Exact substrings removed before scoring, in this order.
    pub exception_phrases: Vec<String>,
    pub threshold: Threshold,
    /// Drop the "Self Checks" section (heading and content) before scoring.
    pub exclude_self_checks: bool,
    /// Drop fenced code blocks before scoring.
    #[serde(default)]
    pub strip_code_blocks: bool,
    /// Collapse whitespace runs in both text and phrases so phrases match
    /// across wrapped lines.
    #[serde(default)]
    pub collapse_whitespace: bool,
    #[serde(default)]
    pub scope: CjkScope,
}

impl ClassifyOptions {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            exception_phrases: Vec::new(),
            threshold,
            exclude_self_checks: false,
            strip_code_blocks: false,
            collapse_whitespace: false,
            scope: CjkScope::Han,
        }
    }

    pub fn with_exceptions<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exception_phrases
            .extend(phrases.into_iter().map(Into::into));
        self
    }

    pub fn excluding_self_checks(mut self, exclude: bool) -> Self {
        self.exclude_self_checks = exclude;
        self
    }

    pub fn stripping_code_blocks(mut self, strip: bool) -> Self {
        self.strip_code_blocks = strip;
        self
    }

    pub fn collapsing_whitespace(mut self, collapse: bool) -> Self {
        self.collapse_whitespace = collapse;
        self
    }

    pub fn with_scope(mut self, scope: CjkScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Outcome of scoring one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// CJK codepoints left after pre-processing.
    pub cjk_count: usize,
    /// Non-whitespace codepoints left after pre-processing (the denominator).
    pub considered_count: usize,
    /// ASCII letters left after pre-processing.
    pub latin_count: usize,
    /// CJK codepoints that disappeared with removed exception phrases.
    pub ignored_cjk: usize,
    /// `cjk_count / considered_count`, or 0 when nothing was considered.
    pub ratio: f64,
    pub threshold: Threshold,
    pub violates: bool,
}

impl ClassificationResult {
    pub fn passed(&self) -> bool {
        !self.violates
    }

    /// One-line summary in the form used by check details and moderation reasons.
    pub fn summary(&self) -> String {
        format!(
            "CJK ratio={:.1}% (zh={}, en={}, ignored_zh={}, {})",
            self.ratio * 100.0,
            self.cjk_count,
            self.latin_count,
            self.ignored_cjk,
            self.threshold
        )
    }
}

/// Classify `text` against the language policy described by `options`.
pub fn classify(text: &str, options: &ClassifyOptions) -> ClassificationResult {
    let mut remaining = if options.exclude_self_checks {
        markdown::strip_self_checks(text)
    } else {
        text.to_owned()
    };

    if options.strip_code_blocks {
        remaining = markdown::strip_code_blocks(&remaining);
    }
    if options.collapse_whitespace {
        remaining = markdown::collapse_whitespace(&remaining);
    }

    let mut ignored_cjk = 0;
    for phrase in &options.exception_phrases {
        let phrase = if options.collapse_whitespace {
            markdown::collapse_whitespace(phrase)
        } else {
            phrase.clone()
        };
        if phrase.is_empty() {
            continue;
        }
        let occurrences = remaining.matches(phrase.as_str()).count();
        if occurrences == 0 {
            continue;
        }
        ignored_cjk += occurrences * options.scope.count(&phrase);
        // Replace with a space so neighbouring fragments never fuse into a new match.
        remaining = remaining.replace(phrase.as_str(), " ");
    }

    let cjk_count = options.scope.count(&remaining);
    let considered_count = remaining.chars().filter(|c| !c.is_whitespace()).count();
    let latin_count = remaining.chars().filter(char::is_ascii_alphabetic).count();
    let ratio = if considered_count == 0 {
        0.0
    } else {
        cjk_count as f64 / considered_count as f64
    };

    let violates = options.threshold.is_violated(cjk_count, ratio);
    log::debug!(
        "[classify] zh={cjk_count} considered={considered_count} ignored_zh={ignored_cjk} ratio={ratio:.3} violates={violates}"
    );

    ClassificationResult {
        cjk_count,
        considered_count,
        latin_count,
        ignored_cjk,
        ratio,
        threshold: options.threshold,
        violates,
    }
}
