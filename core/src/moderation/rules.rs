//! Text heuristics used by issue moderation.
//!
//! All rules are conservative string checks over title, body and labels; none
//! of them do I/O.

use super::IssueData;
use crate::language::markdown::collapse_whitespace;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

static SECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.*)$").unwrap());
static CHECKBOX_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s*\[[ xX]\]").unwrap());
static QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(how|what|why|can|could|is|are|do|does|did|where|when|which|who|whom|help)\b",
    )
    .unwrap()
});
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(tbd|todo|n/?a|none|same as title|no idea)\b").unwrap()
});
static GENERIC_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(bug|issue|help|question|error|problem|bug report|help me|fix this|not working|doesn'?t work|please help|request|suggestion)$",
    )
    .unwrap()
});
static DISRESPECTFUL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(idiot|stupid|dumb|fuck|shit|bitch)\b").unwrap());
static BUG_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(bug|error|exception|traceback|crash|fail(?:s|ure)?)\b").unwrap()
});
static FEATURE_VERBS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(add|support|allow|enable|expose|visualize|customize)\b").unwrap()
});
static FEATURE_STORY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#+\s*1\.\s*Is this request related to a challenge you're experiencing\?")
        .unwrap()
});
static FEATURE_NEXT_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n#+\s*2\.").unwrap());
static DIFY_VERSION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdify\s*version\b").unwrap());
static DIFY_VERSION_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdify\s*v?(\d+)\.(\d+)(?:\.(\d+))?\b").unwrap()
});
static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv?(\d+)\.(\d+)(?:\.(\d+))?\b").unwrap());

const NON_RESPONSE_VALUES: &[&str] = &["_no response_", "n/a", "na", "none"];
const SKIP_SECTION_HEADINGS: &[&str] = &["self checks", "self check"];

const QUESTION_MARKERS: &[&str] = &[
    "how to ",
    "what is ",
    "can i ",
    "could i ",
    "any idea",
    "anyone know",
    "need help",
    "i want to know",
    "please tell me",
    "i'm wondering",
    "i am wondering",
    "is there a way",
    "is it possible",
    "does anyone",
    "has anyone",
    "please help",
    "how can i",
    "how do i",
    "where can i",
];

const DETAIL_MARKERS: &[&str] = &[
    "steps",
    "reproduce",
    "expected",
    "actual",
    "error",
    "log",
    "screenshot",
    "use case",
    "environment",
    "version",
];

const FEATURE_MARKERS: &[&str] = &[
    "feature request",
    "feature",
    "enhancement",
    "proposal",
    "suggestion",
];

const USE_CASE_MARKERS: &[&str] = &[
    "use case",
    "scenario",
    "business value",
    "why this is needed",
    "motivation",
];

/// A `major.minor.patch` version; a missing patch reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// First semver-looking token in `text`.
    pub fn find_in(text: &str) -> Option<Self> {
        SEMVER.captures(text).and_then(|c| Self::from_captures(&c))
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// De-duplicate while keeping first-seen order.
pub fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn is_non_response(text: &str) -> bool {
    NON_RESPONSE_VALUES.contains(&text.to_lowercase().as_str())
}

fn lowercase_labels(issue: &IssueData) -> HashSet<String> {
    issue.labels.iter().map(|l| l.to_lowercase()).collect()
}

/// Issue reads like a usage question rather than a bug or task.
pub fn looks_like_question(issue: &IssueData) -> bool {
    let labels = lowercase_labels(issue);
    if labels.contains("question") || labels.contains("support") {
        return true;
    }

    let title = issue.title.trim();
    if title.contains('?') || title.contains('？') || QUESTION_START.is_match(title) {
        return true;
    }

    let head: Vec<&str> = issue.body.lines().take(10).collect();
    let body_head = collapse_whitespace(&head.join("\n")).to_lowercase();
    QUESTION_MARKERS.iter().any(|m| body_head.contains(m))
}

/// Split a markdown body into `(heading, content)` pairs. Text before the
/// first heading is dropped.
pub fn extract_template_sections(body: &str) -> Vec<(String, String)> {
    let mut sections = Vec::new();
    let mut current: Option<String> = None;
    let mut lines: Vec<&str> = Vec::new();

    for line in body.lines() {
        let stripped = line.trim();
        if let Some(caps) = SECTION_HEADING.captures(stripped) {
            if let Some(heading) = current.take() {
                sections.push((heading, lines.join("\n").trim().to_owned()));
            }
            current = Some(caps[1].trim().to_owned());
            lines.clear();
        } else {
            lines.push(line);
        }
    }
    if let Some(heading) = current {
        sections.push((heading, lines.join("\n").trim().to_owned()));
    }

    sections
}

/// Meaningful content with template headings, Self Checks, checkbox-only
/// sections and `_No response_` placeholders removed.
pub fn effective_content(body: &str) -> String {
    let sections = extract_template_sections(body);
    if sections.is_empty() {
        return collapse_whitespace(body);
    }

    let parts: Vec<String> = sections
        .iter()
        .filter(|(heading, _)| !SKIP_SECTION_HEADINGS.contains(&heading.to_lowercase().as_str()))
        .filter_map(|(_, content)| {
            let clean = collapse_whitespace(content);
            if clean.is_empty() || is_non_response(&clean) {
                return None;
            }
            let non_empty: Vec<&str> = content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            if non_empty.iter().all(|l| CHECKBOX_LINE.is_match(l)) {
                return None;
            }
            Some(clean)
        })
        .collect();

    if parts.is_empty() {
        collapse_whitespace(body)
    } else {
        parts.join(" ")
    }
}

fn is_generic_title(title: &str) -> bool {
    GENERIC_TITLE.is_match(title)
}

/// Reasons the issue is too vague to act on (plugin repos). Empty when clear.
pub fn unclear_reasons(issue: &IssueData) -> Vec<String> {
    let mut reasons = Vec::new();
    let title = collapse_whitespace(&issue.title);
    let body = collapse_whitespace(&issue.body);
    let body_lower = body.to_lowercase();
    let content_len = effective_content(&issue.body).chars().count();

    if title.chars().count() < 8 || is_generic_title(&title) {
        reasons.push("Title is too short or generic.".to_owned());
    }

    if body.is_empty() {
        reasons.push("Description is empty.".to_owned());
        return reasons;
    }

    if content_len < 60 {
        reasons.push("Description is too short to understand the task.".to_owned());
    }

    if PLACEHOLDER.is_match(&body) {
        reasons.push("Description contains placeholders instead of concrete details.".to_owned());
    }

    let sections = extract_template_sections(&issue.body);
    if !sections.is_empty() {
        let filled = sections
            .iter()
            .filter(|(heading, content)| {
                let clean = collapse_whitespace(content);
                !clean.is_empty()
                    && !is_non_response(&clean)
                    && !SKIP_SECTION_HEADINGS.contains(&heading.to_lowercase().as_str())
            })
            .count();
        if filled <= 1 {
            reasons.push(
                "Almost all template sections are empty or marked _No response_.".to_owned(),
            );
        }
    }

    let marker_hits = DETAIL_MARKERS
        .iter()
        .filter(|m| body_lower.contains(*m))
        .count();
    if content_len < 180 && marker_hits < 2 {
        reasons.push("Description lacks enough concrete context for maintainers.".to_owned());
    }

    dedupe(reasons)
}

pub fn is_bug_like(issue: &IssueData) -> bool {
    if lowercase_labels(issue).contains("bug") {
        return true;
    }
    BUG_MARKERS.is_match(&format!("{}\n{}", issue.title, issue.body))
}

pub fn is_feature_like(issue: &IssueData) -> bool {
    let labels = lowercase_labels(issue);
    if labels.contains("feature") || labels.contains("enhancement") {
        return true;
    }
    let combined = format!("{}\n{}", issue.title, issue.body).to_lowercase();
    FEATURE_MARKERS.iter().any(|m| combined.contains(m))
}

/// Answer to "1. Is this request related to a challenge you're experiencing?"
/// in the feature request template.
pub fn extract_feature_story(body: &str) -> String {
    let Some(heading) = FEATURE_STORY_HEADING.find(body) else {
        return String::new();
    };
    let rest = &body[heading.end()..];
    let Some(gap) = rest.find("\n\n") else {
        return String::new();
    };
    let content = &rest[gap + 2..];
    let end = FEATURE_NEXT_SECTION
        .find(content)
        .map_or(content.len(), |m| m.start());
    content[..end].trim().to_owned()
}

/// Feature request explains itself well enough without explicit use-case wording.
pub fn feature_request_quality(issue: &IssueData) -> bool {
    let body_lower = issue.body.to_lowercase();
    let body_clean = collapse_whitespace(&issue.body);
    if body_clean.is_empty() {
        return false;
    }

    let story = collapse_whitespace(&extract_feature_story(&issue.body));
    if !story.is_empty() && !is_non_response(&story) && story.chars().count() >= 60 {
        return true;
    }

    if body_lower.contains("example") && body_lower.contains("expected") {
        return true;
    }

    if FEATURE_VERBS.is_match(&body_lower) {
        return body_clean.chars().count() >= 120;
    }

    false
}

/// Version of Dify the reporter says they run, if stated.
pub fn extract_dify_version(body: &str) -> Option<Version> {
    if body.is_empty() {
        return None;
    }
    let lines: Vec<&str> = body.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !DIFY_VERSION_LINE.is_match(line) {
            continue;
        }
        if let Some(version) = Version::find_in(line) {
            return Some(version);
        }
        // Issue forms put the answer on the first non-empty line under the heading.
        let answer = lines[i + 1..].iter().map(|l| l.trim()).find(|l| !l.is_empty());
        if let Some(version) = answer.and_then(Version::find_in) {
            return Some(version);
        }
    }
    DIFY_VERSION_INLINE
        .captures(body)
        .and_then(|c| Version::from_captures(&c))
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?m){p}")).unwrap())
        .collect()
}

/// Bug template fields the core repo requires, each with the patterns that
/// count as "mentioned".
static REQUIRED_BUG_FIELDS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            "Dify version",
            compile_all(&[r"\bdify version\b", r"\bversion\b"]),
        ),
        (
            "deployment mode (Cloud or Self Hosted)",
            compile_all(&[r"\bcloud\b", r"self[- ]hosted", r"\bdocker\b", r"\bsource\b"]),
        ),
        (
            "steps to reproduce",
            compile_all(&[r"steps to reproduce", r"\breproduce\b", r"^\s*1[.)]\s+"]),
        ),
        (
            "expected behavior",
            compile_all(&[r"expected behavior", r"\bexpected\b"]),
        ),
    ]
});
static ACTUAL_BEHAVIOR: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"actual behavior",
        r"\bactual\b",
        r"\blog",
        r"\berror\b",
        r"traceback",
    ])
});

fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

/// Gaps against the core repository's issue standard. Empty when compliant.
pub fn core_standard_violations(issue: &IssueData) -> Vec<String> {
    let mut violations = Vec::new();
    let title = collapse_whitespace(&issue.title);
    let body_clean = collapse_whitespace(&issue.body);
    let body_lower = issue.body.to_lowercase();

    if title.chars().count() < 12 || is_generic_title(&title) {
        violations.push("Use a clear and descriptive issue title.".to_owned());
    }

    if body_clean.chars().count() < 120 {
        violations.push("Provide a detailed issue description with enough context.".to_owned());
    }

    if DISRESPECTFUL.is_match(&format!("{}\n{}", issue.title, issue.body)) {
        violations.push("Use respectful, professional language (Code of Conduct).".to_owned());
    }

    if is_bug_like(issue) {
        for (label, patterns) in REQUIRED_BUG_FIELDS.iter() {
            if !any_match(patterns, &body_lower) {
                violations.push(format!("Include {label}."));
            }
        }
        if !any_match(&ACTUAL_BEHAVIOR, &body_lower) {
            violations.push("Include actual behavior and logs/error details when possible.".to_owned());
        }
    }

    if is_feature_like(issue)
        && !USE_CASE_MARKERS.iter().any(|m| body_lower.contains(m))
        && !feature_request_quality(issue)
    {
        violations.push("Describe the feature use case and expected value.".to_owned());
    }

    dedupe(violations)
}
