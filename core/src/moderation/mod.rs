//! Issue moderation policy.
//!
//! [`decide`] turns an issue into a [`Decision`]: close it (with a comment
//! for the author), skip it, or leave it alone. Plugin repositories and the
//! core repository follow different paths; see [`decide`] for the order in
//! which rules fire.

pub mod comment;
pub mod rules;
pub mod target;

use crate::config::TriageConfig;
use crate::language::{classify, ClassificationResult};
use crate::sources::github::IssuePayload;
use rules::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use target::parse_issue_target;

/// Normalised view of an issue, with defaults filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueData {
    pub repo: String,
    pub number: u32,
    pub title: String,
    pub body: String,
    pub author: String,
    pub labels: Vec<String>,
    pub state: String,
    pub url: String,
    pub author_association: String,
    pub linked_prs: Vec<String>,
}

impl IssueData {
    pub fn from_payload(repo: impl Into<String>, payload: IssuePayload) -> Self {
        let labels = payload
            .labels
            .into_iter()
            .map(|l| l.name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        let linked_prs = payload
            .closed_by_pull_requests_references
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.url)
            .filter(|url| !url.is_empty())
            .collect();

        Self {
            repo: repo.into(),
            number: payload.number,
            title: payload.title.unwrap_or_default(),
            body: payload.body.unwrap_or_default(),
            author: payload
                .author
                .map(|a| a.login)
                .filter(|login| !login.is_empty())
                .unwrap_or_else(|| "unknown".to_owned()),
            labels,
            state: payload.state.unwrap_or_else(|| "UNKNOWN".to_owned()),
            url: payload.url.unwrap_or_default(),
            author_association: payload
                .author_association
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "NONE".to_owned()),
            linked_prs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Close,
    Skip,
    #[serde(rename = "none")]
    NoAction,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Skip => "skip",
            Self::NoAction => "none",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    UnsupportedRepo,
    NotOpen,
    LinkedPr,
    TrustedAuthor,
    Language,
    Question,
    Unclear,
    OutdatedVersion,
    CoreStandards,
    Pass,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedRepo => "unsupported-repo",
            Self::NotOpen => "not-open",
            Self::LinkedPr => "linked-pr",
            Self::TrustedAuthor => "trusted-author",
            Self::Language => "language",
            Self::Question => "question",
            Self::Unclear => "unclear",
            Self::OutdatedVersion => "outdated-version",
            Self::CoreStandards => "core-standards",
            Self::Pass => "pass",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub action: Action,
    pub category: Category,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// The language score that fed the decision, when it was computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<ClassificationResult>,
}

impl Decision {
    fn skip(category: Category, reason: String) -> Self {
        Self {
            action: Action::Skip,
            category,
            reasons: vec![reason],
            comment: String::new(),
            language: None,
        }
    }

    fn pass(reason: &str, language: ClassificationResult) -> Self {
        Self {
            action: Action::NoAction,
            category: Category::Pass,
            reasons: vec![reason.to_owned()],
            comment: String::new(),
            language: Some(language),
        }
    }

    fn close(
        issue: &IssueData,
        config: &TriageConfig,
        category: Category,
        reasons: Vec<String>,
        language: ClassificationResult,
    ) -> Self {
        let comment = comment::render_comment(issue, category, &reasons, &config.min_dify_version);
        Self {
            action: Action::Close,
            category,
            reasons,
            comment,
            language: Some(language),
        }
    }
}

/// Score the issue for language. Title+body and body alone are both scored
/// so a long English title cannot dilute a Chinese body; the higher ratio wins.
pub fn language_check(issue: &IssueData, config: &TriageConfig) -> ClassificationResult {
    let options = config.issue_language_options();
    let combined = classify(&format!("{}\n{}", issue.title, issue.body), &options);
    let body_only = classify(&issue.body, &options);
    if body_only.ratio > combined.ratio {
        body_only
    } else {
        combined
    }
}

fn language_reason(result: &ClassificationResult, config: &TriageConfig) -> String {
    format!(
        "CJK ratio is {:.1}% (>= {:.0}%).",
        result.ratio * 100.0,
        config.cjk_ratio_threshold * 100.0
    )
}

/// Decide what to do with an issue.
///
/// Order of evaluation:
/// 1. unsupported repository or non-open issue: skip
/// 2. plugin repos: language, question, unclear, else pass
/// 3. core-like repos: linked PRs and trusted authors skip; then language,
///    question, outdated version (core repo only), issue standard, else pass
pub fn decide(issue: &IssueData, config: &TriageConfig) -> Decision {
    if !config.is_supported_repo(&issue.repo) {
        return Decision::skip(
            Category::UnsupportedRepo,
            format!("Repository '{}' is not covered by the moderation policy.", issue.repo),
        );
    }

    if !issue.state.eq_ignore_ascii_case("OPEN") {
        return Decision::skip(
            Category::NotOpen,
            format!(
                "Issue state is {}. No moderation action required.",
                issue.state
            ),
        );
    }

    let language = language_check(issue, config);
    let is_question = rules::looks_like_question(issue);
    log::info!(
        "[moderate] {}#{}: cjk_ratio={:.3} question={}",
        issue.repo,
        issue.number,
        language.ratio,
        is_question
    );

    if config.is_plugin_repo(&issue.repo) {
        if language.violates {
            let reasons = vec![language_reason(&language, config)];
            return Decision::close(issue, config, Category::Language, reasons, language);
        }
        if is_question {
            let reasons =
                vec!["Issue appears to be a question rather than an actionable task.".to_owned()];
            return Decision::close(issue, config, Category::Question, reasons, language);
        }
        let reasons = rules::unclear_reasons(issue);
        if !reasons.is_empty() {
            return Decision::close(issue, config, Category::Unclear, reasons, language);
        }
        return Decision::pass(
            "Issue appears actionable and follows repository moderation rules.",
            language,
        );
    }

    if !issue.linked_prs.is_empty() {
        return Decision::skip(
            Category::LinkedPr,
            format!(
                "Issue has {} linked PR(s); skip review per policy.",
                issue.linked_prs.len()
            ),
        );
    }

    if config.is_trusted_association(&issue.author_association) {
        return Decision::skip(
            Category::TrustedAuthor,
            format!(
                "Author association is {}; skip review per policy.",
                issue.author_association.to_uppercase()
            ),
        );
    }

    if language.violates {
        let reasons = vec![language_reason(&language, config)];
        return Decision::close(issue, config, Category::Language, reasons, language);
    }

    if is_question {
        let reasons =
            vec!["Issue appears to be a question rather than an actionable bug/task.".to_owned()];
        return Decision::close(issue, config, Category::Question, reasons, language);
    }

    if issue.repo == config.core_repo {
        match Version::find_in(&config.min_dify_version) {
            Some(minimum) => {
                if let Some(reported) = rules::extract_dify_version(&issue.body) {
                    if reported < minimum {
                        let reasons = vec![format!(
                            "Reported Dify version is v{reported}, which is below v{}.",
                            config.min_dify_version
                        )];
                        return Decision::close(
                            issue,
                            config,
                            Category::OutdatedVersion,
                            reasons,
                            language,
                        );
                    }
                }
            }
            None => log::warn!(
                "[moderate] Ignoring unparseable minimum Dify version '{}'",
                config.min_dify_version
            ),
        }
    }

    let violations = rules::core_standard_violations(issue);
    if !violations.is_empty() {
        return Decision::close(issue, config, Category::CoreStandards, violations, language);
    }

    Decision::pass(
        "Issue meets baseline moderation and quality standards.",
        language,
    )
}
