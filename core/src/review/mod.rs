//! Plugin PR review.
//!
//! Each check produces a [`CheckResult`]; [`report::build_review_body`] folds
//! a list of them into the approve or request-changes review text.

pub mod checks;
pub mod manifest;
pub mod report;

use crate::language::ClassificationResult;
use serde::{Deserialize, Serialize};

/// Outcome of a single named review check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<ClassificationResult>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            detail: detail.into(),
            language: None,
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            detail: detail.into(),
            language: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, result: ClassificationResult) -> Self {
        self.language = Some(result);
        self
    }
}

/// A check that could not run at all, e.g. because the package was unreadable.
pub fn failure_result(name: &str, error: impl std::fmt::Display) -> CheckResult {
    CheckResult::fail(name, format!("Check could not run: {error}"))
}

pub use checks::run_all;
pub use report::build_review_body;
