//! GitHub payload types.
//!
//! These mirror the JSON that `gh issue view --json ...` and
//! `gh pr view --json ...` print. Fetching is left to the caller; the crate
//! only reads the payloads from a file or stdin.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Author of an issue or pull request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: String,
}

/// A PR or issue cross-reference (`closedByPullRequestsReferences`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedRef {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Issue payload as printed by
/// `gh issue view N --json number,title,body,author,labels,state,url,closedByPullRequestsReferences`.
///
/// `authorAssociation` is not part of `gh issue view` output; it may be merged
/// in from `gh api repos/{repo}/issues/{n}` or supplied on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePayload {
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "author_association")]
    pub author_association: Option<String>,
    #[serde(default)]
    pub closed_by_pull_requests_references: Option<Vec<LinkedRef>>,
}

/// A file changed in a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrFile {
    pub path: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
}

/// Pull request payload as printed by `gh pr view N --json number,url,title,body,files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestPayload {
    pub number: u32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub files: Vec<PrFile>,
}

impl PullRequestPayload {
    /// The changed `.difypkg` file, if the PR touches exactly one.
    pub fn package_file(&self) -> Option<&str> {
        let mut packages = self
            .files
            .iter()
            .filter(|f| f.path.ends_with(".difypkg"))
            .map(|f| f.path.as_str());
        let first = packages.next()?;
        packages.next().is_none().then_some(first)
    }
}

/// Read and parse a JSON payload from `path`, or from stdin when `path` is
/// `None` or `-`.
pub fn read_payload<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, AppError> {
    let raw = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(p.display().to_string())
            } else {
                AppError::io(format!("{}: {e}", p.display()))
            }
        })?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_payload(&raw)
}

/// Parse a JSON payload already held in memory.
pub fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::parse("empty payload"));
    }
    Ok(serde_json::from_str(raw)?)
}
