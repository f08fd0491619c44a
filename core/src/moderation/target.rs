use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;

static ISSUE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://github\.com/(?P<owner>[^/]+)/(?P<repo>[^/]+)/issues/(?P<number>\d+)(?:[/?#].*)?$",
    )
    .unwrap()
});

/// Resolve an issue reference (URL or bare number) to `(owner/repo, number)`.
///
/// A bare number needs `repo_override`. When both a URL and an override are
/// given they must name the same repository.
pub fn parse_issue_target(
    issue_ref: &str,
    repo_override: Option<&str>,
) -> Result<(String, u32), AppError> {
    let issue_ref = issue_ref.trim();

    if let Some(caps) = ISSUE_URL.captures(issue_ref) {
        let repo = format!("{}/{}", &caps["owner"], &caps["repo"]);
        if let Some(other) = repo_override {
            if other != repo {
                return Err(AppError::invalid_target(format!(
                    "--repo {other} does not match issue URL repo {repo}"
                )));
            }
        }
        let number = caps["number"]
            .parse()
            .map_err(|_| AppError::invalid_target(format!("issue number out of range: {issue_ref}")))?;
        return Ok((repo, number));
    }

    if issue_ref.is_empty() || !issue_ref.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid_target(
            "--issue must be a GitHub issue URL or an issue number",
        ));
    }
    let repo = repo_override
        .ok_or_else(|| AppError::invalid_target("--repo is required when --issue is a number"))?;
    let number = issue_ref
        .parse()
        .map_err(|_| AppError::invalid_target(format!("issue number out of range: {issue_ref}")))?;
    Ok((repo.to_owned(), number))
}

/// Extract `owner/repo` from an issue or PR URL.
pub fn repo_from_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let mut parts = rest.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    Some(format!("{owner}/{repo}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        let (repo, number) =
            parse_issue_target("https://github.com/langgenius/dify/issues/42#issuecomment-1", None)
                .unwrap();
        assert_eq!(repo, "langgenius/dify");
        assert_eq!(number, 42);
    }

    #[test]
    fn test_parse_url_with_matching_override() {
        let target = parse_issue_target(
            "https://github.com/langgenius/dify/issues/42",
            Some("langgenius/dify"),
        );
        assert!(target.is_ok());
    }

    #[test]
    fn test_parse_url_with_mismatched_override() {
        let err = parse_issue_target(
            "https://github.com/langgenius/dify/issues/42",
            Some("langgenius/dify-plugins"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_parse_number_requires_repo() {
        assert!(parse_issue_target("42", None).is_err());
        let (repo, number) = parse_issue_target(" 42 ", Some("langgenius/dify-plugins")).unwrap();
        assert_eq!(repo, "langgenius/dify-plugins");
        assert_eq!(number, 42);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_issue_target("https://github.com/langgenius/dify/pull/42", Some("x/y")).is_err());
        assert!(parse_issue_target("", Some("x/y")).is_err());
    }

    #[test]
    fn test_repo_from_url() {
        assert_eq!(
            repo_from_url("https://github.com/langgenius/dify/issues/1").as_deref(),
            Some("langgenius/dify")
        );
        assert_eq!(repo_from_url("https://example.com/a/b"), None);
    }
}
