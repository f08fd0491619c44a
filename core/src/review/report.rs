//! Markdown review body.

use super::CheckResult;
use std::fmt::Write;

pub const DEFAULT_APPROVE_MESSAGE: &str = "LGTM";
pub const CELL_LIMIT: usize = 260;

/// Make `text` safe for a single markdown table cell: one line, pipes
/// escaped, at most `limit` characters (an ellipsis marks truncation).
pub fn markdown_table_cell(text: &str, limit: usize) -> String {
    let flat = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit.saturating_sub(1)).collect();
    // Never leave a dangling escape backslash.
    if cut.ends_with('\\') {
        cut.pop();
    }
    cut.push('…');
    cut
}

pub fn markdown_results_table<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> String {
    let mut lines = vec![
        "| Check | Status | Detail |".to_owned(),
        "| --- | --- | --- |".to_owned(),
    ];
    for result in results {
        let status = if result.ok { "✅ Pass" } else { "❌ Fail" };
        lines.push(format!(
            "| `{}` | {status} | {} |",
            markdown_table_cell(&result.name, CELL_LIMIT),
            markdown_table_cell(&result.detail, CELL_LIMIT)
        ));
    }
    lines.join("\n")
}

pub fn collect_failures(results: &[CheckResult]) -> Vec<&CheckResult> {
    results.iter().filter(|r| !r.ok).collect()
}

/// Returns `(approved, body)`. Any failed check turns the review into a
/// change request.
pub fn build_review_body(results: &[CheckResult], approve_message: &str) -> (bool, String) {
    let failures = collect_failures(results);
    let mut body = String::new();

    if failures.is_empty() {
        let message = if approve_message.trim().is_empty() {
            DEFAULT_APPROVE_MESSAGE
        } else {
            approve_message.trim()
        };
        let _ = writeln!(body, "## ✅ {message}\n");
        body.push_str("> **Decision:** Approve\n\n");
        body.push_str("### Local Check Results\n");
        body.push_str(&markdown_results_table(results));
        return (true, body);
    }

    body.push_str("## ❌ Request Changes\n\n");
    body.push_str("> **Decision:** Request changes\n\n");
    body.push_str("### Failed Checks\n");
    let _ = writeln!(body, "{}\n", markdown_results_table(failures.iter().copied()));
    body.push_str("### Full Check Results\n");
    let _ = writeln!(body, "{}\n", markdown_results_table(results));
    body.push_str("### Required Fixes\n");
    for failure in &failures {
        let _ = writeln!(body, "- **{}**: {}", failure.name, failure.detail);
    }
    body.push_str("\nPlease address these issues and push an update.");
    (false, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_escapes_and_flattens() {
        assert_eq!(markdown_table_cell("a | b\nc", 260), "a \\| b c");
    }

    #[test]
    fn test_cell_truncates() {
        let long = "x".repeat(300);
        let cell = markdown_table_cell(&long, 260);
        assert_eq!(cell.chars().count(), 260);
        assert!(cell.ends_with('…'));
    }

    #[test]
    fn test_cell_truncation_drops_dangling_escape() {
        let text = format!("{}|tail", "x".repeat(9));
        let cell = markdown_table_cell(&text, 11);
        assert_eq!(cell, "xxxxxxxxx…");
    }

    #[test]
    fn test_approve_body() {
        let results = vec![CheckResult::pass("PRIVACY.md", "ok")];
        let (approved, body) = build_review_body(&results, "");
        assert!(approved);
        assert_eq!(
            body,
            "## ✅ LGTM\n\n> **Decision:** Approve\n\n### Local Check Results\n\
             | Check | Status | Detail |\n| --- | --- | --- |\n| `PRIVACY.md` | ✅ Pass | ok |"
        );
    }

    #[test]
    fn test_custom_approve_message() {
        let results = vec![CheckResult::pass("a", "b")];
        let (_, body) = build_review_body(&results, "LGTM, thanks!");
        assert!(body.starts_with("## ✅ LGTM, thanks!\n"));
    }

    #[test]
    fn test_request_changes_body() {
        let results = vec![
            CheckResult::pass("Project structure", "fine"),
            CheckResult::fail("README language", "zh=12"),
        ];
        let (approved, body) = build_review_body(&results, "");
        assert!(!approved);
        assert!(body.starts_with("## ❌ Request Changes\n\n> **Decision:** Request changes\n"));
        assert!(body.contains("### Failed Checks\n| Check | Status | Detail |"));
        assert!(body.contains("### Full Check Results\n"));
        assert!(body.contains("### Required Fixes\n- **README language**: zh=12\n"));
        assert!(body.contains("| `README language` | ❌ Fail | zh=12 |"));
        assert!(body.ends_with("\n\nPlease address these issues and push an update."));
        assert_eq!(collect_failures(&results).len(), 1);
    }
}
