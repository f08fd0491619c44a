//! Markdown pre-processing applied before scoring.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}(\s|$)").unwrap());
static SELF_CHECKS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#{1,6}(?:[^#].*)?self\s*checks").unwrap());
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// Returns `true` if the trimmed line is a markdown ATX heading.
pub fn is_heading(line: &str) -> bool {
    HEADING.is_match(line.trim())
}

/// Returns `true` if the trimmed line opens a "Self Checks" section.
pub fn is_self_checks_heading(line: &str) -> bool {
    SELF_CHECKS_HEADING.is_match(line.trim())
}

/// Remove every "Self Checks" section: its heading and all lines up to the
/// next heading (or end of text).
pub fn strip_self_checks(markdown: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;

    for line in markdown.lines() {
        if is_self_checks_heading(line) {
            skipping = true;
            continue;
        }
        if skipping && is_heading(line) {
            skipping = false;
        }
        if !skipping {
            kept.push(line);
        }
    }

    kept.join("\n")
}

/// Remove fenced code blocks.
pub fn strip_code_blocks(text: &str) -> String {
    CODE_BLOCK.replace_all(text, "").into_owned()
}

/// Collapse all whitespace runs to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_self_checks_until_next_heading() {
        let body = "### Summary\nFixes a bug\n\n### Self Checks\n- [x] 我已阅读并同意\n- [x] done\n\n### Steps\n1. run";
        let stripped = strip_self_checks(body);
        assert!(!stripped.contains("我已阅读并同意"));
        assert!(!stripped.contains("Self Checks"));
        assert!(stripped.contains("Fixes a bug"));
        assert!(stripped.contains("### Steps\n1. run"));
    }

    #[test]
    fn test_strip_self_checks_to_end() {
        let body = "intro\n## self  checks\n- [x] 中文";
        assert_eq!(strip_self_checks(body), "intro");
    }

    #[test]
    fn test_strip_self_checks_heading_variants() {
        assert!(is_self_checks_heading("#Self Checks"));
        assert!(is_self_checks_heading("  ### Self-Checks / SELF CHECKS"));
        assert!(!is_self_checks_heading("Self Checks"));
        assert!(!is_self_checks_heading("####### Self Checks"));
    }

    #[test]
    fn test_strip_self_checks_without_section() {
        let body = "# Title\nbody";
        assert_eq!(strip_self_checks(body), body);
    }

    #[test]
    fn test_strip_code_blocks() {
        let text = "before\n```python\nprint('你好')\n```\nafter";
        assert_eq!(strip_code_blocks(text), "before\n\nafter");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\tb   c "), "a b c");
    }
}
