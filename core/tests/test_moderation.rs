//! End-to-end moderation decisions from gh-shaped payloads.

use triage::config::TriageConfig;
use triage::moderation::{decide, Action, Category, IssueData};
use triage::sources::github::{parse_payload, IssuePayload};

fn issue(repo: &str, json: &str) -> IssueData {
    let payload: IssuePayload = parse_payload(json).unwrap();
    IssueData::from_payload(repo, payload)
}

#[test]
fn test_unsupported_repo_is_skipped() {
    let issue = issue("someone/else", r#"{"number": 1, "state": "OPEN"}"#);
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.action, Action::Skip);
    assert_eq!(decision.category, Category::UnsupportedRepo);
}

#[test]
fn test_closed_issue_is_skipped() {
    let issue = issue("langgenius/dify", r#"{"number": 1, "state": "CLOSED"}"#);
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.category, Category::NotOpen);
}

#[test]
fn test_chinese_plugin_issue_is_closed_for_language() {
    let issue = issue(
        "langgenius/dify-plugins",
        r#"{
            "number": 12,
            "title": "插件安装失败",
            "body": "安装插件的时候一直报错，请问怎么解决？",
            "state": "OPEN",
            "author": {"login": "someone"},
            "authorAssociation": "NONE"
        }"#,
    );
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.action, Action::Close);
    assert_eq!(decision.category, Category::Language);
    assert!(decision.comment.starts_with("Hi @someone"));
    assert!(decision.language.is_some_and(|l| l.violates));
}

#[test]
fn test_core_issue_with_linked_pr_is_skipped() {
    let issue = issue(
        "langgenius/dify",
        r#"{
            "number": 3,
            "title": "插件安装失败",
            "state": "OPEN",
            "closedByPullRequestsReferences": [{"number": 9, "url": "https://github.com/langgenius/dify/pull/9"}]
        }"#,
    );
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.category, Category::LinkedPr);
}

#[test]
fn test_trusted_author_is_skipped_on_core() {
    let issue = issue(
        "langgenius/dify",
        r#"{"number": 4, "title": "插件安装失败", "state": "OPEN", "author_association": "member"}"#,
    );
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.action, Action::Skip);
    assert_eq!(decision.category, Category::TrustedAuthor);
}

#[test]
fn test_outdated_core_version_is_closed() {
    let payload = serde_json::json!({
        "number": 5,
        "title": "Workflow run crashes when node output is empty",
        "body": "### Dify version\n\n1.4.2\n\n### Steps to reproduce\n\nRun the workflow with an empty LLM node output.",
        "state": "OPEN",
        "author": {"login": "reporter"}
    });
    let issue = issue("langgenius/dify", &payload.to_string());
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.action, Action::Close);
    assert_eq!(decision.category, Category::OutdatedVersion);
    assert_eq!(
        decision.reasons,
        vec!["Reported Dify version is v1.4.2, which is below v1.10.0.".to_owned()]
    );
}

#[test]
fn test_decision_serializes_kebab_case() {
    let issue = issue("someone/else", r#"{"number": 1}"#);
    let decision = decide(&issue, &TriageConfig::default());
    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["action"], "skip");
    assert_eq!(json["category"], "unsupported-repo");
}

#[test]
fn test_japanese_plugin_issue_is_closed_for_language() {
    let issue = issue(
        "langgenius/dify-plugins",
        r#"{"number": 6, "title": "プラグインのインストールに失敗しました", "body": "インストール中にエラーが発生します", "state": "OPEN"}"#,
    );
    let decision = decide(&issue, &TriageConfig::default());
    assert_eq!(decision.category, Category::Language);
}
