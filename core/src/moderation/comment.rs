//! Closing comments posted alongside a close decision.

use super::{Category, IssueData};

pub const FORUM_URL: &str = "https://forum.dify.ai/";
pub const DISCORD_URL: &str = "https://discord.com/invite/FngNHpbcY7";
pub const BUG_TEMPLATE_URL: &str = "https://github.com/langgenius/dify/blob/3aecceff27c6b712628ad463c6e6ac15b8527ebe/.github/ISSUE_TEMPLATE/bug_report.yml";
pub const CODE_OF_CONDUCT_URL: &str = "https://github.com/langgenius/dify/blob/4c1ad40f8e8a6ee58a958330558f2178b7e47fa7/.github/CODE_OF_CONDUCT.md";
pub const CONTRIBUTING_URL: &str =
    "https://github.com/langgenius/dify/blob/25ac69afc5ac9324079be5f0d02b2a2b03dcc784/CONTRIBUTING.md";

fn bullet_list(reasons: &[String], fallback: &str) -> String {
    if reasons.is_empty() {
        return fallback.to_owned();
    }
    reasons
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the markdown comment for a close decision. Categories that never
/// close an issue render an empty string.
pub fn render_comment(
    issue: &IssueData,
    category: Category,
    reasons: &[String],
    min_version: &str,
) -> String {
    let greeting = format!("Hi @{}, thanks for opening this issue.", issue.author);

    let lines: Vec<String> = match category {
        Category::Question => vec![
            greeting,
            String::new(),
            "### Why this is being closed".to_owned(),
            "This issue tracker is reserved for actionable bugs/tasks. This report looks like a usage question.".to_owned(),
            String::new(),
            "### Next steps".to_owned(),
            "Please use the community channels instead:".to_owned(),
            format!("- {FORUM_URL}"),
            format!("- {DISCORD_URL}"),
            String::new(),
            "If this is actually a bug/task, please open a new issue with clear reproducible details.".to_owned(),
            String::new(),
            "Thanks for understanding and for supporting Dify.".to_owned(),
        ],
        Category::Language => vec![
            greeting,
            String::new(),
            "### Why this is being closed".to_owned(),
            "Dify issue tracking requires English-only issue title and description for consistent collaboration.".to_owned(),
            String::new(),
            "### Next steps".to_owned(),
            "Please open a new issue in English and include clear details so maintainers can help efficiently.".to_owned(),
            String::new(),
            "Thanks for understanding and for your support.".to_owned(),
        ],
        Category::Unclear => vec![
            greeting,
            String::new(),
            "### Why this is being closed".to_owned(),
            "We could not extract an actionable task from the current report.".to_owned(),
            String::new(),
            bullet_list(reasons, "- The issue content is not clear enough to triage."),
            String::new(),
            "### Next steps".to_owned(),
            "Please open a new issue that includes:".to_owned(),
            "- A clear problem statement".to_owned(),
            "- Reproducible steps or concrete scope".to_owned(),
            "- Expected result".to_owned(),
            "- Actual result and logs/screenshots when available".to_owned(),
            String::new(),
            "Thanks for understanding and for helping keep the issue tracker actionable.".to_owned(),
        ],
        Category::OutdatedVersion => vec![
            greeting,
            String::new(),
            "### Why this is being closed".to_owned(),
            "This report targets an outdated Dify version.".to_owned(),
            String::new(),
            bullet_list(
                reasons,
                &format!("- Reported Dify version is below v{min_version}."),
            ),
            String::new(),
            "### Next steps".to_owned(),
            "Please upgrade to the latest Dify release and retest. If the issue still occurs on the latest version, open a new issue with updated details.".to_owned(),
            String::new(),
            "Thanks for understanding and for supporting Dify.".to_owned(),
        ],
        Category::CoreStandards => vec![
            greeting,
            String::new(),
            "### Why this is being closed".to_owned(),
            format!(
                "This report does not yet meet the required issue standard for `{}`.",
                issue.repo
            ),
            String::new(),
            bullet_list(reasons, "- Required issue details are missing."),
            String::new(),
            "### Relevant guidelines".to_owned(),
            format!("- Bug report template: {BUG_TEMPLATE_URL}"),
            format!("- Code of Conduct / Language Policy: {CODE_OF_CONDUCT_URL}"),
            format!("- Contributing guide: {CONTRIBUTING_URL}"),
            String::new(),
            "### Next steps".to_owned(),
            "Please open a new issue in English and include all required details from the bug template/contributing guide.".to_owned(),
            String::new(),
            "Thanks for understanding and for your contribution.".to_owned(),
        ],
        Category::UnsupportedRepo
        | Category::NotOpen
        | Category::LinkedPr
        | Category::TrustedAuthor
        | Category::Pass => return String::new(),
    };

    lines.join("\n")
}
