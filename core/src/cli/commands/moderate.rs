use super::print_json;
use crate::cli::OutputFormat;
use crate::config::TriageConfig;
use crate::moderation::target::repo_from_url;
use crate::moderation::{decide, parse_issue_target, Action, IssueData};
use crate::sources::github::{read_payload, IssuePayload};
use colored::Colorize;
use std::path::Path;

pub fn run(
    config: &TriageConfig,
    input: &Path,
    issue_ref: Option<&str>,
    repo_override: Option<&str>,
    association: Option<String>,
    format: OutputFormat,
) -> Result<(), String> {
    let mut payload: IssuePayload = read_payload(Some(input))?;

    let repo = match issue_ref {
        Some(issue_ref) => {
            let (repo, number) = parse_issue_target(issue_ref, repo_override)?;
            payload.number = number;
            repo
        }
        None => repo_override
            .map(str::to_owned)
            .or_else(|| payload.url.as_deref().and_then(repo_from_url))
            .ok_or_else(|| {
                "Cannot determine repository: pass --repo or include \"url\" in the payload"
                    .to_owned()
            })?,
    };
    if association.is_some() {
        payload.author_association = association;
    }

    let issue = IssueData::from_payload(repo, payload);
    let decision = decide(&issue, config);

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "issue": issue,
            "decision": decision,
        }));
    }

    let action = match decision.action {
        Action::Close => decision.action.as_str().red().bold(),
        Action::Skip => decision.action.as_str().yellow().bold(),
        Action::NoAction => decision.action.as_str().green().bold(),
    };
    println!(
        "{}#{}  {action}  ({})",
        issue.repo.cyan(),
        issue.number,
        decision.category
    );
    for reason in &decision.reasons {
        println!("  - {reason}");
    }
    if !decision.comment.is_empty() {
        println!();
        println!("{}", "Comment:".bold());
        println!("{}", decision.comment);
    }
    Ok(())
}
