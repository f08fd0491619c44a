use super::print_json;
use crate::cli::OutputFormat;
use crate::config::TriageConfig;
use crate::review::report::DEFAULT_APPROVE_MESSAGE;
use crate::review::{build_review_body, run_all};
use crate::sources::github::{read_payload, PullRequestPayload};
use colored::Colorize;
use std::path::Path;

pub fn run(
    config: &TriageConfig,
    pr_path: &Path,
    plugin_dir: Option<&Path>,
    allow_snippets: &[String],
    approve_message: Option<&str>,
    format: OutputFormat,
) -> Result<(), String> {
    let pr: PullRequestPayload = read_payload(Some(pr_path))?;
    let results = run_all(&pr, plugin_dir, config, allow_snippets);
    let (approved, body) =
        build_review_body(&results, approve_message.unwrap_or(DEFAULT_APPROVE_MESSAGE));

    if format == OutputFormat::Json {
        print_json(&serde_json::json!({
            "number": pr.number,
            "url": pr.url,
            "approved": approved,
            "results": results,
            "body": body,
        }))?;
    } else {
        for result in &results {
            let mark = if result.ok { "✓".green() } else { "✗".red() };
            println!("{mark} {}  {}", result.name.bold(), result.detail.dimmed());
        }
        println!();
        println!("{body}");
    }

    if approved {
        Ok(())
    } else {
        let failed = results.iter().filter(|r| !r.ok).count();
        Err(format!("PR #{} requests changes: {failed} check(s) failed", pr.number))
    }
}
