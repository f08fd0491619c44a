use super::print_json;
use crate::cli::OutputFormat;
use crate::config::{default_config_path, TriageConfig};
use colored::Colorize;
use std::path::Path;

pub fn run(config: &TriageConfig, explicit: Option<&Path>, format: OutputFormat) -> Result<(), String> {
    if format == OutputFormat::Json {
        return print_json(config);
    }

    let source = match (explicit, default_config_path()) {
        (Some(path), _) => path.display().to_string(),
        (None, _) if std::env::var_os("TRIAGE_CONFIG").is_some() => "$TRIAGE_CONFIG".to_owned(),
        (None, Some(path)) if path.exists() => path.display().to_string(),
        _ => "built-in defaults".to_owned(),
    };
    println!("{} {}", "Source:".bold(), source.dimmed());
    println!();
    println!("{}", "Thresholds".bold().cyan());
    println!("  CJK ratio threshold:  {:.0}%", config.cjk_ratio_threshold * 100.0);
    println!("  README max CJK:       {}", config.readme_max_cjk);
    println!("  PR content max CJK:   {}", config.pr_content_max_cjk);
    println!("  Issue CJK scope:      {:?}", config.issue_cjk_scope);
    println!("  Review CJK scope:     {:?}", config.review_cjk_scope);
    println!();
    println!("{}", "Exception phrases".bold().cyan());
    for phrase in &config.exception_phrases {
        println!("  {}", phrase.green());
    }
    println!();
    println!("{}", "Repositories".bold().cyan());
    for repo in &config.plugin_repos {
        println!("  {repo} {}", "(plugin)".dimmed());
    }
    println!("  {} {}", config.core_repo, "(core)".dimmed());
    for repo in &config.webapp_repos {
        println!("  {repo} {}", "(webapp)".dimmed());
    }
    println!();
    println!(
        "{} {}",
        "Trusted associations:".bold(),
        config.trusted_associations.join(", ")
    );
    println!("{} {}", "Minimum Dify version:".bold(), config.min_dify_version);
    Ok(())
}
