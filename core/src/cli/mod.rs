pub mod commands;

use crate::config::TriageConfig;
use crate::language::CjkScope;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(author, version, about = "Language-policy checks for issues, PRs and plugin READMEs", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (default: $TRIAGE_CONFIG, then ~/.triage/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a text file (or stdin) against the language policy
    Classify {
        /// File to read; stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Fail when the CJK ratio reaches this fraction (default from config)
        #[arg(long, conflicts_with = "max_cjk")]
        ratio: Option<f64>,

        /// Fail when more than N CJK characters remain
        #[arg(long)]
        max_cjk: Option<usize>,

        /// Extra exception phrase to remove before scoring (repeatable)
        #[arg(long = "exception")]
        exceptions: Vec<String>,

        /// Do not remove the configured exception phrases
        #[arg(long)]
        no_default_exceptions: bool,

        /// Ignore the "Self Checks" section
        #[arg(long)]
        exclude_self_checks: bool,

        /// Ignore fenced code blocks
        #[arg(long)]
        strip_code_blocks: bool,

        /// Which characters count as CJK (default from config)
        #[arg(long)]
        scope: Option<CjkScope>,
    },

    /// Decide whether an issue should be closed
    Moderate {
        /// Issue JSON as printed by `gh issue view --json ...` ("-" for stdin)
        #[arg(long)]
        input: PathBuf,

        /// Issue URL or number; overrides the number in the payload
        #[arg(long)]
        issue: Option<String>,

        /// Repository (owner/name); required when it cannot be derived
        #[arg(long)]
        repo: Option<String>,

        /// Author association override (e.g. MEMBER)
        #[arg(long)]
        association: Option<String>,
    },

    /// Run the plugin PR checks and print the review body
    Review {
        /// PR JSON as printed by `gh pr view --json number,url,title,body,files` ("-" for stdin)
        #[arg(long)]
        pr: PathBuf,

        /// Unpacked plugin directory; enables README, structure and privacy checks
        #[arg(long)]
        plugin_dir: Option<PathBuf>,

        /// Maximum CJK characters allowed in README.md
        #[arg(long)]
        readme_max_cjk: Option<usize>,

        /// Maximum CJK characters allowed in the PR title and body
        #[arg(long)]
        pr_content_max_cjk: Option<usize>,

        /// Extra snippet allowed in PR content (repeatable)
        #[arg(long = "allow-snippet")]
        allow_snippets: Vec<String>,

        /// Heading used when every check passes
        #[arg(long)]
        approve_message: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<(), String> {
    let config = TriageConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify {
            file,
            ratio,
            max_cjk,
            exceptions,
            no_default_exceptions,
            exclude_self_checks,
            strip_code_blocks,
            scope,
        } => {
            let args = commands::classify::ClassifyArgs {
                file,
                ratio,
                max_cjk,
                exceptions,
                no_default_exceptions,
                exclude_self_checks,
                strip_code_blocks,
                scope,
            };
            commands::classify::run(&config, args, cli.format)
        }
        Commands::Moderate {
            input,
            issue,
            repo,
            association,
        } => commands::moderate::run(
            &config,
            &input,
            issue.as_deref(),
            repo.as_deref(),
            association,
            cli.format,
        ),
        Commands::Review {
            pr,
            plugin_dir,
            readme_max_cjk,
            pr_content_max_cjk,
            allow_snippets,
            approve_message,
        } => {
            let mut config = config;
            if let Some(max) = readme_max_cjk {
                config.readme_max_cjk = max;
            }
            if let Some(max) = pr_content_max_cjk {
                config.pr_content_max_cjk = max;
            }
            commands::review::run(
                &config,
                &pr,
                plugin_dir.as_deref(),
                &allow_snippets,
                approve_message.as_deref(),
                cli.format,
            )
        }
        Commands::Config => commands::config::run(&config, cli.config.as_deref(), cli.format),
    }
}
