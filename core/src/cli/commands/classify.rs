use super::print_json;
use crate::cli::OutputFormat;
use crate::config::TriageConfig;
use crate::language::{classify, CjkScope, ClassifyOptions, Threshold};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;

pub struct ClassifyArgs {
    pub file: Option<PathBuf>,
    pub ratio: Option<f64>,
    pub max_cjk: Option<usize>,
    pub exceptions: Vec<String>,
    pub no_default_exceptions: bool,
    pub exclude_self_checks: bool,
    pub strip_code_blocks: bool,
    pub scope: Option<CjkScope>,
}

fn read_text(file: Option<&PathBuf>) -> Result<String, String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

pub fn run(config: &TriageConfig, args: ClassifyArgs, format: OutputFormat) -> Result<(), String> {
    if let Some(ratio) = args.ratio {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(format!("--ratio must be between 0 and 1, got {ratio}"));
        }
    }

    let text = read_text(args.file.as_ref())?;

    let threshold = match (args.max_cjk, args.ratio) {
        (Some(max), _) => Threshold::MaxCount(max),
        (None, Some(ratio)) => Threshold::Ratio(ratio),
        (None, None) => Threshold::Ratio(config.cjk_ratio_threshold),
    };
    let defaults: &[String] = if args.no_default_exceptions {
        &[]
    } else {
        config.exception_phrases.as_slice()
    };
    let options = ClassifyOptions::new(threshold)
        .with_exceptions(defaults.iter().chain(&args.exceptions).cloned())
        .excluding_self_checks(args.exclude_self_checks)
        .stripping_code_blocks(args.strip_code_blocks)
        .with_scope(args.scope.unwrap_or(config.review_cjk_scope));

    let result = classify(&text, &options);

    if format == OutputFormat::Json {
        return print_json(&result);
    }

    let verdict = if result.violates {
        "✗ violates".red().bold()
    } else {
        "✓ ok".green().bold()
    };
    println!("{verdict}  {}", result.summary().dimmed());
    println!(
        "  {} CJK of {} considered characters",
        result.cjk_count.to_string().cyan(),
        result.considered_count
    );
    Ok(())
}
