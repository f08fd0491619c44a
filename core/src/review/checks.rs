//! Local checks run against a plugin PR before a reviewer looks at it.

use super::manifest::{self, PluginManifest};
use super::{failure_result, CheckResult};
use crate::config::TriageConfig;
use crate::language::classify;
use crate::sources::github::PullRequestPayload;
use std::fs;
use std::path::Path;

pub const README_MULTILINGUAL_DOC_URL: &str = "https://docs.dify.ai/en/develop-plugin/features-and-specs/plugin-types/multilingual-readme#multilingual-readme";

const REQUIRED_FILES: &[&str] = &["manifest.yaml"];
const EXPECTED_FILES: &[&str] = &["README.md", "PRIVACY.md"];

/// PR title and body must be free of Chinese outside the allowlisted snippets.
pub fn pr_content_language(
    pr: &PullRequestPayload,
    config: &TriageConfig,
    extra_snippets: &[String],
) -> CheckResult {
    const NAME: &str = "PR content language";

    let text = format!(
        "{}\n{}",
        pr.title.as_deref().unwrap_or_default(),
        pr.body.as_deref().unwrap_or_default()
    );
    let result = classify(&text, &config.pr_content_options(extra_snippets));
    let detail = format!("PR title/body {}", result.summary());
    log::debug!("[review] #{}: {detail}", pr.number);

    if result.violates {
        CheckResult::fail(
            NAME,
            format!(
                "{detail}; Chinese characters are not allowed in PR content except configured allowlist snippets."
            ),
        )
        .with_language(result)
    } else {
        CheckResult::pass(NAME, detail).with_language(result)
    }
}

/// The plugin README must not contain Chinese (code blocks excepted).
pub fn readme_language(plugin_dir: &Path, config: &TriageConfig) -> CheckResult {
    const NAME: &str = "README language";

    let readme_path = plugin_dir.join("README.md");
    let content = match fs::read(&readme_path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return CheckResult::fail(NAME, "README.md not found in plugin package.");
        }
        Err(e) => return CheckResult::fail(NAME, format!("Failed to read README.md: {e}")),
    };

    let result = classify(&content, &config.readme_options());
    let detail = format!("README.md {}", result.summary());

    if result.violates {
        CheckResult::fail(
            NAME,
            format!(
                "{detail}; Chinese characters are not allowed. Use multilingual README guidance: {README_MULTILINGUAL_DOC_URL}"
            ),
        )
        .with_language(result)
    } else {
        CheckResult::pass(NAME, detail).with_language(result)
    }
}

/// Quick structural review of the unpacked plugin.
pub fn project_structure(plugin_dir: &Path) -> CheckResult {
    const NAME: &str = "Project structure";

    let (present, missing): (Vec<&str>, Vec<&str>) = REQUIRED_FILES
        .iter()
        .chain(EXPECTED_FILES)
        .copied()
        .partition(|name| plugin_dir.join(name).exists());

    let assets_dir = plugin_dir.join("_assets");
    let has_assets = fs::read_dir(&assets_dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    let assets = if has_assets { "yes" } else { "no" };

    if missing.is_empty() {
        CheckResult::pass(
            NAME,
            format!(
                "All expected files present: {}. _assets/: {assets}.",
                present.join(", ")
            ),
        )
    } else {
        CheckResult::fail(
            NAME,
            format!(
                "Missing files: {}. Present: {}. _assets/: {assets}.",
                missing.join(", "),
                present.join(", ")
            ),
        )
    }
}

/// PRIVACY.md must exist and say something.
pub fn privacy_policy(plugin_dir: &Path) -> CheckResult {
    const NAME: &str = "PRIVACY.md";

    let path = plugin_dir.join("PRIVACY.md");
    match fs::read(&path) {
        Err(_) => CheckResult::fail(
            NAME,
            "PRIVACY.md not found in plugin package. A privacy policy file is required for marketplace submission.",
        ),
        Ok(bytes) if String::from_utf8_lossy(&bytes).trim().is_empty() => {
            CheckResult::fail(NAME, "PRIVACY.md is empty. Please provide a privacy policy.")
        }
        Ok(_) => CheckResult::pass(NAME, "PRIVACY.md exists and is non-empty."),
    }
}

/// The PR must change exactly one `.difypkg` file.
pub fn package_file(pr: &PullRequestPayload) -> CheckResult {
    const NAME: &str = "Package file";

    let packages: Vec<&str> = pr
        .files
        .iter()
        .map(|f| f.path.as_str())
        .filter(|p| p.ends_with(".difypkg"))
        .collect();

    match pr.package_file() {
        Some(path) => CheckResult::pass(NAME, format!("Plugin package: {path}")),
        None if packages.is_empty() => {
            CheckResult::fail(NAME, "No .difypkg file found in PR changes.")
        }
        None => CheckResult::fail(
            NAME,
            format!(
                "Expected exactly one .difypkg file, found {}: {}",
                packages.len(),
                packages.join(", ")
            ),
        ),
    }
}

/// Run every check that applies. Directory checks only run when a plugin
/// directory was given.
pub fn run_all(
    pr: &PullRequestPayload,
    plugin_dir: Option<&Path>,
    config: &TriageConfig,
    extra_snippets: &[String],
) -> Vec<CheckResult> {
    let mut results = vec![
        pr_content_language(pr, config, extra_snippets),
        package_file(pr),
    ];

    if let Some(dir) = plugin_dir.filter(|d| !d.is_dir()) {
        log::warn!("[review] plugin directory {} is not readable", dir.display());
        let error = format!("{} is not a directory", dir.display());
        for name in [
            "Project structure",
            "Manifest parsing",
            "README language",
            "PRIVACY.md",
        ] {
            results.push(failure_result(name, &error));
        }
    } else if let Some(dir) = plugin_dir {
        results.push(project_structure(dir));
        match PluginManifest::load(dir) {
            Ok(parsed) => {
                results.push(manifest::manifest_author(&parsed));
                results.push(manifest::icon(dir, &parsed));
            }
            Err(e) => {
                log::warn!("[review] manifest.yaml unusable: {e}");
                results.push(failure_result("Manifest parsing", e));
            }
        }
        results.push(readme_language(dir, config));
        results.push(privacy_policy(dir));
    }

    log::info!(
        "[review] #{}: {} check(s), {} failed",
        pr.number,
        results.len(),
        results.iter().filter(|r| !r.ok).count()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::github::parse_payload;

    fn pr(title: &str, body: &str) -> PullRequestPayload {
        PullRequestPayload {
            number: 1,
            url: String::new(),
            title: Some(title.to_owned()),
            body: Some(body.to_owned()),
            files: Vec::new(),
        }
    }

    #[test]
    fn test_pr_content_passes_with_template_notice() {
        let body = "## Summary\nAdd a weather tool.\n\n> 【中文用户 & Non English User】请使用英语提交，否则会被关闭 ：）";
        let result = pr_content_language(&pr("Add weather plugin", body), &TriageConfig::default(), &[]);
        assert!(result.ok, "{}", result.detail);
        assert!(result.detail.contains("ignored_zh=17"));
    }

    #[test]
    fn test_pr_content_fails_on_chinese() {
        let result = pr_content_language(
            &pr("新增天气插件", "Adds a tool"),
            &TriageConfig::default(),
            &[],
        );
        assert!(!result.ok);
        assert!(result.detail.starts_with("PR title/body CJK ratio="));
        assert!(result.detail.contains("zh=6"));
    }

    #[test]
    fn test_pr_content_extra_snippet() {
        let result = pr_content_language(
            &pr("Add 天气 plugin", ""),
            &TriageConfig::default(),
            &["天气".to_owned()],
        );
        assert!(result.ok);
    }

    #[test]
    fn test_pr_content_ignores_self_checks() {
        let body = "## Description\nFix.\n\n## Self Checks\n- [x] 我已阅读并同意贡献指南\n";
        let result = pr_content_language(&pr("Fix tool schema", body), &TriageConfig::default(), &[]);
        assert!(result.ok);
    }

    #[test]
    fn test_package_file_check() {
        let payload: PullRequestPayload = parse_payload(
            r#"{"number": 2, "files": [{"path": "a/b/plugin.difypkg"}]}"#,
        )
        .unwrap();
        assert!(package_file(&payload).ok);

        let none = pr("t", "b");
        let result = package_file(&none);
        assert!(!result.ok);
        assert_eq!(result.detail, "No .difypkg file found in PR changes.");
    }

    #[test]
    fn test_plugin_dir_checks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.yaml"), "version: 0.0.1\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "# Weather\n\n```\n# 中文注释\n```\n").unwrap();
        std::fs::write(dir.path().join("PRIVACY.md"), "  \n").unwrap();

        let config = TriageConfig::default();
        assert!(project_structure(dir.path()).ok);
        assert!(readme_language(dir.path(), &config).ok);
        let privacy = privacy_policy(dir.path());
        assert!(!privacy.ok);
        assert!(privacy.detail.contains("empty"));
    }

    #[test]
    fn test_readme_with_chinese_points_to_guide() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# 天气插件").unwrap();
        let result = readme_language(dir.path(), &TriageConfig::default());
        assert!(!result.ok);
        assert!(result.detail.contains(README_MULTILINGUAL_DOC_URL));
    }

    #[test]
    fn test_missing_files_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("_assets")).unwrap();
        std::fs::write(dir.path().join("_assets").join("icon.svg"), "<svg/>").unwrap();

        let structure = project_structure(dir.path());
        assert!(!structure.ok);
        assert!(structure.detail.starts_with("Missing files: manifest.yaml, README.md, PRIVACY.md."));
        assert!(structure.detail.ends_with("_assets/: yes."));
        assert_eq!(
            readme_language(dir.path(), &TriageConfig::default()).detail,
            "README.md not found in plugin package."
        );
    }

    #[test]
    fn test_run_all_with_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let results = run_all(&pr("Add tool", ""), Some(&missing), &TriageConfig::default(), &[]);
        assert_eq!(results.len(), 6);
        assert!(results[2..].iter().all(|r| !r.ok && r.detail.starts_with("Check could not run:")));
    }

    #[test]
    fn test_run_all_reports_bad_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.yaml"), "author: [unclosed").unwrap();
        let results = run_all(&pr("Add tool", ""), Some(dir.path()), &TriageConfig::default(), &[]);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "PR content language",
                "Package file",
                "Project structure",
                "Manifest parsing",
                "README language",
                "PRIVACY.md",
            ]
        );
        assert!(!results[3].ok);
    }

    #[test]
    fn test_run_all_runs_manifest_checks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.yaml"), "author: dify\nicon: icon.svg\n").unwrap();
        let results = run_all(&pr("Add tool", ""), Some(dir.path()), &TriageConfig::default(), &[]);
        let author = results.iter().find(|r| r.name == "Manifest author").unwrap();
        assert!(!author.ok);
        let icon = results.iter().find(|r| r.name == "Icon validation").unwrap();
        assert_eq!(icon.detail, "icon file not found: _assets/icon.svg");
    }
}
