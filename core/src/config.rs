//! Policy configuration.
//!
//! Every field has a default matching the repositories' published policies,
//! so an absent config file is not an error. Resolution order:
//!
//! ```text
//! --config <path>          explicit, must exist
//! $TRIAGE_CONFIG           explicit, must exist
//! ~/.triage/config.json    optional
//! built-in defaults
//! ```

use crate::error::AppError;
use crate::language::{CjkScope, ClassifyOptions, Threshold};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fraction of CJK content at which an issue is closed for language.
pub const DEFAULT_CJK_RATIO_THRESHOLD: f64 = 0.20;

/// Bilingual notice sentences that issue and PR templates ship with.
pub const DEFAULT_EXCEPTION_PHRASES: &[&str] = &[
    "【中文用户 & Non English User】请使用英语提交，否则会被关闭 ：）",
    "请务必使用英文提交 Issue，否则会被关闭。谢谢！:)",
];

pub const DEFAULT_PLUGIN_REPOS: &[&str] =
    &["langgenius/dify-plugins", "langgenius/dify-official-plugins"];
pub const DEFAULT_CORE_REPO: &str = "langgenius/dify";
pub const DEFAULT_WEBAPP_REPOS: &[&str] = &[
    "langgenius/webapp-conversation",
    "langgenius/webapp-text-generator",
];
pub const DEFAULT_TRUSTED_ASSOCIATIONS: &[&str] = &["OWNER", "MEMBER", "COLLABORATOR", "CONTRIBUTOR"];
pub const DEFAULT_MIN_DIFY_VERSION: &str = "1.10.0";

const CONFIG_ENV: &str = "TRIAGE_CONFIG";

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TriageConfig {
    pub cjk_ratio_threshold: f64,
    pub readme_max_cjk: usize,
    pub pr_content_max_cjk: usize,
    pub exception_phrases: Vec<String>,
    /// Characters counted as CJK when moderating issues.
    pub issue_cjk_scope: CjkScope,
    /// Characters counted as CJK in PR content and README checks.
    pub review_cjk_scope: CjkScope,
    pub plugin_repos: Vec<String>,
    pub core_repo: String,
    pub webapp_repos: Vec<String>,
    pub trusted_associations: Vec<String>,
    pub min_dify_version: String,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            cjk_ratio_threshold: DEFAULT_CJK_RATIO_THRESHOLD,
            readme_max_cjk: 0,
            pr_content_max_cjk: 0,
            exception_phrases: owned(DEFAULT_EXCEPTION_PHRASES),
            issue_cjk_scope: CjkScope::Broad,
            review_cjk_scope: CjkScope::Han,
            plugin_repos: owned(DEFAULT_PLUGIN_REPOS),
            core_repo: DEFAULT_CORE_REPO.to_owned(),
            webapp_repos: owned(DEFAULT_WEBAPP_REPOS),
            trusted_associations: owned(DEFAULT_TRUSTED_ASSOCIATIONS),
            min_dify_version: DEFAULT_MIN_DIFY_VERSION.to_owned(),
        }
    }
}

impl TriageConfig {
    /// Load from an explicit path. The file must exist and parse.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(e.to_string(), path.display().to_string()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::config(e.to_string(), path.display().to_string()))?;
        config
            .validate()
            .map_err(|message| AppError::config(message, path.display().to_string()))?;
        log::debug!("[config] Loaded {}", path.display());
        Ok(config)
    }

    /// Resolve the effective configuration (see module docs for the order).
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("[config] No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject values that would silently disable a check.
    pub fn validate(&self) -> Result<(), String> {
        let ratio = self.cjk_ratio_threshold;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(format!(
                "cjkRatioThreshold must be a fraction between 0 and 1, got {ratio}"
            ));
        }
        Ok(())
    }

    pub fn is_plugin_repo(&self, repo: &str) -> bool {
        self.plugin_repos.iter().any(|r| r == repo)
    }

    /// The core repo and its webapp siblings share one moderation path.
    pub fn is_core_like_repo(&self, repo: &str) -> bool {
        self.core_repo == repo || self.webapp_repos.iter().any(|r| r == repo)
    }

    pub fn is_supported_repo(&self, repo: &str) -> bool {
        self.is_plugin_repo(repo) || self.is_core_like_repo(repo)
    }

    pub fn is_trusted_association(&self, association: &str) -> bool {
        self.trusted_associations
            .iter()
            .any(|a| a.eq_ignore_ascii_case(association))
    }

    /// Options for issue moderation: ratio mode, Self Checks excluded.
    pub fn issue_language_options(&self) -> ClassifyOptions {
        ClassifyOptions::new(Threshold::Ratio(self.cjk_ratio_threshold))
            .with_exceptions(self.exception_phrases.iter().cloned())
            .excluding_self_checks(true)
            .with_scope(self.issue_cjk_scope)
    }

    /// Options for PR title/body: absolute-count mode with the allowlist and
    /// any caller-supplied extra snippets.
    pub fn pr_content_options(&self, extra_snippets: &[String]) -> ClassifyOptions {
        ClassifyOptions::new(Threshold::MaxCount(self.pr_content_max_cjk))
            .with_exceptions(self.exception_phrases.iter().chain(extra_snippets).cloned())
            .excluding_self_checks(true)
            .stripping_code_blocks(true)
            .collapsing_whitespace(true)
            .with_scope(self.review_cjk_scope)
    }

    /// Options for a plugin README: absolute-count mode, no allowlist.
    pub fn readme_options(&self) -> ClassifyOptions {
        ClassifyOptions::new(Threshold::MaxCount(self.readme_max_cjk))
            .stripping_code_blocks(true)
            .with_scope(self.review_cjk_scope)
    }
}

/// `~/.triage/config.json`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".triage").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.exception_phrases.len(), 2);
        assert!(config.is_plugin_repo("langgenius/dify-plugins"));
        assert!(config.is_core_like_repo("langgenius/webapp-conversation"));
        assert!(!config.is_supported_repo("langgenius/dify-docs"));
        assert!(config.is_trusted_association("member"));
        assert!(!config.is_trusted_association("NONE"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"readmeMaxCjk": 5, "reviewCjkScope": "broad"}}"#).unwrap();

        let config = TriageConfig::from_file(file.path()).unwrap();
        assert_eq!(config.readme_max_cjk, 5);
        assert_eq!(config.review_cjk_scope, CjkScope::Broad);
        assert_eq!(config.issue_cjk_scope, CjkScope::Broad);
        assert_eq!(config.core_repo, DEFAULT_CORE_REPO);
        assert!((config.cjk_ratio_threshold - 0.20).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        match TriageConfig::load(Some(file.path())) {
            Err(AppError::Config { path, .. }) => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(TriageConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_issue_options() {
        let options = TriageConfig::default().issue_language_options();
        assert_eq!(options.exception_phrases.len(), 2);
        assert!(options.exclude_self_checks);
        assert_eq!(options.threshold, Threshold::Ratio(0.20));
        assert_eq!(options.scope, CjkScope::Broad);
    }

    #[test]
    fn test_self_checks_phrase_outside_section_still_counts() {
        let options = TriageConfig::default().issue_language_options();
        let result = crate::language::classify("Bug\n我已阅读并同意", &options);
        assert_eq!(result.cjk_count, 7);
        assert!(result.violates);
    }

    #[test]
    fn test_out_of_range_ratio_is_config_error() {
        for bad in ["20", "-0.1", "1.5"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{"cjkRatioThreshold": {bad}}}"#).unwrap();

            match TriageConfig::from_file(file.path()) {
                Err(AppError::Config { message, .. }) => {
                    assert!(message.contains("cjkRatioThreshold"), "{message}");
                }
                other => panic!("expected config error for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_boundary_ratios_are_accepted() {
        for ok in [0.0, 1.0] {
            let config = TriageConfig {
                cjk_ratio_threshold: ok,
                ..TriageConfig::default()
            };
            assert!(config.validate().is_ok());
        }
        let nan = TriageConfig {
            cjk_ratio_threshold: f64::NAN,
            ..TriageConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_pr_content_options_append_extra_snippets() {
        let options = TriageConfig::default().pr_content_options(&["自定义".to_owned()]);
        assert_eq!(options.exception_phrases.last().map(String::as_str), Some("自定义"));
        assert_eq!(options.threshold, Threshold::MaxCount(0));
        assert!(options.collapse_whitespace);
    }
}
