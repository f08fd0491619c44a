//! Plugin `manifest.yaml` and the checks that read it.

use super::CheckResult;
use crate::error::AppError;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Marker the marketplace template embeds in its placeholder icon.
pub const TEMPLATE_ICON_MARKER: &str = "DIFY_MARKETPLACE_TEMPLATE_ICON_DO_NOT_USE";

/// Icon shipped by the plugin scaffold. Compared with whitespace ignored.
pub const DEFAULT_ICON: &str = r#"<svg width="100" height="100" xmlns="http://www.w3.org/2000/svg">
  <path d="M20 20 V80 M20 20 H60 Q80 20 80 40 T60 60 H20"
        fill="none"
        stroke="black"
        stroke-width="5"/>
</svg>"#;

/// Top-level manifest fields the review looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginManifest {
    pub author: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub icon: Option<String>,
}

impl PluginManifest {
    /// Load `manifest.yaml` from an unpacked plugin directory.
    pub fn load(plugin_dir: &Path) -> Result<Self, AppError> {
        let path = plugin_dir.join("manifest.yaml");
        let content = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::not_found(format!(
                    "manifest.yaml not found: {}",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, AppError> {
        let mapping = match serde_yaml::from_str::<Value>(content)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => return Err(AppError::parse("manifest.yaml must be a mapping")),
        };
        Ok(Self {
            author: scalar(&mapping, "author"),
            name: scalar(&mapping, "name"),
            version: scalar(&mapping, "version"),
            icon: scalar(&mapping, "icon"),
        })
    }
}

// `version: 1.0` parses as a float, so any scalar is read back as text.
fn scalar(mapping: &Mapping, key: &str) -> Option<String> {
    let text = match mapping.get(key)? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// The manifest author must not claim to be the Dify team.
pub fn manifest_author(manifest: &PluginManifest) -> CheckResult {
    const NAME: &str = "Manifest author";

    let author = manifest.author.as_deref().unwrap_or_default().to_lowercase();
    if author.contains("langgenius") || author.contains("dify") {
        CheckResult::fail(
            NAME,
            "manifest.yaml author must not contain 'langgenius' or 'dify'.",
        )
    } else {
        CheckResult::pass(NAME, "author is valid.")
    }
}

/// The icon must exist under `_assets/` and must not be the scaffold placeholder.
pub fn icon(plugin_dir: &Path, manifest: &PluginManifest) -> CheckResult {
    const NAME: &str = "Icon validation";

    let Some(icon_name) = manifest.icon.as_deref() else {
        return CheckResult::fail(NAME, "manifest.yaml icon field is empty.");
    };

    let icon_path = plugin_dir.join("_assets").join(icon_name);
    let content = match fs::read(&icon_path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => {
            return CheckResult::fail(NAME, format!("icon file not found: _assets/{icon_name}"));
        }
    };

    if content.contains(TEMPLATE_ICON_MARKER) {
        return CheckResult::fail(NAME, "icon contains template placeholder marker.");
    }
    if strip_whitespace(&content) == strip_whitespace(DEFAULT_ICON) {
        return CheckResult::fail(
            NAME,
            "icon matches default template icon and must be customized.",
        );
    }
    CheckResult::pass(NAME, format!("icon exists: _assets/{icon_name}"))
}
