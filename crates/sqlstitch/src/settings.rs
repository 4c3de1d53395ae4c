//! Builder settings.
//!
//! [`Settings`] is resolved once when a builder is constructed and never
//! changes for the lifetime of that builder (not even across `reset()`).
//!
//! Applications that want one shared default install it at startup:
//!
//! ```ignore
//! sqlstitch::Settings::new()
//!     .with_prefix(":")
//!     .with_reuse_parameters(true)
//!     .install()?;
//!
//! // Every `sqlstitch::builder()` / `sqlstitch::fluent()` now uses it.
//! let b = sqlstitch::builder();
//! ```
//!
//! Installation is a one-shot startup step: once a builder has read the
//! defaults (or another install succeeded) further installs fail.

use crate::error::{StitchError, StitchResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

static INSTALLED: OnceLock<Settings> = OnceLock::new();

/// Construction-time configuration of a builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix of generated parameter names (`p` → `p0`, `p1`, ...).
    pub name_template: String,
    /// Name pattern for collection-valued parameters. `{name}` expands to
    /// [`name_template`](Self::name_template) and `{n}` to the collection
    /// counter, so the default `{name}c{n}_` yields `pc0_`, `pc1_`, ...
    pub collection_template: String,
    /// Written before every parameter name in the SQL text.
    pub prefix: String,
    /// Share one parameter between equal values.
    pub reuse_parameters: bool,
    /// Emit clause keywords in lower case.
    pub lower_case_clauses: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name_template: "p".to_string(),
            collection_template: "{name}c{n}_".to_string(),
            prefix: "@".to_string(),
            reuse_parameters: false,
            lower_case_clauses: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_template(mut self, template: impl Into<String>) -> Self {
        self.name_template = template.into();
        self
    }

    pub fn with_collection_template(mut self, template: impl Into<String>) -> Self {
        self.collection_template = template.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_reuse_parameters(mut self, reuse: bool) -> Self {
        self.reuse_parameters = reuse;
        self
    }

    pub fn with_lower_case_clauses(mut self, lower: bool) -> Self {
        self.lower_case_clauses = lower;
        self
    }

    /// Check that generated names can be told apart.
    pub fn validate(&self) -> StitchResult<()> {
        if self.name_template.is_empty() {
            return Err(StitchError::config("name_template must not be empty"));
        }
        if self.prefix.is_empty() {
            return Err(StitchError::config("prefix must not be empty"));
        }
        if !self.collection_template.contains("{n}") {
            return Err(StitchError::config(format!(
                "collection_template must contain {{n}}, got '{}'",
                self.collection_template
            )));
        }
        Ok(())
    }

    /// Parse settings from TOML. Missing keys keep their defaults.
    ///
    /// ```toml
    /// prefix = ":"
    /// reuse_parameters = true
    /// ```
    pub fn from_toml_str(raw: &str) -> StitchResult<Self> {
        let settings: Settings = toml::from_str(raw)
            .map_err(|e| StitchError::config(format!("failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StitchResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StitchError::config(format!("failed to read settings {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Install these settings as the process-wide defaults.
    ///
    /// Call once during startup, before any builder is created.
    pub fn install(self) -> StitchResult<()> {
        self.validate()?;
        INSTALLED
            .set(self)
            .map_err(|_| StitchError::config("default settings are already installed"))
    }

    /// The installed defaults, or [`Settings::default`] if none were installed.
    pub fn current() -> &'static Settings {
        INSTALLED.get_or_init(Settings::default)
    }

    /// Apply per-builder overrides on top of these settings.
    pub fn apply(&self, options: &BuilderOptions) -> Settings {
        let mut settings = self.clone();
        if let Some(prefix) = &options.prefix {
            settings.prefix = prefix.clone();
        }
        if let Some(template) = &options.name_template {
            settings.name_template = template.clone();
        }
        if let Some(template) = &options.collection_template {
            settings.collection_template = template.clone();
        }
        if let Some(reuse) = options.reuse_parameters {
            settings.reuse_parameters = reuse;
        }
        if let Some(lower) = options.lower_case_clauses {
            settings.lower_case_clauses = lower;
        }
        settings
    }

    pub(crate) fn collection_name(&self, n: usize) -> String {
        self.collection_template
            .replace("{name}", &self.name_template)
            .replace("{n}", &n.to_string())
    }
}

/// Per-construction overrides. `None` keeps the base setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuilderOptions {
    pub name_template: Option<String>,
    pub collection_template: Option<String>,
    pub prefix: Option<String>,
    pub reuse_parameters: Option<bool>,
    pub lower_case_clauses: Option<bool>,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_template(mut self, template: impl Into<String>) -> Self {
        self.name_template = Some(template.into());
        self
    }

    pub fn collection_template(mut self, template: impl Into<String>) -> Self {
        self.collection_template = Some(template.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn reuse_parameters(mut self, reuse: bool) -> Self {
        self.reuse_parameters = Some(reuse);
        self
    }

    pub fn lower_case_clauses(mut self, lower: bool) -> Self {
        self.lower_case_clauses = Some(lower);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.name_template, "p");
        assert_eq!(s.prefix, "@");
        assert!(!s.reuse_parameters);
        assert!(!s.lower_case_clauses);
        assert_eq!(s.collection_name(0), "pc0_");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn toml_keeps_missing_defaults() {
        let s = Settings::from_toml_str("prefix = \":\"\nreuse_parameters = true\n").unwrap();
        assert_eq!(s.prefix, ":");
        assert!(s.reuse_parameters);
        assert_eq!(s.name_template, "p");
    }

    #[test]
    fn toml_rejects_invalid() {
        assert!(Settings::from_toml_str("prefix = \"\"").is_err());
        assert!(Settings::from_toml_str("collection_template = \"list\"").is_err());
        assert!(Settings::from_toml_str("prefix = 1").is_err());
    }

    #[test]
    fn options_override_base() {
        let base = Settings::new().with_prefix(":");
        let s = base.apply(&BuilderOptions::new().reuse_parameters(true));
        assert_eq!(s.prefix, ":");
        assert!(s.reuse_parameters);

        let s = base.apply(&BuilderOptions::new().prefix("$").name_template("arg"));
        assert_eq!(s.prefix, "$");
        assert_eq!(s.collection_name(3), "argc3_");

        let s = base.apply(&BuilderOptions::new().collection_template("{name}_list{n}"));
        assert_eq!(s.collection_name(1), "p_list1");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn validate_rejects_ambiguous_names() {
        let s = Settings::new().apply(&BuilderOptions::new().prefix("").name_template(""));
        assert!(s.validate().unwrap_err().to_string().contains("name_template"));

        let s = Settings::new().apply(&BuilderOptions::new().collection_template("list"));
        assert!(s.validate().is_err());
    }
}
