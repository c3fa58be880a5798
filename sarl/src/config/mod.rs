//! `sarl.toml` configuration
//!
//! ```toml
//! [early_exit]
//! callables = ["my.agent.Capacity.stop"]
//! events = ["io.sarl.api.core.Destroy"]
//!
//! [[discouraged]]
//! callable = "my.agent.Capacity.legacyStop"
//! message = "Use stop() instead"
//! level = "warning"
//!
//! [severity]
//! OBSOLETE_CAST = "ignore"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::CallableId;
use crate::error::{CompileError, IssueCode, Result, Severity};
use crate::registry::{CallIssueLevel, FeatureRegistry};

/// Configured level of an issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Error,
    Warning,
    Info,
    Ignore,
}

impl SeverityLevel {
    /// `None` when the issue is ignored
    pub fn severity(self) -> Option<Severity> {
        match self {
            SeverityLevel::Error => Some(Severity::Error),
            SeverityLevel::Warning => Some(Severity::Warning),
            SeverityLevel::Info => Some(Severity::Info),
            SeverityLevel::Ignore => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EarlyExitConfig {
    /// Fully qualified callables that terminate the calling agent
    pub callables: Vec<String>,
    /// Event types that terminate the receiving behavior
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscouragedConfig {
    pub callable: String,
    pub message: String,
    #[serde(default)]
    pub level: CallIssueLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SarlConfig {
    pub early_exit: EarlyExitConfig,
    pub discouraged: Vec<DiscouragedConfig>,
    /// Issue code (`OBSOLETE_CAST`) to level
    pub severity: BTreeMap<String, SeverityLevel>,
}

impl SarlConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::io_error(format!("Failed to read config {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SarlConfig = toml::from_str(text).map_err(|e| CompileError::config_error(e.to_string()))?;
        config.severity_overrides()?;
        Ok(config)
    }

    /// Parsed `[severity]` table
    pub fn severity_overrides(&self) -> Result<HashMap<IssueCode, SeverityLevel>> {
        self.severity
            .iter()
            .map(|(code, level)| {
                IssueCode::parse(code)
                    .map(|code| (code, *level))
                    .ok_or_else(|| CompileError::config_error(format!("unknown issue code '{code}' in [severity]")))
            })
            .collect()
    }

    /// Built-in registry extended with the configured declarations
    pub fn registry(&self) -> FeatureRegistry {
        let mut configured = FeatureRegistry::new();
        for callable in &self.early_exit.callables {
            configured.mark_early_exit(CallableId::new(callable.as_str()));
        }
        for event in &self.early_exit.events {
            configured.mark_early_exit_event(event.as_str());
        }
        for entry in &self.discouraged {
            configured.mark_discouraged(CallableId::new(entry.callable.as_str()), entry.message.as_str(), entry.level);
        }
        let mut registry = FeatureRegistry::builtin().clone();
        registry.extend(&configured);
        debug!(
            early_exit = self.early_exit.callables.len(),
            events = self.early_exit.events.len(),
            discouraged = self.discouraged.len(),
            "extended feature registry"
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FeatureSlot;

    const SAMPLE: &str = r#"
[early_exit]
callables = ["my.agent.Capacity.stop"]
events = ["io.sarl.api.core.Destroy"]

[[discouraged]]
callable = "my.agent.Capacity.legacyStop"
message = "Use stop() instead"
level = "error"

[severity]
OBSOLETE_CAST = "ignore"
POTENTIAL_INEFFICIENT_VALUE_CONVERSION = "info"
"#;

    #[test]
    fn test_parse_sample() {
        let config = SarlConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.early_exit.callables, vec!["my.agent.Capacity.stop"]);
        assert_eq!(config.discouraged[0].level, CallIssueLevel::Error);
        let overrides = config.severity_overrides().unwrap();
        assert_eq!(overrides[&IssueCode::ObsoleteCast], SeverityLevel::Ignore);
        assert_eq!(
            overrides[&IssueCode::PotentialInefficientValueConversion].severity(),
            Some(Severity::Info)
        );
    }

    #[test]
    fn test_registry_keeps_builtins() {
        let registry = SarlConfig::from_toml_str(SAMPLE).unwrap().registry();
        assert!(registry.is_early_exit(&CallableId::new("io.sarl.api.core.Lifecycle.killMe")));
        assert!(registry.is_early_exit(&CallableId::new("my.agent.Capacity.stop")));
        assert!(registry.is_early_exit_event("Destroy"));
        let slot = FeatureSlot::Linked(CallableId::new("my.agent.Capacity.legacyStop"));
        assert_eq!(registry.discouraged(&slot).unwrap().message, "Use stop() instead");
    }

    #[test]
    fn test_empty_config() {
        let config = SarlConfig::from_toml_str("").unwrap();
        assert_eq!(config, SarlConfig::default());
    }

    #[test]
    fn test_unknown_issue_code() {
        let err = SarlConfig::from_toml_str("[severity]\nNOT_A_CODE = \"error\"\n").unwrap_err();
        assert!(matches!(err, CompileError::Config { .. }));
        assert!(err.message().contains("NOT_A_CODE"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(SarlConfig::from_toml_str("[early_exit]\nfunctions = []\n").is_err());
    }

    #[test]
    fn test_default_discouraged_level() {
        let config =
            SarlConfig::from_toml_str("[[discouraged]]\ncallable = \"a.B.c\"\nmessage = \"no\"\n").unwrap();
        assert_eq!(config.discouraged[0].level, CallIssueLevel::Preference);
    }
}
