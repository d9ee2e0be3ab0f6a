//! Configuration loading and resolution.
//!
//! Every setting resolves explicit flag > environment variable > default.

use crate::acquisition::DEFAULT_USER_AGENT;
use profile_lens::{LensResult, RuleSet};
use std::path::PathBuf;
use std::sync::Arc;

pub const ENV_ADDR: &str = "PROFILE_LENS_ADDR";
pub const ENV_RULES: &str = "PROFILE_LENS_RULES";
pub const ENV_USER_AGENT: &str = "PROFILE_LENS_USER_AGENT";
pub const ENV_TIMEOUT_MS: &str = "PROFILE_LENS_TIMEOUT_MS";

pub const DEFAULT_ADDR: &str = "127.0.0.1:3200";

/// Rules file picked up from the working directory when nothing else is set.
const CWD_RULES: &str = ".profile-lens/rules.json";

/// Settings for the HTTP client and the rule tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensConfig {
    pub user_agent: String,
    pub timeout_ms: Option<u64>,
    pub rules_path: Option<PathBuf>,
}

impl LensConfig {
    /// Resolve client and rules settings from flags and the environment.
    pub fn resolve(
        user_agent: Option<&str>,
        timeout_ms: Option<u64>,
        rules: Option<&str>,
    ) -> Self {
        let user_agent = user_agent
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_USER_AGENT).ok())
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let timeout_ms = timeout_ms.or_else(|| {
            std::env::var(ENV_TIMEOUT_MS)
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
        });

        Self {
            user_agent,
            timeout_ms,
            rules_path: resolve_rules_path(rules),
        }
    }

    /// Load the configured rule tables, or the built-in ones.
    pub fn load_rules(&self) -> LensResult<Arc<RuleSet>> {
        match &self.rules_path {
            Some(path) => Ok(Arc::new(RuleSet::from_path(path)?)),
            None => Ok(Arc::new(RuleSet::builtin().clone())),
        }
    }
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: None,
            rules_path: None,
        }
    }
}

/// Resolve the listen address for `serve`.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    if let Ok(env_addr) = std::env::var(ENV_ADDR) {
        return env_addr;
    }

    DEFAULT_ADDR.to_string()
}

/// Resolve the rules file path. `None` means the built-in tables.
pub fn resolve_rules_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(ENV_RULES) {
        return Some(PathBuf::from(env_path));
    }

    let cwd_rules = PathBuf::from(CWD_RULES);
    cwd_rules.exists().then_some(cwd_rules)
}
