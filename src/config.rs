//! Client Configuration
//!
//! Build-time defaults (`KANBAN_API_URL`, `KANBAN_PROJECT_ID`, `KANBAN_LOG`,
//! `KANBAN_ROLLBACK`) plus runtime overrides read from the page.

use kanban_core::{FailurePolicy, ProjectId};
use log::LevelFilter;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// localStorage key holding the bearer token
const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Board shown when the URL names none
    pub default_project_id: Option<String>,
    pub log_level: String,
    /// Undo optimistic moves the server rejects
    pub rollback_on_failure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            default_project_id: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            rollback_on_failure: false,
        }
    }
}

impl ClientConfig {
    pub fn from_build_env() -> Self {
        Self::from_vars(
            option_env!("KANBAN_API_URL"),
            option_env!("KANBAN_PROJECT_ID"),
            option_env!("KANBAN_LOG"),
            option_env!("KANBAN_ROLLBACK"),
        )
    }

    fn from_vars(
        api_url: Option<&str>,
        project_id: Option<&str>,
        log_level: Option<&str>,
        rollback: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
        let defaults = Self::default();
        Self {
            api_base_url: non_empty(api_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            default_project_id: non_empty(project_id),
            log_level: non_empty(log_level).unwrap_or(defaults.log_level),
            rollback_on_failure: matches!(non_empty(rollback).as_deref(), Some("1" | "true" | "yes")),
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.rollback_on_failure {
            FailurePolicy::RollbackOnFailure
        } else {
            FailurePolicy::KeepOptimistic
        }
    }

    /// Project named by the page URL, else the configured default
    pub fn current_project(&self) -> Option<ProjectId> {
        let hash = web_sys::window().and_then(|w| w.location().hash().ok());
        hash.as_deref()
            .and_then(project_from_hash)
            .or_else(|| self.default_project_id.clone().map(ProjectId::new))
    }
}

/// Parse `#/projects/<id>` (trailing segments ignored)
pub fn project_from_hash(hash: &str) -> Option<ProjectId> {
    let rest = hash.trim_start_matches('#').trim_start_matches('/');
    let raw = rest.strip_prefix("projects/")?.split('/').next()?;
    let id = percent_decode_str(raw).decode_utf8().ok()?;
    (!id.is_empty()).then(|| ProjectId::new(id.into_owned()))
}

/// Bearer token saved by the login screen, if any
pub fn auth_token() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(TOKEN_KEY).ok()?.filter(|t| !t.is_empty())
}
