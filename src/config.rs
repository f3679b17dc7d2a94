//! Client configuration: backend root, per-operation timeouts, session storage location.
//!
//! Sources, in order: built-in defaults, optional TOML file at STUDYPREP_CONFIG_PATH,
//! then environment overrides (STUDYPREP_API_BASE_URL, STUDYPREP_LANGUAGE,
//! STUDYPREP_SESSION_DIR, STUDYPREP_SESSION_ID).

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LANGUAGE: &str = "Java";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  pub api_base_url: String,
  /// Sent with every StudyParams; the form has no control for it.
  pub language: String,
  pub timeouts: Timeouts,
  /// Where directory-backed session storage lives. None = in-memory for this run.
  pub session_dir: Option<PathBuf>,
  /// Reusing an id across runs restores the previous study result and draft.
  pub session_id: Option<String>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_base_url: DEFAULT_API_BASE_URL.into(),
      language: DEFAULT_LANGUAGE.into(),
      timeouts: Timeouts::default(),
      session_dir: None,
      session_id: None,
    }
  }
}

/// Upper bounds on wait time. Generative operations get longer budgets.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timeouts {
  pub generate_study_ms: u64,
  pub start_interview_ms: u64,
  pub submit_theory_ms: u64,
  pub submit_code_ms: u64,
}

impl Default for Timeouts {
  fn default() -> Self {
    Self {
      generate_study_ms: 20_000,
      start_interview_ms: 40_000,
      submit_theory_ms: 40_000,
      submit_code_ms: 20_000,
    }
  }
}

impl Timeouts {
  pub fn generate_study(&self) -> Duration { Duration::from_millis(self.generate_study_ms) }
  pub fn start_interview(&self) -> Duration { Duration::from_millis(self.start_interview_ms) }
  pub fn submit_theory(&self) -> Duration { Duration::from_millis(self.submit_theory_ms) }
  pub fn submit_code(&self) -> Duration { Duration::from_millis(self.submit_code_ms) }
}

impl ClientConfig {
  /// Defaults, then TOML file (if any), then env overrides.
  pub fn from_env() -> Self {
    let mut cfg = load_config_file_from_env().unwrap_or_default();
    cfg.apply_overrides(|key| std::env::var(key).ok());
    cfg
  }

  /// Apply overrides from a key lookup. Split out from `from_env` so tests
  /// don't have to mutate the process environment.
  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(url) = lookup("STUDYPREP_API_BASE_URL").filter(|s| !s.trim().is_empty()) {
      self.api_base_url = url;
    }
    if let Some(lang) = lookup("STUDYPREP_LANGUAGE").filter(|s| !s.trim().is_empty()) {
      self.language = lang;
    }
    if let Some(dir) = lookup("STUDYPREP_SESSION_DIR").filter(|s| !s.trim().is_empty()) {
      self.session_dir = Some(PathBuf::from(dir));
    }
    if let Some(id) = lookup("STUDYPREP_SESSION_ID").filter(|s| !s.trim().is_empty()) {
      self.session_id = Some(id);
    }
    self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
  }
}

/// Attempt to load `ClientConfig` from STUDYPREP_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_file_from_env() -> Option<ClientConfig> {
  let path = std::env::var("STUDYPREP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "studyprep", %path, "Loaded client config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "studyprep", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "studyprep", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_config(s: &str) -> Result<ClientConfig, toml::de::Error> {
  toml::from_str::<ClientConfig>(s)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[test]
  fn defaults_match_operation_budgets() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.api_base_url, "http://localhost:8080");
    assert_eq!(cfg.language, "Java");
    assert_eq!(cfg.timeouts.generate_study(), Duration::from_millis(20_000));
    assert_eq!(cfg.timeouts.start_interview(), Duration::from_millis(40_000));
    assert_eq!(cfg.timeouts.submit_theory(), Duration::from_millis(40_000));
    assert_eq!(cfg.timeouts.submit_code(), Duration::from_millis(20_000));
    assert!(cfg.session_dir.is_none());
  }

  #[test]
  fn partial_toml_keeps_remaining_defaults() {
    let cfg = parse_config(
      r#"
api_base_url = "https://prep.example.com"

[timeouts]
start_interview_ms = 60000
"#,
    )
    .unwrap();
    assert_eq!(cfg.api_base_url, "https://prep.example.com");
    assert_eq!(cfg.language, "Java");
    assert_eq!(cfg.timeouts.start_interview_ms, 60_000);
    assert_eq!(cfg.timeouts.generate_study_ms, 20_000);
  }

  #[test]
  fn env_overrides_win_and_trailing_slash_is_trimmed() {
    let vars: HashMap<&str, &str> = HashMap::from([
      ("STUDYPREP_API_BASE_URL", "http://10.0.0.5:9000/"),
      ("STUDYPREP_SESSION_DIR", "/tmp/prep"),
      ("STUDYPREP_SESSION_ID", "tab-1"),
      ("STUDYPREP_LANGUAGE", ""),
    ]);
    let mut cfg = ClientConfig::default();
    cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.api_base_url, "http://10.0.0.5:9000");
    assert_eq!(cfg.session_dir, Some(PathBuf::from("/tmp/prep")));
    assert_eq!(cfg.session_id.as_deref(), Some("tab-1"));
    assert_eq!(cfg.language, "Java");
  }
}
