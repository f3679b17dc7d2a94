//! StudyPrep · terminal client for the interview-prep backend
//!
//! - Study material generation for a topic and level
//! - Multiple-choice theory interview, then a graded coding challenge
//! - Session storage so a restart with the same session id keeps the last result and draft
//!
//! Important env variables:
//!   STUDYPREP_API_BASE_URL : backend root (default "http://localhost:8080")
//!   STUDYPREP_CONFIG_PATH  : path to TOML config (base url, language, timeouts, session dir)
//!   STUDYPREP_SESSION_DIR  : enables directory-backed session storage
//!   STUDYPREP_SESSION_ID   : reuse a previous session's storage
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod protocol;
mod api;
mod session_store;
mod study;
mod interview;
mod code_challenge;
mod screens;
#[cfg(test)]
mod testkit;

use tracing::info;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::session_store::SessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = ClientConfig::from_env();
  let api = ApiClient::new(&cfg)?;
  let store = SessionStore::from_config(&cfg);
  info!(
    target: "studyprep",
    base_url = %api.base_url,
    language = %cfg.language,
    session_id = %store.session_id,
    "Client ready"
  );
  if cfg.session_dir.is_some() {
    println!("Session id: {} (set STUDYPREP_SESSION_ID to resume)", store.session_id);
  }

  tokio::select! {
    res = screens::run(&api, store.clone(), &cfg.language) => res?,
    _ = tokio::signal::ctrl_c() => {
      info!(target: "studyprep", "Interrupted");
    }
  }
  Ok(())
}
