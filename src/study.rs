//! Study form controller: draft edits, topic validation, and study generation.
//!
//! This includes:
//!   - validating the draft before any network call
//!   - skipping Generate when the draft equals the last generated (topic, level)
//!   - allowing one generation in flight at a time
//!   - persisting drafts on edit and `{data, params}` after a valid result

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::domain::{DraftParams, LastStudy, Level, RequestStatus, StudyParams};
use crate::error::ClientError;
use crate::protocol::parse_study_result;
use crate::session_store::SessionStore;

/// Letter first, then letters/digits/whitespace/`+#.-`, at least 3 characters in total.
static TECHNICAL_TOPIC: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9\s+#.-]{2,}$").expect("static regex"));

pub const TOO_SHORT: &str = "Please enter a valid topic (at least 3 characters).";
pub const NO_LETTERS: &str = "Topic must contain letters.";
pub const NOT_TECHNICAL: &str = "Please enter a real technical topic.";
pub const ALREADY_GENERATING: &str = "Study material is already being generated. Please wait.";

/// Validate a raw topic and return it trimmed.
pub fn validate_topic(raw: &str) -> Result<String, ClientError> {
  let topic = raw.trim();
  if topic.chars().count() < 3 {
    return Err(ClientError::validation(TOO_SHORT));
  }
  if !topic.chars().any(|c| c.is_ascii_alphabetic()) {
    return Err(ClientError::validation(NO_LETTERS));
  }
  if !TECHNICAL_TOPIC.is_match(topic) {
    return Err(ClientError::validation(NOT_TECHNICAL));
  }
  Ok(topic.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
  Generated,
  /// Draft equals the last generated (topic, level); nothing was sent.
  Unchanged,
}

pub struct StudyController {
  store: SessionStore,
  language: String,
  draft: DraftParams,
  current: Option<LastStudy>,
  status: RequestStatus,
  pending: Option<StudyParams>,
  error: Option<String>,
}

impl StudyController {
  /// Reads both session slots once. Draft falls back to the last result's params.
  #[instrument(level = "info", skip_all)]
  pub fn init(store: SessionStore, language: impl Into<String>) -> Self {
    let current = store.load_last_study();
    let draft = store
      .load_draft()
      .or_else(|| {
        current.as_ref().map(|c| DraftParams { topic: c.params.topic.clone(), level: c.params.level })
      })
      .unwrap_or_default();
    info!(target: "study", restored_result = current.is_some(), draft_topic = %draft.topic, "Study controller initialised");
    Self {
      store,
      language: language.into(),
      draft,
      current,
      status: RequestStatus::Idle,
      pending: None,
      error: None,
    }
  }

  pub fn draft(&self) -> &DraftParams { &self.draft }
  pub fn current(&self) -> Option<&LastStudy> { self.current.as_ref() }
  pub fn error(&self) -> Option<&str> { self.error.as_deref() }
  pub fn is_loading(&self) -> bool { self.status.is_in_flight() }

  /// Generate control is only disabled while loading with nothing on screen yet.
  pub fn generate_enabled(&self) -> bool {
    !(self.is_loading() && self.current.is_none())
  }

  pub fn set_topic(&mut self, topic: &str) {
    self.draft.topic = topic.to_string();
    self.store.save_draft(&self.draft);
  }

  pub fn set_level(&mut self, level: Level) {
    self.draft.level = level;
    self.store.save_draft(&self.draft);
  }

  fn validated_params(&self) -> Result<StudyParams, ClientError> {
    let topic = validate_topic(&self.draft.topic)?;
    Ok(StudyParams { topic, level: self.draft.level, language: self.language.clone() })
  }

  /// Params to seed an interview with. Never blocked by the unchanged-draft check.
  pub fn interview_params(&mut self) -> Result<StudyParams, ClientError> {
    self.validated_params().map_err(|e| {
      self.error = Some(e.to_string());
      e
    })
  }

  /// First half of Generate: guards and validation. `Ok(None)` means nothing to send.
  pub fn begin_generate(&mut self) -> Result<Option<StudyParams>, ClientError> {
    if self.status.is_in_flight() {
      warn!(target: "study", "Generate rejected: a generation is already in flight");
      return Err(ClientError::validation(ALREADY_GENERATING));
    }
    let params = self.validated_params().map_err(|e| {
      self.error = Some(e.to_string());
      e
    })?;
    if let Some(current) = &self.current {
      if self.draft.matches(&current.params) {
        debug!(target: "study", topic = %params.topic, level = %params.level, "Draft unchanged since last generation; skipping");
        return Ok(None);
      }
    }
    self.status = RequestStatus::InFlight;
    self.pending = Some(params.clone());
    self.error = None;
    Ok(Some(params))
  }

  /// Second half of Generate: validate the body, then update state, then persist.
  pub fn complete_generate(&mut self, outcome: Result<Value, ClientError>) -> Result<(), ClientError> {
    let Some(params) = self.pending.take() else {
      warn!(target: "study", "Generation completed with nothing pending; ignoring");
      return Ok(());
    };
    match outcome.and_then(parse_study_result) {
      Ok(data) => {
        let record = LastStudy { data, params };
        info!(target: "study", topic = %record.params.topic, level = %record.params.level, quiz = record.data.quiz.len(), "Study material generated");
        self.store.save_last_study(&record);
        self.current = Some(record);
        self.status = RequestStatus::Succeeded;
        Ok(())
      }
      Err(e) => {
        warn!(target: "study", topic = %params.topic, error = %e, "Study generation failed");
        self.status = RequestStatus::Failed;
        self.error = Some(e.to_string());
        Err(e)
      }
    }
  }

  /// Forget the session's stored result and draft and start from an empty form.
  pub fn end_session(&mut self) {
    self.store.clear();
    self.draft = DraftParams::default();
    self.current = None;
    self.status = RequestStatus::Idle;
    self.pending = None;
    self.error = None;
    info!(target: "study", "Session storage cleared");
  }

  pub async fn generate(&mut self, api: &ApiClient) -> Result<GenerateOutcome, ClientError> {
    let Some(params) = self.begin_generate()? else {
      return Ok(GenerateOutcome::Unchanged);
    };
    let outcome = api.generate_study(&params).await;
    self.complete_generate(outcome)?;
    Ok(GenerateOutcome::Generated)
  }
}
