//! Minimal client for the study/interview backend.
//!
//! Every call is a JSON POST with a per-operation time budget. On expiry the in-flight
//! request is dropped and the call fails with `ClientError::Timeout`. Bodies are parsed
//! regardless of status; success bodies are returned untouched (callers check shape).
//!
//! Calls are instrumented and log operation, latency and response size (not contents).

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::{ClientConfig, Timeouts};
use crate::domain::StudyParams;
use crate::error::ClientError;
use crate::protocol::{extract_error_message, CodeSubmission, Operation, TheorySubmission};
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  pub base_url: String,
  pub timeouts: Timeouts,
}

impl ApiClient {
  pub fn new(cfg: &ClientConfig) -> Result<Self, ClientError> {
    // No client-wide timeout: budgets are per operation, see `post_json`.
    let client = reqwest::Client::builder()
      .build()
      .map_err(|e| ClientError::Network(e.to_string()))?;
    Ok(Self {
      client,
      base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
      timeouts: cfg.timeouts.clone(),
    })
  }

  fn url(&self, op: Operation) -> String {
    format!("{}{}", self.base_url, op.path())
  }

  fn budget(&self, op: Operation) -> Duration {
    match op {
      Operation::GenerateStudy => self.timeouts.generate_study(),
      Operation::StartInterview => self.timeouts.start_interview(),
      Operation::SubmitTheory => self.timeouts.submit_theory(),
      Operation::SubmitCode => self.timeouts.submit_code(),
    }
  }

  /// POST `body` to the operation's endpoint under its time budget.
  #[instrument(level = "info", skip(self, op, body), fields(op = op.name()))]
  async fn post_json<B: Serialize + ?Sized>(&self, op: Operation, body: &B) -> Result<Value, ClientError> {
    let url = self.url(op);
    let budget = self.budget(op);
    let start = Instant::now();

    let call = async {
      let res = self.client.post(&url)
        .header(USER_AGENT, "studyprep-client/0.1")
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .json(body)
        .send()
        .await
        .map_err(from_reqwest)?;
      let status = res.status();
      let bytes = res.bytes().await.map_err(from_reqwest)?;
      Ok::<_, ClientError>((status, bytes))
    };

    let (status, bytes) = match tokio::time::timeout(budget, call).await {
      Ok(Ok(out)) => out,
      Ok(Err(e)) => {
        error!(%url, elapsed = ?start.elapsed(), error = %e, "Request failed before a response");
        return Err(e);
      }
      Err(_) => {
        warn!(%url, ?budget, "Request exceeded its time budget; cancelled");
        return Err(ClientError::Timeout);
      }
    };

    // Non-JSON or empty body counts as "no body", never as a failure on its own.
    let parsed = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);

    if !status.is_success() {
      let message = extract_error_message(&parsed)
        .unwrap_or_else(|| op.fallback_message().to_string());
      error!(
        %url,
        status = status.as_u16(),
        elapsed = ?start.elapsed(),
        body_preview = %trunc_for_log(&String::from_utf8_lossy(&bytes), 200),
        "Backend returned failure status"
      );
      return Err(ClientError::Http { status: status.as_u16(), message });
    }

    info!(%url, status = status.as_u16(), elapsed = ?start.elapsed(), bytes = bytes.len(), "Backend response received");
    Ok(parsed)
  }

  pub async fn generate_study(&self, params: &StudyParams) -> Result<Value, ClientError> {
    self.post_json(Operation::GenerateStudy, params).await
  }

  pub async fn start_interview(&self, params: &StudyParams) -> Result<Value, ClientError> {
    self.post_json(Operation::StartInterview, params).await
  }

  pub async fn submit_theory(&self, payload: &TheorySubmission) -> Result<Value, ClientError> {
    self.post_json(Operation::SubmitTheory, payload).await
  }

  pub async fn submit_code(&self, payload: &CodeSubmission) -> Result<Value, ClientError> {
    self.post_json(Operation::SubmitCode, payload).await
  }
}

fn from_reqwest(e: reqwest::Error) -> ClientError {
  if e.is_timeout() {
    ClientError::Timeout
  } else {
    ClientError::Network(e.to_string())
  }
}
