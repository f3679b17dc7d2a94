//! Error taxonomy shared by the request client and the controllers.
//!
//! `Display` is the user-facing message: front-ends print `err.to_string()` as-is.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
  /// Local, pre-network rejection. The user corrects the input.
  #[error("{0}")]
  Validation(String),

  /// The call exceeded its budget and was cancelled.
  #[error("Request timed out. Please try again.")]
  Timeout,

  /// Server answered with a non-2xx status.
  #[error("{message}")]
  Http { status: u16, message: String },

  /// 2xx, but the body does not have the shape the caller needs.
  #[error("{0}")]
  MalformedResponse(String),

  /// Connection-level failure before any response.
  #[error("Network error: {0}")]
  Network(String),
}

impl ClientError {
  pub fn validation(msg: impl Into<String>) -> Self {
    ClientError::Validation(msg.into())
  }

  pub fn malformed(msg: impl Into<String>) -> Self {
    ClientError::MalformedResponse(msg.into())
  }

  /// Whether offering a "try again" action makes sense.
  pub fn is_retryable(&self) -> bool {
    matches!(self, ClientError::Timeout | ClientError::Http { .. } | ClientError::Network(_))
  }
}
