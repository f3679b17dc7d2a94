//! Coding challenge: edit a method body, submit for grading, reset and try again.

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::domain::{CodeEvaluation, CodingQuestion, RequestStatus};
use crate::error::ClientError;
use crate::interview::CodeChallengeHandoff;
use crate::protocol::{parse_code_evaluation, CodeSubmission};

pub const STARTER_TEMPLATE: &str = "{\n    // TODO: implement\n}";
pub const IMPLEMENT_FIRST: &str = "Please implement a solution before submitting.";
pub const ALREADY_SUBMITTING: &str = "Submission already in progress.";

pub struct CodeChallenge {
    interview_id: String,
    question: CodingQuestion,
    code: String,
    status: RequestStatus,
    evaluation: Option<CodeEvaluation>,
    error: Option<String>,
}

impl CodeChallenge {
    pub fn new(handoff: CodeChallengeHandoff) -> Self {
        Self {
            interview_id: handoff.interview_id,
            question: handoff.coding_question,
            code: STARTER_TEMPLATE.to_string(),
            status: RequestStatus::Idle,
            evaluation: None,
            error: None,
        }
    }

    pub fn question(&self) -> &CodingQuestion { &self.question }
    pub fn code(&self) -> &str { &self.code }
    #[allow(dead_code)]
    pub fn evaluation(&self) -> Option<&CodeEvaluation> { self.evaluation.as_ref() }
    #[allow(dead_code)]
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    #[allow(dead_code)]
    pub fn is_loading(&self) -> bool { self.status.is_in_flight() }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Editor "Reset": starter body back, results untouched.
    pub fn restore_template(&mut self) {
        self.code = STARTER_TEMPLATE.to_string();
    }

    /// "Start over": starter body back and previous result/error cleared.
    pub fn reset(&mut self) {
        self.restore_template();
        self.evaluation = None;
        self.error = None;
        self.status = RequestStatus::Idle;
    }

    pub fn begin_submit(&mut self) -> Result<CodeSubmission, ClientError> {
        if self.status.is_in_flight() {
            return Err(ClientError::validation(ALREADY_SUBMITTING));
        }
        if self.code.trim().is_empty() || self.code.trim() == STARTER_TEMPLATE {
            self.error = Some(IMPLEMENT_FIRST.to_string());
            return Err(ClientError::validation(IMPLEMENT_FIRST));
        }
        self.status = RequestStatus::InFlight;
        self.error = None;
        Ok(CodeSubmission { interview_id: self.interview_id.clone(), code: self.code.clone() })
    }

    pub fn complete_submit(&mut self, outcome: Result<Value, ClientError>) -> Result<&CodeEvaluation, ClientError> {
        match outcome.and_then(parse_code_evaluation) {
            Ok(eval) => {
                info!(target: "interview", interview_id = %self.interview_id, passed = eval.passed, score = eval.score, "Code evaluated");
                self.status = RequestStatus::Succeeded;
                Ok(self.evaluation.insert(eval))
            }
            Err(e) => {
                warn!(target: "interview", interview_id = %self.interview_id, error = %e, "Code submission failed");
                self.status = RequestStatus::Failed;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    #[instrument(level = "info", skip(self, api), fields(interview_id = %self.interview_id, code_len = self.code.len()))]
    pub async fn submit(&mut self, api: &ApiClient) -> Result<&CodeEvaluation, ClientError> {
        let payload = self.begin_submit()?;
        let outcome = api.submit_code(&payload).await;
        self.complete_submit(outcome)
    }
}
