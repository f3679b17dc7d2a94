//! Domain models: study parameters and material, interview session, answers, grading results.
//!
//! Field names follow the backend's camelCase JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::opaque_id;

/// Lifecycle of one request slot. At most one `InFlight` per slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
  #[default]
  Idle,
  InFlight,
  Succeeded,
  Failed,
}

impl RequestStatus {
  pub fn is_in_flight(&self) -> bool {
    matches!(self, RequestStatus::InFlight)
  }
}

/// Seniority the material and interview are pitched at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
  #[default]
  Junior,
  Mid,
  Senior,
}

impl Level {
  pub fn as_str(&self) -> &'static str {
    match self {
      Level::Junior => "Junior",
      Level::Mid => "Mid",
      Level::Senior => "Senior",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "junior" | "1" => Ok(Level::Junior),
      "mid" | "2" => Ok(Level::Mid),
      "senior" | "3" => Ok(Level::Senior),
      other => Err(format!("Unknown level '{}'. Choose Junior, Mid or Senior.", other)),
    }
  }
}

/// Submitted form values. Seeds both study generation and interview start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyParams {
  pub topic: String,
  pub level: Level,
  pub language: String,
}

/// Unsubmitted form values, restored after a reload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftParams {
  pub topic: String,
  pub level: Level,
}

impl DraftParams {
  /// Same (topic, level) pair as an already-submitted request?
  pub fn matches(&self, params: &StudyParams) -> bool {
    self.topic.trim() == params.topic && self.level == params.level
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyResult {
  pub definition: String,
  #[serde(default)]
  pub when_to_use: Vec<String>,
  pub example: CodeExample,
  pub complexity: Complexity,
  #[serde(default)]
  pub common_mistakes: Vec<String>,
  pub quiz: Vec<QuizQuestion>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
  pub code: String,
  #[serde(default)]
  pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complexity {
  pub average: String,
  pub worst: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: String,
}

/// The `lastStudy` session slot: a result is never stored without the params that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LastStudy {
  pub data: StudyResult,
  pub params: StudyParams,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
  #[serde(deserialize_with = "opaque_id")]
  pub interview_id: String,
  pub theory_questions: Vec<TheoryQuestion>,
  pub coding_question: CodingQuestion,
}

/// Correct answers are not part of this type; they only arrive in `TheoryResult`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TheoryQuestion {
  #[serde(deserialize_with = "opaque_id")]
  pub id: String,
  pub question: String,
  pub options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingQuestion {
  pub prompt: String,
  pub method_signature: String,
}

/// Question id -> selected option text.
pub type AnswerMap = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoryResult {
  pub total_questions: u32,
  pub correct_answers: u32,
  pub score_percentage: f64,
  #[serde(default)]
  pub results: Vec<PerQuestionResult>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerQuestionResult {
  #[serde(deserialize_with = "opaque_id")]
  pub question_id: String,
  #[serde(default)]
  pub question_text: String,
  #[serde(default)]
  pub user_answer: Option<String>,
  pub correct_answer: String,
  pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeEvaluation {
  pub passed: bool,
  pub score: f64,
  pub feedback: String,
}
