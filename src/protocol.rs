//! Backend operations, request payloads and response shape checks (serde ready).
//!
//! The request client returns bodies untouched; callers run them through the
//! `parse_*` functions here before any state changes.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    AnswerMap, CodeEvaluation, InterviewSession, StudyResult, TheoryResult,
};
use crate::error::ClientError;

/// Interviews always carry this many theory questions.
pub const THEORY_QUESTION_COUNT: usize = 5;

/// Marker the backend puts at the start of `definition` when the topic is rejected.
pub const INVALID_TOPIC_SENTINEL: &str = "INVALID_TOPIC";

pub const STUDY_FALLBACK_MESSAGE: &str = "Please enter a real software engineering topic.";
pub const MALFORMED_RESPONSE: &str = "Malformed response";

/// The four backend calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    GenerateStudy,
    StartInterview,
    SubmitTheory,
    SubmitCode,
}

impl Operation {
    pub fn path(&self) -> &'static str {
        match self {
            Operation::GenerateStudy => "/api/study/generate",
            Operation::StartInterview => "/api/interview/start",
            Operation::SubmitTheory => "/api/interview/submit-theory",
            Operation::SubmitCode => "/api/interview/submit-code",
        }
    }

    /// Used when a failed response carries no `message`/`error` field.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::GenerateStudy => "Failed to generate study material",
            Operation::StartInterview => "Failed to start interview",
            Operation::SubmitTheory => "Failed to submit answers",
            Operation::SubmitCode => "Code submission failed",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::GenerateStudy => "generate_study",
            Operation::StartInterview => "start_interview",
            Operation::SubmitTheory => "submit_theory",
            Operation::SubmitCode => "submit_code",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TheorySubmission {
    pub interview_id: String,
    pub answers: AnswerMap,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSubmission {
    pub interview_id: String,
    pub code: String,
}

/// `message`, then `error`, from an error body.
pub fn extract_error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|k| body.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn is_invalid_topic(definition: &str) -> bool {
    definition
        .trim()
        .get(..INVALID_TOPIC_SENTINEL.len())
        .map(|head| head.eq_ignore_ascii_case(INVALID_TOPIC_SENTINEL))
        .unwrap_or(false)
}

/// Text the server attached after the sentinel ("INVALID_TOPIC: cooking is not ..."), if any.
fn sentinel_detail(definition: &str) -> Option<String> {
    let rest = definition.trim().get(INVALID_TOPIC_SENTINEL.len()..)?;
    let rest = rest.trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
    if rest.is_empty() { None } else { Some(rest.to_string()) }
}

/// A study result is usable when it has a real definition and at least one quiz question.
pub fn is_usable_study(result: &StudyResult) -> bool {
    !result.definition.trim().is_empty()
        && !is_invalid_topic(&result.definition)
        && !result.quiz.is_empty()
}

pub fn parse_study_result(body: Value) -> Result<StudyResult, ClientError> {
    let definition = body
        .get("definition")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let has_quiz = body
        .get("quiz")
        .and_then(Value::as_array)
        .map(|q| !q.is_empty())
        .unwrap_or(false);

    if definition.is_empty() || is_invalid_topic(&definition) || !has_quiz {
        let message = if definition.is_empty() {
            STUDY_FALLBACK_MESSAGE.to_string()
        } else if is_invalid_topic(&definition) {
            sentinel_detail(&definition).unwrap_or_else(|| STUDY_FALLBACK_MESSAGE.to_string())
        } else {
            definition
        };
        return Err(ClientError::MalformedResponse(message));
    }

    serde_json::from_value::<StudyResult>(body)
        .map_err(|_| ClientError::malformed(STUDY_FALLBACK_MESSAGE))
}

pub fn parse_interview_session(body: Value) -> Result<InterviewSession, ClientError> {
    let session: InterviewSession = serde_json::from_value(body)
        .map_err(|e| ClientError::malformed(format!("{}: {}", MALFORMED_RESPONSE, e)))?;

    if session.interview_id.trim().is_empty() {
        return Err(ClientError::malformed(format!("{}: missing interviewId", MALFORMED_RESPONSE)));
    }
    if session.theory_questions.len() != THEORY_QUESTION_COUNT {
        return Err(ClientError::malformed(format!(
            "{}: expected {} theory questions, got {}",
            MALFORMED_RESPONSE,
            THEORY_QUESTION_COUNT,
            session.theory_questions.len()
        )));
    }
    for q in &session.theory_questions {
        if q.id.trim().is_empty() || q.question.trim().is_empty() || q.options.len() < 2 {
            return Err(ClientError::malformed(format!(
                "{}: incomplete theory question '{}'",
                MALFORMED_RESPONSE, q.id
            )));
        }
    }
    let cq = &session.coding_question;
    if cq.prompt.trim().is_empty() || cq.method_signature.trim().is_empty() {
        return Err(ClientError::malformed(format!("{}: incomplete coding question", MALFORMED_RESPONSE)));
    }
    Ok(session)
}

/// Grading must cover every theory question of `session`, with totals that agree.
pub fn parse_theory_result(body: Value, session: &InterviewSession) -> Result<TheoryResult, ClientError> {
    let result: TheoryResult = serde_json::from_value(body)
        .map_err(|e| ClientError::malformed(format!("{}: {}", MALFORMED_RESPONSE, e)))?;

    if result.results.is_empty() {
        return Err(ClientError::malformed(format!("{}: no per-question results", MALFORMED_RESPONSE)));
    }
    if result.total_questions as usize != result.results.len() {
        return Err(ClientError::malformed(format!(
            "{}: totalQuestions is {} but {} results were sent",
            MALFORMED_RESPONSE,
            result.total_questions,
            result.results.len()
        )));
    }
    if result.correct_answers > result.total_questions {
        return Err(ClientError::malformed(format!(
            "{}: correctAnswers exceeds totalQuestions",
            MALFORMED_RESPONSE
        )));
    }
    if let Some(q) = session
        .theory_questions
        .iter()
        .find(|q| !result.results.iter().any(|r| r.question_id == q.id))
    {
        return Err(ClientError::malformed(format!(
            "{}: no result for question '{}'",
            MALFORMED_RESPONSE, q.id
        )));
    }
    Ok(result)
}

/// Strict: `passed` must be a bool, `score` a number, `feedback` a string.
pub fn parse_code_evaluation(body: Value) -> Result<CodeEvaluation, ClientError> {
    let passed = body.get("passed").and_then(Value::as_bool);
    let score = body.get("score").and_then(Value::as_f64);
    let feedback = body.get("feedback").and_then(Value::as_str);
    match (passed, score, feedback) {
        (Some(passed), Some(score), Some(feedback)) => Ok(CodeEvaluation {
            passed,
            score,
            feedback: feedback.to_string(),
        }),
        _ => Err(ClientError::malformed(MALFORMED_RESPONSE)),
    }
}
