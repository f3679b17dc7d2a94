//! Interview flow as an explicit state machine.
//!
//! Phases only move forward: Intro -> Theory -> Review -> Result, then out to the code
//! challenge (or back to study, which starts over with a new machine).
//!
//! `InterviewMachine::apply` is the single transition function. It never performs I/O;
//! network work is returned as `Effect`s, run by `execute`, and fed back as completion
//! events. `drive` wires the two together for callers that just want the next screen.

use std::collections::VecDeque;
use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::domain::{
    AnswerMap, CodingQuestion, InterviewSession, PerQuestionResult, RequestStatus, StudyParams,
    TheoryResult,
};
use crate::error::ClientError;
use crate::protocol::{parse_interview_session, parse_theory_result, TheorySubmission, MALFORMED_RESPONSE};
use crate::util::plural;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Theory,
    Review,
    Result,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Intro => "intro",
            Phase::Theory => "theory",
            Phase::Review => "review",
            Phase::Result => "result",
        })
    }
}

/// What the code challenge needs from a finished interview.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeChallengeHandoff {
    pub interview_id: String,
    pub coding_question: CodingQuestion,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    StartInterview(StudyParams),
    SubmitTheory(TheorySubmission),
    OpenCodeChallenge(CodeChallengeHandoff),
    ReturnToStudy,
}

#[derive(Clone, Debug)]
pub enum Event {
    /// Intro: user confirms the start.
    Begin,
    /// Theory: manual retry after a failed start.
    RetryStart,
    StartCompleted(Result<Value, ClientError>),
    Select { question_id: String, option: String },
    Submit,
    SubmitCompleted(Result<Value, ClientError>),
    /// Review: "Continue to score".
    ContinueToScore,
    BackToStudy,
    ContinueToCode,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Begin => "begin",
            Event::RetryStart => "retry_start",
            Event::StartCompleted(_) => "start_completed",
            Event::Select { .. } => "select",
            Event::Submit => "submit",
            Event::SubmitCompleted(_) => "submit_completed",
            Event::ContinueToScore => "continue_to_score",
            Event::BackToStudy => "back_to_study",
            Event::ContinueToCode => "continue_to_code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterviewError {
    /// Local rejection with a message for the user. State is unchanged.
    #[error("{0}")]
    Rejected(String),
    #[error("'{event}' is not valid during the {phase} phase")]
    InvalidTransition { phase: Phase, event: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceLabel {
    Strong,
    Fair,
    NeedsImprovement,
}

impl PerformanceLabel {
    /// Lower edge of each tier is inclusive.
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            PerformanceLabel::Strong
        } else if score >= 60.0 {
            PerformanceLabel::Fair
        } else {
            PerformanceLabel::NeedsImprovement
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            PerformanceLabel::Strong => "Strong performance",
            PerformanceLabel::Fair => "Fair performance",
            PerformanceLabel::NeedsImprovement => "Needs improvement",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewOption {
    pub text: String,
    pub selected: bool,
    pub is_correct: bool,
}

/// One theory question with the grading merged in.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewItem {
    pub question_id: String,
    pub question: String,
    pub options: Vec<ReviewOption>,
    pub user_answer: Option<String>,
    pub correct_answer: Option<String>,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreSummary {
    pub total: u32,
    pub correct: u32,
    pub missed: u32,
    pub score_percentage: f64,
    pub label: PerformanceLabel,
    pub missed_questions: Vec<PerQuestionResult>,
}

pub struct InterviewMachine {
    params: StudyParams,
    phase: Phase,
    start: RequestStatus,
    session: Option<InterviewSession>,
    answers: AnswerMap,
    submit: RequestStatus,
    result: Option<TheoryResult>,
    error: Option<String>,
    closed: bool,
}

impl InterviewMachine {
    pub fn new(params: StudyParams) -> Self {
        Self {
            params,
            phase: Phase::Intro,
            start: RequestStatus::Idle,
            session: None,
            answers: AnswerMap::new(),
            submit: RequestStatus::Idle,
            result: None,
            error: None,
            closed: false,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }
    pub fn params(&self) -> &StudyParams { &self.params }
    pub fn session(&self) -> Option<&InterviewSession> { self.session.as_ref() }
    pub fn answers(&self) -> &AnswerMap { &self.answers }
    #[allow(dead_code)]
    pub fn theory_result(&self) -> Option<&TheoryResult> { self.result.as_ref() }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    pub fn start_status(&self) -> RequestStatus { self.start }
    #[allow(dead_code)]
    pub fn submit_status(&self) -> RequestStatus { self.submit }
    #[allow(dead_code)]
    pub fn is_closed(&self) -> bool { self.closed }

    /// Theory questions still without a selection.
    pub fn unanswered(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| {
                s.theory_questions
                    .iter()
                    .filter(|q| !self.answers.contains_key(&q.id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// The single transition function. See the module docs for the table.
    #[instrument(level = "debug", skip(self, event), fields(phase = %self.phase, event = event.name()))]
    pub fn apply(&mut self, event: Event) -> Result<Vec<Effect>, InterviewError> {
        if self.closed {
            return Err(self.invalid(&event));
        }
        match (self.phase, event) {
            (Phase::Intro, Event::Begin) => {
                self.enter(Phase::Theory);
                Ok(vec![self.begin_start()])
            }
            (Phase::Theory, Event::RetryStart) => match self.start {
                RequestStatus::InFlight => {
                    Err(InterviewError::Rejected("The interview is already starting.".into()))
                }
                RequestStatus::Succeeded => {
                    debug!(target: "interview", "Start already succeeded for this entry; ignoring retry");
                    Ok(vec![])
                }
                RequestStatus::Idle | RequestStatus::Failed => Ok(vec![self.begin_start()]),
            },
            (Phase::Theory, Event::StartCompleted(outcome)) if self.start.is_in_flight() => {
                self.complete_start(outcome);
                Ok(vec![])
            }
            (Phase::Theory, Event::Select { question_id, option }) => {
                self.select(question_id, option)?;
                Ok(vec![])
            }
            (Phase::Theory, Event::Submit) => self.begin_submit().map(|e| vec![e]),
            (Phase::Theory, Event::SubmitCompleted(outcome)) if self.submit.is_in_flight() => {
                self.complete_submit(outcome);
                Ok(vec![])
            }
            (Phase::Review, Event::ContinueToScore) => {
                self.enter(Phase::Result);
                Ok(vec![])
            }
            (Phase::Result, Event::BackToStudy) => {
                self.closed = true;
                info!(target: "interview", "Leaving interview for the study page");
                Ok(vec![Effect::ReturnToStudy])
            }
            (Phase::Result, Event::ContinueToCode) => {
                let session = self.session.as_ref().ok_or_else(|| {
                    InterviewError::Rejected("Interview session is missing.".into())
                })?;
                let handoff = CodeChallengeHandoff {
                    interview_id: session.interview_id.clone(),
                    coding_question: session.coding_question.clone(),
                };
                self.closed = true;
                info!(target: "interview", interview_id = %handoff.interview_id, "Handing off to the code challenge");
                Ok(vec![Effect::OpenCodeChallenge(handoff)])
            }
            (_, event) => Err(self.invalid(&event)),
        }
    }

    fn invalid(&self, event: &Event) -> InterviewError {
        warn!(target: "interview", phase = %self.phase, event = event.name(), "Rejected event with no transition");
        InterviewError::InvalidTransition { phase: self.phase, event: event.name() }
    }

    fn enter(&mut self, next: Phase) {
        info!(target: "interview", from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
    }

    fn begin_start(&mut self) -> Effect {
        self.start = RequestStatus::InFlight;
        self.error = None;
        Effect::StartInterview(self.params.clone())
    }

    fn complete_start(&mut self, outcome: Result<Value, ClientError>) {
        match outcome.and_then(parse_interview_session) {
            Ok(session) => {
                info!(target: "interview", interview_id = %session.interview_id, questions = session.theory_questions.len(), "Interview started");
                self.session = Some(session);
                self.answers.clear();
                self.start = RequestStatus::Succeeded;
                self.error = None;
            }
            Err(e) => {
                warn!(target: "interview", error = %e, "Interview start failed; waiting for retry");
                self.session = None;
                self.start = RequestStatus::Failed;
                self.error = Some(e.to_string());
            }
        }
    }

    fn select(&mut self, question_id: String, option: String) -> Result<(), InterviewError> {
        if self.submit.is_in_flight() {
            return Err(InterviewError::Rejected("Answers are being submitted.".into()));
        }
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| InterviewError::Rejected("The interview has not started yet.".into()))?;
        let question = session
            .theory_questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| InterviewError::Rejected(format!("Unknown question '{}'.", question_id)))?;
        if !question.options.iter().any(|o| *o == option) {
            return Err(InterviewError::Rejected(format!(
                "'{}' is not an option for this question.",
                option
            )));
        }
        self.answers.insert(question_id, option);
        Ok(())
    }

    fn begin_submit(&mut self) -> Result<Effect, InterviewError> {
        if self.submit.is_in_flight() {
            return Err(InterviewError::Rejected("Submission already in progress.".into()));
        }
        let interview_id = match &self.session {
            Some(s) => s.interview_id.clone(),
            None => return Err(InterviewError::Rejected("The interview has not started yet.".into())),
        };
        let missing = self.unanswered();
        if missing > 0 {
            let msg = format!("Please answer all {} before submitting.", plural(missing, "remaining question"));
            self.error = Some(msg.clone());
            return Err(InterviewError::Rejected(msg));
        }
        self.submit = RequestStatus::InFlight;
        self.error = None;
        Ok(Effect::SubmitTheory(TheorySubmission { interview_id, answers: self.answers.clone() }))
    }

    fn complete_submit(&mut self, outcome: Result<Value, ClientError>) {
        let graded = outcome.and_then(|body| match &self.session {
            Some(session) => parse_theory_result(body, session),
            None => Err(ClientError::malformed(MALFORMED_RESPONSE)),
        });
        match graded {
            Ok(result) => {
                info!(target: "interview", score = result.score_percentage, correct = result.correct_answers, total = result.total_questions, "Theory graded");
                self.result = Some(result);
                self.submit = RequestStatus::Succeeded;
                self.error = None;
                self.enter(Phase::Review);
            }
            Err(e) => {
                // Stay in Theory with every selection intact.
                warn!(target: "interview", error = %e, "Theory submission failed");
                self.submit = RequestStatus::Failed;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Questions in their original order with grading merged in. Empty before grading.
    pub fn review(&self) -> Vec<ReviewItem> {
        let (Some(session), Some(result)) = (&self.session, &self.result) else {
            return vec![];
        };
        session
            .theory_questions
            .iter()
            .map(|q| {
                let graded = result.results.iter().find(|r| r.question_id == q.id);
                let user_answer = graded
                    .and_then(|r| r.user_answer.clone())
                    .or_else(|| self.answers.get(&q.id).cloned());
                let correct_answer = graded.map(|r| r.correct_answer.clone());
                let options = q
                    .options
                    .iter()
                    .map(|o| ReviewOption {
                        text: o.clone(),
                        selected: user_answer.as_deref() == Some(o.as_str()),
                        is_correct: correct_answer.as_deref() == Some(o.as_str()),
                    })
                    .collect();
                ReviewItem {
                    question_id: q.id.clone(),
                    question: q.question.clone(),
                    options,
                    user_answer,
                    correct_answer,
                    correct: graded.map(|r| r.correct).unwrap_or(false),
                }
            })
            .collect()
    }

    pub fn summary(&self) -> Option<ScoreSummary> {
        let r = self.result.as_ref()?;
        Some(ScoreSummary {
            total: r.total_questions,
            correct: r.correct_answers,
            missed: r.total_questions.saturating_sub(r.correct_answers),
            score_percentage: r.score_percentage,
            label: PerformanceLabel::for_score(r.score_percentage),
            missed_questions: r.results.iter().filter(|q| !q.correct).cloned().collect(),
        })
    }
}

/// Run a network effect and return its completion event. Navigation effects return None.
pub async fn execute(api: &ApiClient, effect: &Effect) -> Option<Event> {
    match effect {
        Effect::StartInterview(params) => Some(Event::StartCompleted(api.start_interview(params).await)),
        Effect::SubmitTheory(payload) => Some(Event::SubmitCompleted(api.submit_theory(payload).await)),
        Effect::OpenCodeChallenge(_) | Effect::ReturnToStudy => None,
    }
}

/// Apply `event`, run any network effects to completion, and return navigation effects.
pub async fn drive(
    machine: &mut InterviewMachine,
    api: &ApiClient,
    event: Event,
) -> Result<Vec<Effect>, InterviewError> {
    let mut queue = VecDeque::from([event]);
    let mut navigation = Vec::new();
    while let Some(ev) = queue.pop_front() {
        for effect in machine.apply(ev)? {
            match execute(api, &effect).await {
                Some(done) => queue.push_back(done),
                None => navigation.push(effect),
            }
        }
    }
    Ok(navigation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;
    use crate::protocol::fixtures::{session_body, theory_result_body};
    use crate::protocol::Operation;
    use crate::testkit::{Reply, StubBackend};
    use serde_json::json;

    fn params() -> StudyParams {
        StudyParams { topic: "HashMap".into(), level: Level::Mid, language: "Java".into() }
    }

    fn select(id: &str, option: &str) -> Event {
        Event::Select { question_id: id.into(), option: option.into() }
    }

    /// Machine in Theory with a started five-question session.
    fn started() -> InterviewMachine {
        let mut m = InterviewMachine::new(params());
        m.apply(Event::Begin).unwrap();
        m.apply(Event::StartCompleted(Ok(session_body("iv-1", 5)))).unwrap();
        m
    }

    fn answer_all(m: &mut InterviewMachine) {
        for id in ["1", "2", "3", "4", "5"] {
            m.apply(select(id, "A")).unwrap();
        }
    }

    #[test]
    fn begin_enters_theory_and_requests_start() {
        let mut m = InterviewMachine::new(params());
        assert_eq!(m.phase(), Phase::Intro);
        let effects = m.apply(Event::Begin).unwrap();
        assert_eq!(effects, vec![Effect::StartInterview(params())]);
        assert_eq!(m.phase(), Phase::Theory);
        assert_eq!(m.start_status(), RequestStatus::InFlight);
    }

    #[test]
    fn duplicate_start_is_guarded() {
        let mut m = InterviewMachine::new(params());
        m.apply(Event::Begin).unwrap();
        assert!(matches!(m.apply(Event::RetryStart), Err(InterviewError::Rejected(_))));

        m.apply(Event::StartCompleted(Ok(session_body("iv-1", 5)))).unwrap();
        // Guard stays set after success: no second start for this entry.
        assert_eq!(m.apply(Event::RetryStart).unwrap(), vec![]);
        assert_eq!(m.session().unwrap().interview_id, "iv-1");
    }

    #[test]
    fn four_questions_is_malformed_and_stays_without_session() {
        let mut m = InterviewMachine::new(params());
        m.apply(Event::Begin).unwrap();
        m.apply(Event::StartCompleted(Ok(session_body("iv-1", 4)))).unwrap();

        assert_eq!(m.phase(), Phase::Theory);
        assert!(m.session().is_none());
        assert_eq!(m.start_status(), RequestStatus::Failed);
        assert!(m.error().unwrap().contains("expected 5 theory questions"));
        assert!(matches!(m.apply(select("1", "A")), Err(InterviewError::Rejected(_))));

        // Retry is allowed once the failed attempt has resolved.
        assert_eq!(m.apply(Event::RetryStart).unwrap(), vec![Effect::StartInterview(params())]);
    }

    #[test]
    fn start_failure_keeps_phase_and_allows_retry() {
        let mut m = InterviewMachine::new(params());
        m.apply(Event::Begin).unwrap();
        m.apply(Event::StartCompleted(Err(ClientError::Timeout))).unwrap();
        assert_eq!(m.phase(), Phase::Theory);
        assert_eq!(m.error(), Some("Request timed out. Please try again."));
        assert_eq!(m.apply(Event::RetryStart).unwrap().len(), 1);
        assert_eq!(m.error(), None);
    }

    #[test]
    fn stale_start_completion_is_rejected() {
        let mut m = started();
        let err = m.apply(Event::StartCompleted(Ok(session_body("iv-2", 5)))).unwrap_err();
        assert_eq!(err, InterviewError::InvalidTransition { phase: Phase::Theory, event: "start_completed" });
        assert_eq!(m.session().unwrap().interview_id, "iv-1");
    }

    #[test]
    fn selections_validate_and_last_write_wins() {
        let mut m = started();
        m.apply(select("1", "A")).unwrap();
        m.apply(select("1", "C")).unwrap();
        assert_eq!(m.answers().len(), 1);
        assert_eq!(m.answers()["1"], "C");

        assert!(m.apply(select("99", "A")).is_err());
        assert!(m.apply(select("2", "Z")).is_err());
        assert_eq!(m.answers().len(), 1);
    }

    #[test]
    fn incomplete_answers_never_submit_and_name_missing_count() {
        let mut m = started();
        let err = m.apply(Event::Submit).unwrap_err();
        assert_eq!(err.to_string(), "Please answer all 5 remaining questions before submitting.");

        m.apply(select("1", "A")).unwrap();
        m.apply(select("2", "B")).unwrap();
        m.apply(select("3", "A")).unwrap();
        m.apply(select("4", "A")).unwrap();
        let err = m.apply(Event::Submit).unwrap_err();
        assert_eq!(err.to_string(), "Please answer all 1 remaining question before submitting.");
        assert_eq!(m.submit_status(), RequestStatus::Idle);
        assert_eq!(m.error(), Some(err.to_string().as_str()));
    }

    #[test]
    fn complete_answers_submit_with_interview_id() {
        let mut m = started();
        answer_all(&mut m);
        let effects = m.apply(Event::Submit).unwrap();
        let Effect::SubmitTheory(payload) = &effects[0] else { panic!("expected submit effect") };
        assert_eq!(payload.interview_id, "iv-1");
        assert_eq!(payload.answers.len(), 5);
        assert!(matches!(m.apply(Event::Submit), Err(InterviewError::Rejected(_))));
    }

    #[test]
    fn failed_or_malformed_submission_keeps_answers_in_theory() {
        let mut m = started();
        answer_all(&mut m);
        m.apply(Event::Submit).unwrap();
        m.apply(Event::SubmitCompleted(Err(ClientError::Http { status: 500, message: "boom".into() }))).unwrap();
        assert_eq!(m.phase(), Phase::Theory);
        assert_eq!(m.answers().len(), 5);
        assert_eq!(m.error(), Some("boom"));

        m.apply(Event::Submit).unwrap();
        m.apply(Event::SubmitCompleted(Ok(json!({"totalQuestions": "five"})))).unwrap();
        assert_eq!(m.phase(), Phase::Theory);
        assert!(m.theory_result().is_none());
        assert_eq!(m.answers().len(), 5);
    }

    #[test]
    fn incomplete_grading_keeps_answers_in_theory() {
        let mut m = started();
        answer_all(&mut m);
        m.apply(Event::Submit).unwrap();
        let scores_only = json!({"totalQuestions": 5, "correctAnswers": 5, "scorePercentage": 100});
        m.apply(Event::SubmitCompleted(Ok(scores_only))).unwrap();
        assert_eq!(m.phase(), Phase::Theory);
        assert!(m.summary().is_none());
        assert!(m.error().unwrap().starts_with("Malformed response"));

        m.apply(Event::Submit).unwrap();
        let partial = theory_result_body(&[("1", "A"), ("2", "A"), ("3", "A")]);
        m.apply(Event::SubmitCompleted(Ok(partial))).unwrap();
        assert_eq!(m.phase(), Phase::Theory);
        assert!(m.theory_result().is_none());
        assert_eq!(m.answers().len(), 5);
    }

    #[test]
    fn graded_flow_reaches_review_result_and_code_handoff() {
        let mut m = started();
        for (id, opt) in [("1", "A"), ("2", "B"), ("3", "A"), ("4", "A"), ("5", "A")] {
            m.apply(select(id, opt)).unwrap();
        }
        m.apply(Event::Submit).unwrap();
        let graded = theory_result_body(&[("1", "A"), ("2", "B"), ("3", "A"), ("4", "A"), ("5", "A")]);
        m.apply(Event::SubmitCompleted(Ok(graded))).unwrap();
        assert_eq!(m.phase(), Phase::Review);

        let review = m.review();
        assert_eq!(review.len(), 5);
        let q2 = &review[1];
        assert!(!q2.correct);
        assert!(q2.options.iter().any(|o| o.text == "B" && o.selected && !o.is_correct));
        assert!(q2.options.iter().any(|o| o.text == "A" && !o.selected && o.is_correct));

        assert!(m.apply(Event::BackToStudy).is_err());
        m.apply(Event::ContinueToScore).unwrap();
        assert_eq!(m.phase(), Phase::Result);

        let s = m.summary().unwrap();
        assert_eq!((s.total, s.correct, s.missed), (5, 4, 1));
        assert_eq!(s.label, PerformanceLabel::Strong);
        assert_eq!(s.missed_questions.len(), 1);
        assert_eq!(s.missed_questions[0].question_id, "2");

        let effects = m.apply(Event::ContinueToCode).unwrap();
        assert_eq!(
            effects,
            vec![Effect::OpenCodeChallenge(CodeChallengeHandoff {
                interview_id: "iv-1".into(),
                coding_question: m.session().unwrap().coding_question.clone(),
            })]
        );
        assert!(m.is_closed());
        assert!(m.apply(Event::BackToStudy).is_err());
    }

    #[test]
    fn no_backward_transitions() {
        let mut m = started();
        assert!(matches!(m.apply(Event::Begin), Err(InterviewError::InvalidTransition { .. })));
        assert!(matches!(m.apply(Event::ContinueToScore), Err(InterviewError::InvalidTransition { .. })));
    }

    #[test]
    fn performance_label_boundaries() {
        assert_eq!(PerformanceLabel::for_score(80.0).text(), "Strong performance");
        assert_eq!(PerformanceLabel::for_score(79.9).text(), "Fair performance");
        assert_eq!(PerformanceLabel::for_score(60.0).text(), "Fair performance");
        assert_eq!(PerformanceLabel::for_score(59.0).text(), "Needs improvement");
        assert_eq!(PerformanceLabel::for_score(100.0), PerformanceLabel::Strong);
    }

    #[tokio::test]
    async fn retry_after_failed_start_gets_a_fresh_interview_id() {
        let stub = StubBackend::start().await;
        stub.reply(Operation::StartInterview, Reply::status(503, json!({"message": "Model busy"})));
        stub.reply(Operation::StartInterview, Reply::json(session_body("iv-fresh", 5)));
        let api = stub.client();

        let mut m = InterviewMachine::new(params());
        drive(&mut m, &api, Event::Begin).await.unwrap();
        assert_eq!(m.error(), Some("Model busy"));
        assert!(m.session().is_none());

        drive(&mut m, &api, Event::RetryStart).await.unwrap();
        assert_eq!(m.session().unwrap().interview_id, "iv-fresh");
        assert_eq!(stub.calls(Operation::StartInterview), 2);

        drive(&mut m, &api, Event::RetryStart).await.unwrap();
        assert_eq!(stub.calls(Operation::StartInterview), 2);
        assert_eq!(
            stub.bodies(Operation::StartInterview)[1],
            json!({"topic": "HashMap", "level": "Mid", "language": "Java"})
        );
    }

    #[tokio::test]
    async fn submit_is_not_sent_until_all_answered() {
        let stub = StubBackend::start().await;
        stub.reply(Operation::StartInterview, Reply::json(session_body("iv-1", 5)));
        stub.reply(
            Operation::SubmitTheory,
            Reply::json(theory_result_body(&[("1", "A"), ("2", "A"), ("3", "A"), ("4", "A"), ("5", "A")])),
        );
        let api = stub.client();

        let mut m = InterviewMachine::new(params());
        drive(&mut m, &api, Event::Begin).await.unwrap();
        drive(&mut m, &api, select("1", "A")).await.unwrap();
        assert!(drive(&mut m, &api, Event::Submit).await.is_err());
        assert_eq!(stub.calls(Operation::SubmitTheory), 0);

        for id in ["2", "3", "4", "5"] {
            drive(&mut m, &api, select(id, "A")).await.unwrap();
        }
        drive(&mut m, &api, Event::Submit).await.unwrap();
        assert_eq!(stub.calls(Operation::SubmitTheory), 1);
        assert_eq!(m.phase(), Phase::Review);
        assert_eq!(stub.bodies(Operation::SubmitTheory)[0]["interviewId"], "iv-1");
        assert_eq!(m.summary().unwrap().label, PerformanceLabel::Strong);
    }
}
