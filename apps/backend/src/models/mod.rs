//! API request and response types

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from revise-core
pub use revise_core::{
    AnswerValue, Direction, Evaluation, Question, QuizSession, Subject, Transition, Verdict,
};

// === Question bank ===

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub subjects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub total: usize,
    pub questions: Vec<Arc<Question>>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub question_id: String,
    pub value: AnswerValue,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub question_id: String,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

// === Sessions ===

/// Session held in the in-memory store
pub struct SessionEntry {
    pub session: QuizSession,
    pub created_at: DateTime<Utc>,
    /// Last time a request touched the session
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// All subjects when absent
    pub subjects: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SelectSubjectsRequest {
    pub subjects: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: String,
    pub value: AnswerValue,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub question_id: String,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub praise: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RevealRequest {
    pub question_id: String,
}

#[derive(Debug, Serialize)]
pub struct RevealResponse {
    pub question_id: String,
    pub revealed: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    /// `None` when the move was rejected
    pub transition: Option<Transition>,
}

/// Current card with the learner's state for it
#[derive(Debug, Serialize)]
pub struct CardView {
    pub question: Arc<Question>,
    pub answer: Option<AnswerValue>,
    pub praise: Option<String>,
    pub revealed: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub selected_subjects: Vec<String>,
    pub index: usize,
    pub total: usize,
    pub current: Option<CardView>,
    pub transition: Option<Transition>,
}

impl SessionResponse {
    pub fn from_entry(id: Uuid, entry: &SessionEntry) -> Self {
        let session = &entry.session;
        let current = session.current().map(|question| CardView {
            question: Arc::clone(question),
            answer: session.answer_for(&question.id).cloned(),
            praise: session.praise_for(&question.id).map(str::to_string),
            revealed: session.is_revealed(&question.id),
        });

        Self {
            id,
            created_at: entry.created_at,
            selected_subjects: session.selected_subjects().to_vec(),
            index: session.index(),
            total: session.deck().len(),
            current,
            transition: session.transition().cloned(),
        }
    }
}
