//! Question bank endpoints

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;
use revise_core::{build_deck_with_policy, evaluate};

/// GET /api/subjects
pub async fn subjects(State(state): State<AppState>) -> Json<SubjectListResponse> {
    Json(SubjectListResponse {
        subjects: state.bank.subjects().to_vec(),
    })
}

/// POST /api/deck
pub async fn deck(
    State(state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> Json<DeckResponse> {
    let questions = build_deck_with_policy(
        state.bank.questions(),
        &request.subjects,
        state.settings.deck_policy,
    );

    Json(DeckResponse {
        total: questions.len(),
        questions,
    })
}

/// POST /api/evaluate
pub async fn evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>> {
    let question = state
        .bank
        .get(&request.question_id)
        .ok_or_else(|| ApiError::NotFound(format!("Question {}", request.question_id)))?;

    let evaluation = evaluate(question, &request.value, state.settings.keyword_threshold);

    Ok(Json(EvaluateResponse {
        question_id: request.question_id,
        evaluation,
    }))
}
