//! Quiz session endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/sessions
///
/// The body is optional; a request without a JSON body selects every subject.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateSessionRequest::default(),
        Err(rejection) => return Err(ApiError::BadRequest(rejection.body_text())),
    };

    let mut session = QuizSession::new(
        state.bank.clone(),
        state.settings.as_ref().clone(),
        state.clock.clone(),
    );
    if let Some(subjects) = request.subjects {
        session.select_subjects(subjects);
    }

    let id = state.sessions.insert(session)?;
    let response = state
        .sessions
        .with_session(id, |entry| SessionResponse::from_entry(id, entry))?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let response = state
        .sessions
        .with_session(id, |entry| SessionResponse::from_entry(id, entry))?;
    Ok(Json(response))
}

/// DELETE /api/sessions/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sessions/:id/subjects
pub async fn select_subjects(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectSubjectsRequest>,
) -> Result<Json<SessionResponse>> {
    let response = state.sessions.with_session(id, |entry| {
        entry.session.select_subjects(request.subjects);
        SessionResponse::from_entry(id, entry)
    })?;
    Ok(Json(response))
}

/// POST /api/sessions/:id/answers
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let question_id = request.question_id;
    state.sessions.with_session(id, |entry| {
        let evaluation = entry
            .session
            .answer(&question_id, request.value)
            .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} in session")))?;
        let praise = entry.session.praise_for(&question_id).map(str::to_string);

        Ok(Json(AnswerResponse {
            question_id: question_id.clone(),
            evaluation,
            praise,
        }))
    })?
}

/// POST /api/sessions/:id/reveal
pub async fn reveal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RevealRequest>,
) -> Result<Json<RevealResponse>> {
    let question_id = request.question_id;
    let revealed = state
        .sessions
        .with_session(id, |entry| entry.session.toggle_reveal(&question_id))?
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} in session")))?;

    Ok(Json(RevealResponse {
        question_id,
        revealed,
    }))
}

/// POST /api/sessions/:id/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<AdvanceResponse>> {
    let transition = state
        .sessions
        .with_session(id, |entry| entry.session.advance(request.direction))?;

    if transition.is_none() {
        tracing::debug!(session_id = %id, direction = ?request.direction, "Advance rejected");
    }

    Ok(Json(AdvanceResponse { transition }))
}
