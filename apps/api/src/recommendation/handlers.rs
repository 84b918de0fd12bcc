//! Axum route handlers for the Recommendations API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::recommendation::orchestrator::{RecommendationSnapshot, RefreshOutcome};
use crate::recommendation::reasons::explain;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
    #[serde(flatten)]
    pub snapshot: RecommendationSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ReasonsResponse {
    pub job_id: String,
    pub reasons: Vec<String>,
}

fn empty_snapshot() -> RecommendationSnapshot {
    RecommendationSnapshot {
        recommendations: Vec::new(),
        is_loading: false,
        has_fetched_once: false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/recommendations
///
/// Current published set plus loading state. Empty until a profile has been pushed.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecommendationSnapshot>, AppError> {
    let snapshot = match state.recommendations.get(params.user_id).await {
        Some(orchestrator) => orchestrator.snapshot().await,
        None => empty_snapshot(),
    };
    Ok(Json(snapshot))
}

/// DELETE /api/v1/recommendations
///
/// Drops everything held for the user: profile, published set and run state.
pub async fn handle_evict_user(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if state.recommendations.remove(params.user_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No profile for user {}", params.user_id)))
    }
}

/// PUT /api/v1/recommendations/profile
///
/// Pushes the candidate's latest profile. Runs a full refresh or a rescore
/// depending on which fields changed.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(profile): Json<Profile>,
) -> Result<Json<TriggerResponse>, AppError> {
    validate_profile(&profile)?;

    let orchestrator = state.recommendations.get_or_create(params.user_id).await;
    let outcome = orchestrator.update_profile(profile).await?;

    Ok(Json(TriggerResponse {
        outcome,
        snapshot: orchestrator.snapshot().await,
    }))
}

/// POST /api/v1/recommendations/refresh
///
/// Forces a full refresh against the stored profile. No-op if a run is in flight.
pub async fn handle_trigger_refresh(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<TriggerResponse>, AppError> {
    let orchestrator = state
        .recommendations
        .get(params.user_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", params.user_id)))?;

    let outcome = orchestrator.trigger_refresh().await?;

    Ok(Json(TriggerResponse {
        outcome,
        snapshot: orchestrator.snapshot().await,
    }))
}

/// DELETE /api/v1/recommendations/:job_id
///
/// Removes one job from the published set. Repeating the call is harmless.
pub async fn handle_remove_recommendation(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<TriggerResponse>, AppError> {
    let response = match state.recommendations.get(params.user_id).await {
        Some(orchestrator) => TriggerResponse {
            outcome: orchestrator.remove_recommendation(&job_id).await,
            snapshot: orchestrator.snapshot().await,
        },
        None => TriggerResponse {
            outcome: RefreshOutcome::NotPresent,
            snapshot: empty_snapshot(),
        },
    };
    Ok(Json(response))
}

/// GET /api/v1/recommendations/:job_id/reasons
///
/// Up to three justification sentences for a displayed job.
pub async fn handle_get_reasons(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ReasonsResponse>, AppError> {
    let orchestrator = state
        .recommendations
        .get(params.user_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", params.user_id)))?;

    let profile = orchestrator
        .profile()
        .await
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", params.user_id)))?;

    let recommendations = orchestrator.recommendations().await;
    let scored = recommendations
        .iter()
        .find(|s| s.job.id == job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} is not in the recommendations")))?;

    let reasons = explain(
        &scored.job,
        &profile,
        orchestrator.calculator().related(),
        Utc::now(),
    );

    Ok(Json(ReasonsResponse { job_id, reasons }))
}

fn validate_profile(profile: &Profile) -> Result<(), AppError> {
    if let Some(salary) = &profile.salary_expectation {
        if salary.max.is_some_and(|max| max < salary.min) {
            return Err(AppError::Validation(
                "salary_expectation.max must not be below salary_expectation.min".to_string(),
            ));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
