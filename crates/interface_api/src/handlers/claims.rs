//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{ActivityEvent, ClaimStatus, ClaimUpdate, EnrichedAssessment};

use crate::dto::claims::*;
use crate::middleware::Actor;
use crate::{error::ApiError, AppState};

fn parse_id(raw: &str) -> Result<ClaimId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid claim id: {}", raw)))
}

/// Creates a claim
pub async fn create_claim(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    request.validate()?;
    let claim = state
        .service
        .create_claim(request.into_draft(), actor.metadata())
        .await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

/// Lists claims
pub async fn list_claims(
    State(state): State<AppState>,
    Query(params): Query<ListClaimsParams>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    params.validate()?;
    let claims = state.service.list_claims(params.into_query()?).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.service.get_claim(parse_id(&id)?).await?;
    Ok(Json(claim.into()))
}

/// Applies a partial edit to a claim
pub async fn update_claim(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(update): Json<ClaimUpdate>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state
        .service
        .update_claim(parse_id(&id)?, update, actor.metadata())
        .await?;
    Ok(Json(claim.into()))
}

/// Updates claim status
pub async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    request.validate()?;
    let target: ClaimStatus = request.status.parse()?;
    let claim = state
        .service
        .change_status(parse_id(&id)?, target, actor.metadata())
        .await?;
    Ok(Json(claim.into()))
}

/// Re-scores a claim, stores the result and returns the assessment with
/// any advisory insights
pub async fn recompute_risk(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<EnrichedAssessment>, ApiError> {
    let id = parse_id(&id)?;
    state.service.recompute_risk(id, actor.metadata()).await?;
    let assessment = state.service.assess_risk(id).await?;
    Ok(Json(assessment))
}

/// Activity history of a claim
pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ActivityEvent>>, ApiError> {
    Ok(Json(state.service.activity(parse_id(&id)?).await?))
}

/// Progress steps for a claim
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let track = state.service.progress(parse_id(&id)?).await?;
    Ok(Json(track.into()))
}
