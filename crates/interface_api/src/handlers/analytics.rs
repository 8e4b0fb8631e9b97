//! Analytics handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use domain_claims::{ClaimStats, PatternReport};

use crate::dto::analytics::WindowParams;
use crate::{error::ApiError, AppState};

/// Population statistics for a window
pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<ClaimStats>, ApiError> {
    let query = params.into_query(Utc::now().date_naive())?;
    Ok(Json(state.service.claim_stats(query).await?))
}

/// Statistics plus detected patterns for a window
pub async fn get_patterns(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<PatternReport>, ApiError> {
    let query = params.into_query(Utc::now().date_naive())?;
    Ok(Json(state.service.detect_patterns(query).await?))
}
