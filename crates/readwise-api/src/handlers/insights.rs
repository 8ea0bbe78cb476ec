//! Daily insights digest. Placeholder until digests are computed.

use axum::{extract::State, Json};

use crate::services::DailyInsights;
use crate::AppState;

/// `GET /api/v1/cloud/send-daily-insights`
pub async fn send_daily_insights(State(state): State<AppState>) -> Json<DailyInsights> {
    Json(state.ingestion.daily_insights())
}
