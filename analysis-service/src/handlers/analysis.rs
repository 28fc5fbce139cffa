use crate::models::{AnalysisResponse, AppendRequest, AppendResponse};
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

/// Return the current accumulated content.
pub async fn get_analysis(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let gpt_output = state.db.read_content().await?;

    Ok(Json(AnalysisResponse { gpt_output }))
}

/// Append new text to the stored content.
///
/// Leading and trailing whitespace is trimmed; an absent or blank `text`
/// field is rejected. Everything else passes through untouched.
pub async fn update_analysis(
    State(state): State<AppState>,
    Json(payload): Json<AppendRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_text = payload.text.as_deref().unwrap_or("").trim().to_string();

    if new_text.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No text provided")));
    }

    state.db.append_text(&new_text).await.map_err(|e| {
        tracing::error!("Failed to append text: {}", e);
        e
    })?;

    Ok(Json(AppendResponse {
        message: format!(
            "gptOutput updated successfully with new text: {}",
            new_text
        ),
    }))
}
