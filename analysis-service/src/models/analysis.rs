//! Analysis record model and API payloads.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single stored record. `id` is always 1; the table never holds more
/// than one row after initialization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRecord {
    pub id: i64,
    #[sqlx(rename = "gptOutput")]
    #[serde(rename = "gptOutput")]
    pub gpt_output: String,
}

/// Response body for `GET /api/tuckapi`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    #[serde(rename = "gptOutput")]
    pub gpt_output: String,
}

/// Request body for `POST /api/tuckapi`.
#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub text: Option<String>,
}

/// Response body for a successful `POST /api/tuckapi`.
#[derive(Debug, Serialize)]
pub struct AppendResponse {
    pub message: String,
}
