//! Axum route handler for the document-generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiError, GenerateError};
use crate::generation::input::{CandidateInput, RawCandidateInput};
use crate::generation::{generate_documents, GenerationResult};
use crate::llm_client::ProviderConfig;
use crate::state::AppState;

/// POST /api/generate-documents
///
/// Full pipeline: validate → resolve provider → one chat completion → parse
/// tagged sections → render both PDFs in parallel. Every failure carries the
/// per-request correlation id back to the client, including body-parse
/// rejections — hence the `Result` extractor instead of a bare `Json`.
pub async fn handle_generate_documents(
    State(state): State<AppState>,
    payload: Result<Json<RawCandidateInput>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let request_id = Uuid::new_v4();

    let Json(raw) = payload.map_err(|rejection| {
        ApiError::new(
            request_id,
            GenerateError::Validation(format!("Invalid request body: {}", rejection.body_text())),
        )
    })?;

    let input = CandidateInput::from_raw(raw).map_err(|e| ApiError::new(request_id, e))?;
    let provider =
        ProviderConfig::resolve(&state.config).map_err(|e| ApiError::new(request_id, e))?;

    tracing::info!(
        %request_id,
        provider = provider.provider,
        model = %provider.model,
        "generating documents"
    );

    let result = generate_documents(&state.llm, provider, &input)
        .await
        .map_err(|e| ApiError::new(request_id, e))?;

    Ok(Json(result))
}
