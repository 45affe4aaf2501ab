//! Axum route handlers for the advice endpoint.

use axum::{extract::State, Json};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::advice::calculation::assess;
use crate::advice::models::RawAdviceRequest;
use crate::advice::prompts::{build_prompt, PromptParams};
use crate::errors::AppError;
use crate::state::AppState;

pub const MISSING_API_KEY_MESSAGE: &str = "API key not configured on the server.";

/// POST /api/get-advice
///
/// Validates the application, builds the prompt for the requested advice
/// type and returns the generation API's JSON response unchanged.
pub async fn handle_get_advice(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request = RawAdviceRequest::from_body(&body)?
        .validate()
        .map_err(|e| {
            warn!("Rejected advice request: {e}");
            AppError::from(e)
        })?;

    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| AppError::Configuration(MISSING_API_KEY_MESSAGE.to_string()))?;

    let assessment = assess(
        request.age,
        request.income,
        request.loan_amount,
        request.loan_term,
    );
    info!(
        "Advice request: type={:?} age={} term={}y product={:?} first_month_payment={:.0} affordable={}",
        request.request_type,
        request.age,
        request.loan_term,
        assessment.product,
        assessment.estimate.first_month_payment,
        assessment.affordable
    );

    let params = PromptParams {
        request: &request,
        assessment: &assessment,
    };
    let prompt = build_prompt(&params);
    debug!(
        "Built {:?} prompt ({} chars)",
        params.variant(),
        prompt.chars().count()
    );

    let result = generator.generate(&prompt).await?;
    if result.text().is_none() {
        warn!(
            "Generation returned no text (finish_reason={:?}); forwarding payload as-is",
            result.finish_reason()
        );
    }

    Ok(Json(result.into_raw()))
}

/// Any other method on /api/get-advice.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
