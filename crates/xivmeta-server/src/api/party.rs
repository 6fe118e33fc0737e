use axum::{extract::rejection::JsonRejection, Extension, Json};
use serde::Deserialize;
use xivmeta_core::{JobRecord, Party, PartyEstimate};

use crate::middleware::RequestId;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub(super) struct PartyRequest {
    pub members: Vec<JobRecord>,
    pub threshold: f64,
}

pub(super) async fn estimate_party(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<PartyRequest>, JsonRejection>,
) -> Result<Json<PartyEstimate>, ApiError> {
    let Json(request) = body.map_err(|e| {
        ApiError::new(req_id.0.clone(), "bad_request", "Invalid party request")
            .with_details(e.body_text())
    })?;

    let estimate = Party::new(request.members)
        .and_then(|party| party.estimate(request.threshold))
        .map_err(|e| {
            ApiError::new(req_id.0.clone(), "validation_error", "Invalid party")
                .with_details(e.to_string())
        })?;

    Ok(Json(estimate))
}
