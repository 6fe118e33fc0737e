//! `GET /api/fflogs`: live scrape by zone, stored lookup by id, or the full
//! stored collection when neither is given.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use xivmeta_core::Zone;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct FflogsQuery {
    pub zone: Option<String>,
    pub boss: Option<String>,
    pub id: Option<String>,
}

enum Target {
    Collection,
    Lookup(i64),
    Scrape { zone: Zone, boss: Option<u32> },
}

fn parse_target(query: &FflogsQuery, request_id: &str) -> Result<Target, ApiError> {
    let bad_request = |message: &str| ApiError::new(request_id, "bad_request", message);

    match (query.id.as_deref(), query.zone.as_deref()) {
        (Some(_), Some(_)) => Err(bad_request("Specify either id or zone, not both")),
        (Some(raw), None) => raw
            .trim()
            .parse::<i64>()
            .map(Target::Lookup)
            .map_err(|e| bad_request("Invalid id parameter").with_details(e.to_string())),
        (None, Some(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(bad_request("Zone parameter is required"));
            }
            let zone = raw
                .parse::<u32>()
                .ok()
                .and_then(Zone::from_id)
                .ok_or_else(|| {
                    bad_request("Invalid zone ID. Only zones 65 and 68 are supported.")
                })?;
            let boss = match query.boss.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(raw.parse::<u32>().map_err(|e| {
                    bad_request("Invalid boss parameter").with_details(e.to_string())
                })?),
            };
            Ok(Target::Scrape { zone, boss })
        }
        (None, None) => Ok(Target::Collection),
    }
}

pub(super) async fn get_fflogs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FflogsQuery>,
) -> Result<Response, ApiError> {
    match parse_target(&query, &req_id.0)? {
        Target::Collection => {
            let rows = state
                .store
                .list()
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
            Ok(Json(rows).into_response())
        }
        Target::Lookup(id) => {
            let snapshot = state
                .store
                .get(id)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?
                .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "Snapshot not found"))?;
            Ok(Json(snapshot.into_result_set()).into_response())
        }
        Target::Scrape { zone, boss } => {
            let result = xivmeta_scraper::scrape(state.launcher.as_ref(), &state.scrape, zone, boss)
                .await
                .map_err(|e| {
                    ApiError::new(req_id.0.clone(), "internal_error", "Failed to scrape FFLogs data")
                        .with_details(e.to_string())
                })?;
            Ok(Json(result).into_response())
        }
    }
}
