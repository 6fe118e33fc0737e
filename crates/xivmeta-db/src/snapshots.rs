//! Database operations for the `stats_snapshots` table.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use xivmeta_core::{GroupedJobs, JobRecord, ResultSet};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `stats_snapshots` table, payload untouched.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SnapshotRow {
    pub id: i64,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The typed shape of `stats_snapshots.data`.
///
/// Rows are stored flat; role grouping is recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPayload {
    pub zone_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub jobs: Vec<JobRecord>,
}

impl StoredPayload {
    /// Flatten a result back into storable rows, in role order.
    ///
    /// A boss-filtered scrape carries its boss only in `url`, which is not
    /// stored, so the page label is kept as `boss_name` instead. That keeps
    /// the stored scores read back as DPS.
    #[must_use]
    pub fn from_result_set(result: &ResultSet) -> Self {
        let boss_name = match result.boss_name.as_deref() {
            Some(name) if !name.is_empty() => Some(name.to_owned()),
            _ if result.is_boss_specific() => Some(result.zone_name.clone()),
            _ => None,
        };
        Self {
            zone_name: result.zone_name.clone(),
            boss_name,
            timestamp: Some(result.timestamp.clone()),
            jobs: result
                .groups
                .iter()
                .flat_map(|(_, jobs)| jobs.iter().cloned())
                .collect(),
        }
    }
}

/// A snapshot whose payload has been normalized and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub id: i64,
    pub payload: StoredPayload,
}

impl StoredSnapshot {
    /// # Errors
    ///
    /// Returns [`DbError::MalformedPayload`] if the row's `data` does not
    /// normalize.
    ///
    /// A payload without a timestamp gets the row's `created_at`.
    pub fn from_row(row: SnapshotRow) -> Result<Self, DbError> {
        let mut payload = normalize_payload(row.id, row.data)?;
        if payload.timestamp.as_deref().is_none_or(str::is_empty) {
            payload.timestamp = Some(row.created_at.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        Ok(Self {
            id: row.id,
            payload,
        })
    }

    /// Reshape into the same client contract the scrape path produces.
    ///
    /// `zone_name`, `boss_name` and `timestamp` come from the stored payload
    /// verbatim.
    #[must_use]
    pub fn into_result_set(self) -> ResultSet {
        ResultSet {
            zone: None,
            id: Some(self.id),
            zone_name: self.payload.zone_name,
            boss_name: self.payload.boss_name,
            url: None,
            timestamp: self.payload.timestamp.unwrap_or_default(),
            groups: GroupedJobs::from_records(self.payload.jobs),
        }
    }
}

/// Decode a stored payload that may be a JSON object or a JSON string holding
/// serialized JSON.
///
/// # Errors
///
/// Returns [`DbError::MalformedPayload`] if the string does not parse, or the
/// value does not have the [`StoredPayload`] shape.
pub fn normalize_payload(id: i64, data: serde_json::Value) -> Result<StoredPayload, DbError> {
    let parsed = match data {
        serde_json::Value::String(raw) => serde_json::from_str::<StoredPayload>(&raw),
        other => serde_json::from_value::<StoredPayload>(other),
    };
    parsed.map_err(|e| DbError::MalformedPayload {
        id,
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every snapshot, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_snapshots(pool: &PgPool) -> Result<Vec<SnapshotRow>, DbError> {
    let rows = sqlx::query_as::<_, SnapshotRow>(
        "SELECT id, data, created_at \
         FROM stats_snapshots \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single snapshot by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_snapshot(pool: &PgPool, id: i64) -> Result<Option<SnapshotRow>, DbError> {
    let row = sqlx::query_as::<_, SnapshotRow>(
        "SELECT id, data, created_at \
         FROM stats_snapshots \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Persists a payload as a JSON object and returns the new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_snapshot(
    pool: &PgPool,
    payload: &StoredPayload,
) -> Result<SnapshotRow, DbError> {
    let row = sqlx::query_as::<_, SnapshotRow>(
        "INSERT INTO stats_snapshots (data) \
         VALUES ($1) \
         RETURNING id, data, created_at",
    )
    .bind(Json(payload))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
#[path = "snapshots_test.rs"]
mod tests;
