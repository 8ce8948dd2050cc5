//! Request handlers. The core is synchronous; every handler crosses into
//! it through `spawn_blocking` with a cancellation token armed by a drop
//! guard, so a vanished client cancels the work at its next checkpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::{Category, Memory, Source};
use engram_core::models::{ConsolidationOptions, ContradictionStatus, ResolutionAction, Warning};
use engram_core::traits::{Cancellable, CancellationToken};
use engram_ingest::IngestRequest;
use engram_recall::RecallRequest;
use engram_store::ContradictionSort;

use super::error::ApiError;
use crate::service::Engram;

type AppState = State<Arc<Engram>>;
type ApiResult<T> = Result<T, ApiError>;

/// Cancels its token when dropped. Arms client-disconnect cancellation:
/// axum drops the handler future when the connection goes away.
struct CancelGuard(CancellationToken);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Run a synchronous core operation off the async runtime.
async fn run_blocking<T, F>(f: F) -> EngramResult<T>
where
    F: FnOnce() -> EngramResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EngramError::internal(format!("worker task failed: {e}")))?
}

/// Same, bounded by a per-request timeout. The token is cancelled when
/// the clock runs out so the blocking side stops at its next checkpoint.
async fn run_blocking_with_timeout<T, F>(
    timeout: Duration,
    token: &CancellationToken,
    f: F,
) -> EngramResult<T>
where
    F: FnOnce() -> EngramResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
        Ok(joined) => {
            joined.map_err(|e| EngramError::internal(format!("worker task failed: {e}")))?
        }
        Err(_) => {
            token.cancel();
            Err(EngramError::Canceled)
        }
    }
}

/// Decode a JSON body into a typed request, mapping malformed or unknown
/// fields to `InvalidField` (HTTP 400).
fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError(EngramError::invalid_field("body", e.to_string())))
}

// ── Liveness and status ──────────────────────────────────────────────────

pub async fn health(State(engram): AppState) -> ApiResult<Json<Value>> {
    let ok = run_blocking(move || Ok(engram.healthy())).await?;
    if ok {
        Ok(Json(json!({ "status": "ok" })))
    } else {
        Err(ApiError(EngramError::StoreUnavailable {
            message: "store is not answering".into(),
        }))
    }
}

pub async fn status(State(engram): AppState) -> ApiResult<Json<Value>> {
    let snapshot = run_blocking(move || engram.status()).await?;
    Ok(Json(serde_json::to_value(snapshot).map_err(|e| {
        ApiError(EngramError::internal(e.to_string()))
    })?))
}

// ── Memories ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CreatedMemory {
    #[serde(flatten)]
    memory: Memory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Warning>,
}

pub async fn create_memory(
    State(engram): AppState,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CreatedMemory>)> {
    let request: IngestRequest = decode(body)?;
    let timeout = Duration::from_secs(engram.config().http.ingest_timeout_secs);

    let token = CancellationToken::new();
    let _guard = CancelGuard(token.clone());
    let worker_token = token.clone();
    let outcome = run_blocking_with_timeout(timeout, &token, move || {
        engram.ingest(&request, Source::Api, &worker_token)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMemory {
            memory: outcome.memory,
            warnings: outcome.warnings,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    namespace: Option<String>,
    category: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

const LIST_DEFAULT_LIMIT: usize = 50;
const LIST_MAX_LIMIT: usize = 500;

pub async fn list_memories(
    State(engram): AppState,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let category = parse_category(params.category.as_deref())?;
    let limit = params.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    if !(1..=LIST_MAX_LIMIT).contains(&limit) {
        return Err(ApiError(EngramError::invalid_field(
            "limit",
            format!("must be in [1, {LIST_MAX_LIMIT}]"),
        )));
    }
    let offset = params.offset.unwrap_or(0);

    let (memories, total) = run_blocking(move || {
        engram.list(params.namespace.as_deref(), category, limit, offset)
    })
    .await?;

    Ok(Json(json!({
        "memories": memories,
        "pagination": { "total": total, "limit": limit, "offset": offset },
    })))
}

pub async fn get_memory(
    State(engram): AppState,
    Path(id): Path<String>,
) -> ApiResult<Json<Memory>> {
    let memory = run_blocking(move || engram.get(&id)).await?;
    Ok(Json(memory))
}

pub async fn delete_memory(
    State(engram): AppState,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    run_blocking(move || engram.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BulkDeleteRequest {
    ids: Vec<String>,
}

pub async fn bulk_delete(
    State(engram): AppState,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let request: BulkDeleteRequest = decode(body)?;
    let deleted = run_blocking(move || engram.bulk_delete(&request.ids)).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

pub async fn search(
    State(engram): AppState,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let request: RecallRequest = decode(body)?;
    let timeout = Duration::from_secs(engram.config().http.recall_timeout_secs);

    let token = CancellationToken::new();
    let _guard = CancelGuard(token.clone());
    let worker_token = token.clone();
    let hits = run_blocking_with_timeout(timeout, &token, move || {
        engram.recall(&request, &worker_token)
    })
    .await?;

    Ok(Json(json!({ "memories": hits })))
}

// ── Consolidation ────────────────────────────────────────────────────────

pub async fn consolidate(
    State(engram): AppState,
    body: Option<Json<Value>>,
) -> ApiResult<Json<Value>> {
    let options: ConsolidationOptions =
        decode(body.map(|Json(v)| v).unwrap_or_else(|| json!({})))?;

    let token = CancellationToken::new();
    let _guard = CancelGuard(token.clone());
    let worker_token = token.clone();
    let report =
        run_blocking(move || engram.consolidate(options, &worker_token)).await?;

    Ok(Json(json!({ "results": report })))
}

// ── Contradictions ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContradictionParams {
    status: Option<String>,
    category: Option<String>,
    sort: Option<String>,
}

pub async fn list_contradictions(
    State(engram): AppState,
    Query(params): Query<ContradictionParams>,
) -> ApiResult<Json<Value>> {
    let status = match params.status.as_deref() {
        None => None,
        Some(s) => Some(ContradictionStatus::parse(s).ok_or_else(|| {
            ApiError(EngramError::invalid_field("status", format!("unknown status {s:?}")))
        })?),
    };
    let category = parse_category(params.category.as_deref())?;
    let sort = match params.sort.as_deref() {
        None | Some("detected_at") | Some("detected") => ContradictionSort::DetectedDesc,
        Some("confidence") => ContradictionSort::ConfidenceDesc,
        Some(other) => {
            return Err(ApiError(EngramError::invalid_field(
                "sort",
                format!("unknown sort {other:?}"),
            )))
        }
    };

    let (contradictions, unresolved) =
        run_blocking(move || engram.contradictions(status, category, sort)).await?;

    Ok(Json(json!({
        "contradictions": contradictions,
        "unresolvedCount": unresolved,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResolveRequest {
    action: String,
}

pub async fn resolve_contradiction(
    State(engram): AppState,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let request: ResolveRequest = decode(body)?;
    let action = ResolutionAction::parse(&request.action).ok_or_else(|| {
        ApiError(EngramError::invalid_field(
            "action",
            format!("unknown action {:?}", request.action),
        ))
    })?;

    run_blocking(move || engram.resolve_contradiction(&id, action)).await?;
    Ok(Json(json!({ "resolved": true })))
}

/// Legacy alias: unresolved subset in a simplified envelope.
pub async fn list_conflicts(State(engram): AppState) -> ApiResult<Json<Value>> {
    let (contradictions, _) = run_blocking(move || {
        engram.contradictions(
            Some(ContradictionStatus::Unresolved),
            None,
            ContradictionSort::DetectedDesc,
        )
    })
    .await?;

    let conflicts: Vec<Value> = contradictions
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "memory1_id": c.memory1_id,
                "memory2_id": c.memory2_id,
                "entity": c.entity,
                "confidence": c.confidence,
                "reason": c.reason,
            })
        })
        .collect();
    Ok(Json(json!({ "conflicts": conflicts })))
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => Category::parse(s).map(Some).ok_or_else(|| {
            ApiError(EngramError::invalid_field(
                "category",
                format!("unknown category {s:?}"),
            ))
        }),
    }
}
