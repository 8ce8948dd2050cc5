//! Method dispatch onto the core operations.

use std::sync::Arc;

use serde_json::{json, Value};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::Source;
use engram_core::traits::CancellationToken;
use engram_ingest::IngestRequest;
use engram_recall::RecallRequest;

use super::schemas;
use super::RpcError;
use crate::service::Engram;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn dispatch(engram: Arc<Engram>, request: super::RpcRequest) -> Result<Value, RpcError> {
    let method = request.method.clone();
    match method.as_str() {
        "initialize" => Ok(json!({
            "server": { "name": "engram", "version": VERSION },
            "tools": schemas::tool_list(),
        })),
        "remember" => call(move |token| {
            let req: IngestRequest = decode(request.params)?;
            let outcome = engram.ingest(&req, Source::Mcp, &token)?;
            let mut result = serde_json::to_value(&outcome.memory)
                .map_err(|e| EngramError::internal(e.to_string()))?;
            if !outcome.warnings.is_empty() {
                result["warnings"] = serde_json::to_value(&outcome.warnings)
                    .map_err(|e| EngramError::internal(e.to_string()))?;
            }
            Ok(result)
        })
        .await,
        "recall" => call(move |token| {
            let req: RecallRequest = decode(request.params)?;
            let hits = engram.recall(&req, &token)?;
            Ok(json!({ "memories": hits }))
        })
        .await,
        "forget" => call(move |_token| {
            let id = request
                .params
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| EngramError::invalid_field("id", "required string"))?;
            engram.delete(id)?;
            Ok(json!({ "deleted": true }))
        })
        .await,
        "status" => call(move |_token| {
            let snapshot = engram.status()?;
            serde_json::to_value(snapshot).map_err(|e| EngramError::internal(e.to_string()))
        })
        .await,
        other => Err(RpcError {
            code: -32601,
            message: format!("unknown method {other:?}"),
            data: None,
        }),
    }
}

/// Run a core call on the blocking pool, mapping its error into the
/// in-band taxonomy.
async fn call<F>(f: F) -> Result<Value, RpcError>
where
    F: FnOnce(CancellationToken) -> EngramResult<Value> + Send + 'static,
{
    let token = CancellationToken::new();
    let joined = tokio::task::spawn_blocking(move || f(token)).await;
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(to_rpc_error(e)),
        Err(e) => Err(to_rpc_error(EngramError::internal(format!(
            "worker task failed: {e}"
        )))),
    }
}

fn decode<T: serde::de::DeserializeOwned>(params: Value) -> EngramResult<T> {
    serde_json::from_value(params)
        .map_err(|e| EngramError::invalid_field("params", e.to_string()))
}

fn to_rpc_error(e: EngramError) -> RpcError {
    RpcError {
        code: -32000,
        message: e.to_string(),
        data: Some(json!({ "kind": e.kind() })),
    }
}
