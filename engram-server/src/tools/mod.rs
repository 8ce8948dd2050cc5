//! Newline-framed JSON-RPC adapter for agent hosts.
//!
//! One JSON object per line on stdin, one per line on stdout. The
//! `initialize` method declares the four tool schemas once; tool errors
//! come back in-band carrying the same `kind` taxonomy as HTTP.

mod dispatch;
mod schemas;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::service::Engram;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    fn result(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Serve the tool protocol until stdin closes.
pub async fn serve_stdio(engram: Arc<Engram>) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    tracing::info!("tool protocol listening on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(engram.clone(), &line).await;
        let mut framed = serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":-32603,"message":"encode failed: {e}"}}}}"#
            )
        });
        framed.push('\n');
        stdout.write_all(framed.as_bytes()).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed; tool protocol shutting down");
    Ok(())
}

/// Handle one framed request line. Public so hosts embedding the adapter
/// (and tests) can drive it without owning the process stdio.
pub async fn handle_line(engram: Arc<Engram>, line: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return RpcResponse::error(
                None,
                RpcError {
                    code: -32700,
                    message: format!("parse error: {e}"),
                    data: None,
                },
            )
        }
    };

    let id = request.id.clone();
    match dispatch::dispatch(engram, request).await {
        Ok(result) => RpcResponse::result(id, result),
        Err(error) => RpcResponse::error(id, error),
    }
}
