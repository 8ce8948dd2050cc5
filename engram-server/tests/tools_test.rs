use std::sync::Arc;

use serde_json::{json, Value};

use engram_core::config::EngramConfig;
use engram_embeddings::EmbeddingEngine;
use engram_server::{tools, Engram};
use engram_store::StoreEngine;
use test_fixtures::StubEmbedder;

const DIM: usize = 64;

fn setup() -> Arc<Engram> {
    let stub = Arc::new(StubEmbedder::new(DIM));
    let embeddings = Arc::new(EmbeddingEngine::with_provider(Box::new(stub), 64));
    let store = Arc::new(StoreEngine::open_in_memory(DIM, "stub-one-hot").unwrap());
    Arc::new(Engram::new(EngramConfig::default(), store, embeddings))
}

async fn call(engram: &Arc<Engram>, request: Value) -> Value {
    let response = tools::handle_line(engram.clone(), &request.to_string()).await;
    serde_json::to_value(&response).unwrap()
}

#[tokio::test]
async fn initialize_declares_the_four_tools() {
    let engram = setup();
    let response = call(
        &engram,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }),
    )
    .await;

    assert_eq!(response["id"], 1);
    let tools: Vec<&str> = response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tools, vec!["remember", "recall", "forget", "status"]);
}

#[tokio::test]
async fn remember_then_recall_round_trips() {
    let engram = setup();

    let remembered = call(
        &engram,
        json!({
            "jsonrpc": "2.0", "id": 2, "method": "remember",
            "params": { "content": "I prefer dark mode" }
        }),
    )
    .await;
    assert!(remembered["error"].is_null());
    assert_eq!(remembered["result"]["category"], "preference");
    assert_eq!(remembered["result"]["source"], "mcp");

    let recalled = call(
        &engram,
        json!({
            "jsonrpc": "2.0", "id": 3, "method": "recall",
            "params": { "query": "dark mode preference", "threshold": 0.0 }
        }),
    )
    .await;
    let hits = recalled["result"]["memories"].as_array().unwrap();
    assert_eq!(hits[0]["id"], remembered["result"]["id"]);
}

#[tokio::test]
async fn forget_missing_id_carries_the_kind_taxonomy() {
    let engram = setup();
    let response = call(
        &engram,
        json!({
            "jsonrpc": "2.0", "id": 4, "method": "forget",
            "params": { "id": "no-such-memory" }
        }),
    )
    .await;
    assert_eq!(response["error"]["data"]["kind"], "NotFound");
}

#[tokio::test]
async fn unknown_method_is_a_method_not_found() {
    let engram = setup();
    let response = call(
        &engram,
        json!({ "jsonrpc": "2.0", "id": 5, "method": "hypnotize" }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn parse_error_is_reported_in_band() {
    let engram = setup();
    let response = tools::handle_line(engram, "{not json").await;
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"]["code"], -32700);
}

#[tokio::test]
async fn status_tool_matches_the_http_shape() {
    let engram = setup();
    call(
        &engram,
        json!({
            "jsonrpc": "2.0", "id": 6, "method": "remember",
            "params": { "content": "plain fact row" }
        }),
    )
    .await;

    let response = call(
        &engram,
        json!({ "jsonrpc": "2.0", "id": 7, "method": "status" }),
    )
    .await;
    assert_eq!(response["result"]["memory"]["total"], 1);
    assert_eq!(response["result"]["model"]["name"], "stub-one-hot");
}
