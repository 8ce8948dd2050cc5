//! Tool declarations returned once at protocol init.

use serde_json::{json, Value};

pub fn tool_list() -> Value {
    json!([
        {
            "name": "remember",
            "description": "Store one memory. Missing fields (category, entity, confidence) are extracted from the content.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "content": { "type": "string", "minLength": 1, "maxLength": 8192 },
                    "category": { "type": "string", "enum": ["preference", "fact", "pattern", "decision", "outcome"] },
                    "entity": { "type": "string" },
                    "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                    "namespace": { "type": "string" },
                    "tags": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["content"],
                "additionalProperties": false
            }
        },
        {
            "name": "recall",
            "description": "Search memories with the hybrid semantic + keyword score.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "limit": { "type": "integer", "minimum": 1, "maximum": 100 },
                    "threshold": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                    "namespace": { "type": "string" },
                    "category": { "type": "string", "enum": ["preference", "fact", "pattern", "decision", "outcome"] }
                },
                "required": ["query"],
                "additionalProperties": false
            }
        },
        {
            "name": "forget",
            "description": "Delete one memory by id.",
            "inputSchema": {
                "type": "object",
                "properties": { "id": { "type": "string" } },
                "required": ["id"],
                "additionalProperties": false
            }
        },
        {
            "name": "status",
            "description": "Store and model status snapshot.",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        }
    ])
}
