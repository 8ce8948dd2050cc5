//! # engram-server
//!
//! The daemon surface: an axum router bound to localhost implementing the
//! HTTP API, a newline-framed JSON-RPC adapter exposing the four agent
//! tools over stdio, and the `Engram` service value both surfaces share.

pub mod http;
pub mod service;
pub mod tools;

pub use service::Engram;
