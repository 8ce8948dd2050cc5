//! engramd — the local memory daemon.
//!
//! Serves the HTTP API on localhost and, with `--stdio`, the tool
//! protocol for agent hosts on stdin/stdout. One daemon per data
//! directory, enforced by the instance lock.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use engram_core::config::EngramConfig;
use engram_core::Embedder;
use engram_embeddings::EmbeddingEngine;
use engram_server::{http, tools, Engram};
use engram_store::{InstanceLock, StoreEngine};

#[derive(Debug, Default)]
struct Args {
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    stdio: bool,
}

const USAGE: &str = "\
engramd - local-first persistent memory for AI agents

USAGE:
    engramd [OPTIONS]

OPTIONS:
    --port <PORT>        HTTP port (default 3838)
    --data-dir <PATH>    Data directory (default ~/.engram)
    --config <PATH>      Config file (default <data-dir>/config.toml)
    --stdio              Also serve the tool protocol on stdin/stdout
    -h, --help           Print this help
";

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--port" => {
                let value = iter.next().context("--port needs a value")?;
                args.port = Some(value.parse().context("--port must be a number")?);
            }
            "--data-dir" => {
                args.data_dir = Some(PathBuf::from(iter.next().context("--data-dir needs a value")?));
            }
            "--config" => {
                args.config = Some(PathBuf::from(iter.next().context("--config needs a value")?));
            }
            "--stdio" => args.stdio = true,
            "-h" | "--help" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other:?} (see --help)"),
        }
    }
    Ok(args)
}

fn init_tracing(logs_dir: &std::path::Path) {
    let filter = EnvFilter::try_from_env("ENGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(logs_dir.join("engramd.log"))
    {
        Ok(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init(),
        Err(_) => registry.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    // Resolve the data directory before the config file, which lives in it.
    let default_data_dir = || {
        dirs::home_dir()
            .map(|h| h.join(".engram"))
            .unwrap_or_else(|| PathBuf::from(".engram"))
    };
    let bootstrap_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| bootstrap_dir.join("config.toml"));

    let mut config = EngramConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    let data_dir = args
        .data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(default_data_dir);
    config.data_dir = Some(data_dir.clone());

    let models_dir = data_dir.join("models");
    let logs_dir = data_dir.join("logs");
    for dir in [&data_dir, &models_dir, &logs_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    init_tracing(&logs_dir);

    let db_path = data_dir.join("memory.db");
    let _lock = InstanceLock::acquire(&db_path)?;

    let embeddings = Arc::new(EmbeddingEngine::new(&config.embedding, &models_dir));
    let store = Arc::new(StoreEngine::open(
        &db_path,
        config.embedding.dimensions,
        embeddings.name(),
    )?);

    let port = config.http.port;
    let engram = Arc::new(Engram::new(config, store, embeddings));

    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, port))
        .await
        .with_context(|| format!("binding 127.0.0.1:{port}"))?;
    info!(port, data_dir = %data_dir.display(), "engramd listening");

    let app = http::router(engram.clone());

    if args.stdio {
        // Serve both surfaces; exit when the host closes stdin or on ^C.
        let http_server = async move { axum::serve(listener, app).await };
        tokio::select! {
            result = http_server => result.context("http server")?,
            result = tools::serve_stdio(engram) => result.context("stdio adapter")?,
            _ = tokio::signal::ctrl_c() => info!("interrupt; shutting down"),
        }
    } else {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("interrupt; shutting down");
            })
            .await
            .context("http server")?;
    }

    Ok(())
}
