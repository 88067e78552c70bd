use axum::extract::Extension;
use axum::routing::get;
use axum::Router;
use chord_gateway::dht::handlers::{handle_get_value, handle_put_value};
use chord_gateway::dht::runner::{DhtClient, DhtPrograms};
use chord_gateway::ring::handlers::{handle_health, handle_nodes};
use chord_gateway::ring::store::RingStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> [--db <path>] [--get-bin <path>] [--put-bin <path>] [--op-timeout <secs>]",
            args[0]
        );
        eprintln!("Example: {} --bind 127.0.0.1:8000 --db connections.db", args[0]);

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut db_path = PathBuf::from("connections.db");
    let mut get_bin = PathBuf::from("dht-get");
    let mut put_bin = PathBuf::from("dht-put");
    let mut op_timeout_secs: u64 = 10;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--db" => {
                db_path = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--get-bin" => {
                get_bin = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--put-bin" => {
                put_bin = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--op-timeout" => {
                op_timeout_secs = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");

    tracing::info!("Starting gateway on {}", bind_addr);
    tracing::info!("Ring database: {}", db_path.display());
    tracing::info!(
        "Client programs: get={} put={} (timeout {}s)",
        get_bin.display(),
        put_bin.display(),
        op_timeout_secs
    );

    // 1. Topology store (read-only, fails fast on a missing ring database):
    let store = Arc::new(RingStore::open(&db_path)?);

    // 2. Operations client:
    let dht = Arc::new(DhtClient::new(
        DhtPrograms {
            get: get_bin,
            put: put_bin,
        },
        Duration::from_secs(op_timeout_secs),
    ));

    // 3. HTTP Router:
    let app = Router::new()
        .route("/nodes", get(handle_nodes))
        .route("/nodes/:key", get(handle_get_value))
        .route("/nodes/:key/:value", get(handle_put_value))
        .route("/health", get(handle_health))
        .layer(Extension(store))
        .layer(Extension(dht));

    // 4. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app).await?;

    Ok(())
}
