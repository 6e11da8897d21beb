//! Inkroom relay server
//!
//! Relays committed shapes between clients in the same room and stores
//! whole drawings per room.
//!
//! ## Protocol
//!
//! Messages are JSON with the following format:
//! ```json
//! { "type": "join", "room": "demo-room" }
//! { "type": "add_shape", "shape": { "id": "…", "type": "line", "x1": 0, "y1": 0, "x2": 10, "y2": 10 } }
//! { "type": "leave" }
//! ```
//!
//! Shapes are never echoed back to their sender.

mod routes;
mod state;

use anyhow::Context;
use axum::{Router, routing::get};
use clap::Parser;
use inkroom_core::storage::{FileStorage, MemoryStorage, Storage};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "inkroom-server")]
#[command(about = "Realtime relay and storage for inkroom rooms")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "INKROOM_ADDR", default_value = "0.0.0.0:3030")]
    addr: SocketAddr,

    /// Directory for stored drawings (defaults to the platform data dir)
    #[arg(long, env = "INKROOM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep drawings in memory only
    #[arg(long, conflicts_with = "data_dir")]
    memory: bool,
}

fn open_storage(args: &Args) -> anyhow::Result<Arc<dyn Storage>> {
    if args.memory {
        return Ok(Arc::new(MemoryStorage::new()));
    }
    let storage = match &args.data_dir {
        Some(dir) => FileStorage::new(dir.clone()),
        None => FileStorage::default_location(),
    }
    .context("opening drawing storage")?;
    info!("Storing drawings in {}", storage.base_path().display());
    Ok(Arc::new(storage))
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/ws", get(routes::ws_handler))
        .route("/health", get(routes::health))
        .route(
            "/rooms/{room}/drawing",
            get(routes::get_drawing).put(routes::put_drawing),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkroom_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(AppState::new(open_storage(&args)?));

    info!("Inkroom relay server listening on {}", args.addr);
    info!("WebSocket endpoint: ws://{}/ws", args.addr);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
