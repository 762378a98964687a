//! Documentation of the korysanchez.me backend.
//!
//! Two unrelated pieces live here: a LEGO parts inventory and a personal finance ledger.
//! Both sit on SQLite files next to the server.
//!
//!
//!
//! # General Infrastructure
//! - Frontend is a separate React app, served elsewhere
//! - This server only answers `/api/...`, `/lego/api/...` and a couple of file routes
//! - CORS is locked to the frontend origins (`ALLOWED_ORIGINS`)
//! - `www.` requests to `/` are redirected to the bare domain
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Notes |
//! |---|---|---|
//! | GET | `/` | welcome text or `www.` redirect |
//! | POST | `/api/finance` | needs the `pw` header |
//! | GET | `/download-resume` | pdf attachment |
//! | GET | `/part_images/{file}` | static part renders |
//! | GET | `/lego/api/boxes` | every box id |
//! | GET | `/lego/api/box/{box_id}` | containers of a box with their pieces |
//! | GET | `/lego/api/container/{container_id}` | 404 when missing, 400 when malformed |
//! | GET | `/lego/api/piece/search?type=&term=` | `type` is `part_number`, `name` or `category` |
//! | GET | `/lego/api/positions` | every position id |
//! | GET | `/lego/api/categories` | distinct piece categories |
//!
//! Errors come back as `{"error": "..."}`.
//!
//!
//!
//! # Setup
//!
//! Seed a local inventory.
//! ```sh
//! cargo run -p seeder -- lego_db.db inventory.json
//! ```
//!
//! Run the server.
//! ```sh
//! RUST_LOG=info FINANCE_API_PW=secret cargo run -p site
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod finance;
pub mod lego;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::AppError;
use routes::{
    box_handler, boxes_handler, categories_handler, container_handler, finance_handler,
    home_handler, positions_handler, resume_handler, search_handler,
};
use state::State;
use utils::PASSWORD_HEADER;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new(Config::load()).await?;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?;

    info!("Server shutting down...");
    Ok(())
}

pub fn router(state: Arc<State>) -> Router {
    let lego = Router::new()
        .route("/boxes", get(boxes_handler))
        .route("/box/{box_id}", get(box_handler))
        .route("/container/{container_id}", get(container_handler))
        .route("/piece/search", get(search_handler))
        .route("/positions", get(positions_handler))
        .route("/categories", get(categories_handler));

    Router::new()
        .route("/", get(home_handler))
        .route("/api/finance", post(finance_handler))
        .route("/download-resume", get(resume_handler))
        .nest_service("/part_images", ServeDir::new(&state.config.part_images_dir))
        .nest("/lego/api", lego)
        .layer(cors(&state.config.allowed_origins))
        .with_state(state)
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .map_err(|_| warn!("Skipping invalid origin {origin}"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(PASSWORD_HEADER)])
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
