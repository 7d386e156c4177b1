//! Serve command - HTTP front end over the extraction pipeline.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use stockscan_core::{
    EngineAvailability, ExtractionEnvelope, Extractor, ImageUpload, StockscanError, TesseractEngine,
};

use super::{build_extractor, load_config};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (default: server.host)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (default: server.port)
    #[arg(short, long)]
    port: Option<u16>,
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor<TesseractEngine>>,
    pub availability: Arc<EngineAvailability>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let (availability, extractor) = build_extractor(&config)?;
    match &availability {
        EngineAvailability::Available { binary, version } => {
            info!("Using {} at {}", version, binary.display());
        }
        EngineAvailability::Unavailable { reason } => {
            warn!("Serving in demo mode: {}", reason);
        }
    }

    let state = AppState {
        extractor: Arc::new(extractor),
        availability: Arc::new(availability),
    };
    let app = router(state, config.server.max_upload_bytes);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    eprintln!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the service router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/extract-text", post(extract_text))
        .route("/save-items", post(save_items))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Error body `{"error": message}` with a status code.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<StockscanError> for ApiError {
    fn from(err: StockscanError) -> Self {
        match err {
            StockscanError::Request(e) => Self::bad_request(e.to_string()),
            other => {
                error!("Request failed: {}", other);
                Self::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionEnvelope>, ApiError> {
    // A non-multipart body simply has no image field.
    let upload = match multipart {
        Ok(multipart) => find_image(multipart).await?,
        Err(_) => None,
    };

    let extractor = state.extractor.clone();
    let result = tokio::task::spawn_blocking(move || extractor.extract_upload(upload))
        .await
        .map_err(|e| ApiError::internal(format!("Extraction task failed: {}", e)))??;

    Ok(Json(ExtractionEnvelope::from(result)))
}

/// Pull the `image` file part out of the form, if present.
///
/// Only parts carrying a `filename` count as files. A plain text field named
/// `image` is ignored.
async fn find_image(mut multipart: Multipart) -> Result<Option<ImageUpload>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError {
        status: e.status(),
        message: e.body_text(),
    })? {
        if field.name() != Some("image") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(|e| ApiError {
            status: e.status(),
            message: e.body_text(),
        })?;

        return Ok(Some(ImageUpload::new(filename, bytes)));
    }

    Ok(None)
}

#[derive(Deserialize)]
struct SaveItemsRequest {
    #[serde(default)]
    items: Vec<Value>,
}

async fn save_items(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let items = if body.is_empty() {
        Vec::new()
    } else {
        serde_json::from_slice::<SaveItemsRequest>(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?
            .items
    };

    let saved_file = state
        .extractor
        .sink()
        .save_confirmed_items(&items)
        .map_err(ApiError::from)?;

    Ok(Json(json!({ "saved_file": saved_file })))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let ocr = if state.availability.is_available() {
        "available"
    } else {
        "demo_mode"
    };

    Json(json!({ "status": "healthy", "ocr": ocr }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
