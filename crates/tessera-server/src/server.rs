//! HTTP server: component listing, render and export endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use tessera_components::ComponentDescriptor;
use tessera_render::{Pipeline, PipelineConfig};

use crate::error::ApiError;
use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{LiveHub, LiveMessage};

/// Configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Component, template and export locations
    pub pipeline: PipelineConfig,

    /// Static builder UI assets
    pub public_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Watch fragments and templates for changes
    pub watch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            public_dir: PathBuf::from("public"),
            port: 3000,
            host: "127.0.0.1".to_string(),
            open: true,
            watch: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// State shared by all handlers.
pub struct AppState {
    pipeline: Pipeline,
    hub: LiveHub,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            hub: LiveHub::new(),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn hub(&self) -> &LiveHub {
        &self.hub
    }
}

/// Response of the component listing.
#[derive(Debug, Serialize)]
pub struct ComponentsResponse {
    pub components: Vec<ComponentDescriptor>,
}

/// Body of a render request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub selected_components: Vec<String>,
}

/// Response of a render request.
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

/// Body of an export request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub selected_components: Vec<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response of a successful export.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub path: String,
    pub filename: String,
    pub folder: String,
}

/// Build the application router over `state`.
pub fn router(state: Arc<AppState>, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/components", get(components_handler))
        .route("/api/render", post(render_handler))
        .route("/api/export", post(export_handler))
        .route("/api/events", get(ws_handler))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}

/// The tessera server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_str = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr_str.clone()))?;

        let state = Arc::new(AppState::new(self.config.pipeline.clone()));

        if self.config.watch {
            let (watcher, mut rx) = FileWatcher::new(
                &self.config.pipeline.components_dir,
                self.config.pipeline.templates_dir.as_deref(),
            )
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

            let state_clone = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle_watch_event(&state_clone, event);
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let app = router(state, self.config.public_dir.clone());

        tracing::info!("Tessera running at http://{}", addr);
        tracing::info!(
            "Serving components from: {}",
            self.config.pipeline.components_dir.display()
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handle file watch events.
fn handle_watch_event(state: &AppState, event: WatchEvent) {
    match event {
        WatchEvent::ComponentChanged(path) => {
            tracing::info!("Component changed: {}", path.display());
            state.pipeline.store().invalidate();
            state.hub.send(LiveMessage::ComponentsChanged {
                path: path.display().to_string(),
            });
        }
        WatchEvent::TemplateChanged(path) => {
            tracing::info!("Template changed: {}", path.display());
            state.hub.send(LiveMessage::TemplatesChanged {
                path: path.display().to_string(),
            });
        }
    }
}

async fn components_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ComponentsResponse>, ApiError> {
    let components = state.pipeline.components()?;
    Ok(Json(ComponentsResponse { components }))
}

async fn render_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<RenderResponse>, ApiError> {
    let Json(request) = body?;
    let preview = state.pipeline.preview(&request.selected_components)?;
    Ok(Json(RenderResponse {
        html: preview.into_html(),
    }))
}

async fn export_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportResponse>, ApiError> {
    let Json(request) = body?;
    let outcome = state
        .pipeline
        .export(&request.selected_components, request.filename.as_deref())?;

    Ok(Json(ExportResponse {
        success: true,
        path: outcome.path.display().to_string(),
        filename: outcome.filename,
        folder: outcome.folder,
    }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward change notifications to one client.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.hub.subscribe();

    if send_json(&mut socket, &LiveMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_json(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &LiveMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|e| {
        tracing::warn!("Failed to encode live message: {}", e);
    })?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn default_config_uses_standard_paths() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.pipeline.output_dir, PathBuf::from("GUI_Output"));
    }

    #[test]
    fn component_change_invalidates_cache_and_notifies() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("hero.html"), "v1").unwrap();

        let state = AppState::new(PipelineConfig {
            components_dir: temp.path().to_path_buf(),
            templates_dir: None,
            cache: true,
            ..Default::default()
        });
        let mut rx = state.hub().subscribe();

        assert!(state.pipeline().render(&["hero"]).unwrap().contains("v1"));

        fs::write(temp.path().join("hero.html"), "v2").unwrap();
        assert!(state.pipeline().render(&["hero"]).unwrap().contains("v1"));

        handle_watch_event(
            &state,
            WatchEvent::ComponentChanged(temp.path().join("hero.html")),
        );

        assert!(state.pipeline().render(&["hero"]).unwrap().contains("v2"));
        assert!(matches!(
            rx.try_recv(),
            Ok(LiveMessage::ComponentsChanged { .. })
        ));
    }
}
