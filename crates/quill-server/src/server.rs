use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use quill_storage::{Storage, UploadStore, upload::normalize_prefix};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::forms::create_submission;
use crate::posts::{create_post, delete_post, get_post, list_posts, update_post};
use crate::state::AppState;

pub struct QuillServer {
    state: AppState,
    static_prefix: String,
    max_body_bytes: Option<usize>,
}

impl QuillServer {
    pub fn new(storage: Storage, uploads: UploadStore) -> Self {
        Self {
            state: AppState::new(storage, uploads),
            static_prefix: "/uploads".to_string(),
            max_body_bytes: None,
        }
    }

    /// URL path the upload directory is served under
    pub fn with_static_prefix(mut self, prefix: &str) -> Self {
        self.static_prefix = normalize_prefix(prefix);
        self
    }

    /// Cap request bodies at `limit` bytes; `None` removes the cap
    pub fn with_body_limit(mut self, limit: Option<usize>) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn router(&self) -> Router {
        // Add CORS layer to allow connections from any origin
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let body_limit = match self.max_body_bytes {
            Some(limit) => DefaultBodyLimit::max(limit),
            None => DefaultBodyLimit::disable(),
        };

        let static_files = ServeDir::new(self.state.uploads.root());

        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/posts", get(list_posts).post(create_post))
            .route(
                "/posts/:id",
                get(get_post).put(update_post).delete(delete_post),
            )
            .route("/form", post(create_submission))
            .with_state(self.state.clone());

        let app = if self.static_prefix.is_empty() {
            app.fallback_service(static_files)
        } else {
            app.nest_service(&self.static_prefix, static_files)
        };

        app.layer(body_limit)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Bind `addr` and serve until Ctrl-C or SIGTERM
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let app = self.router();
        let listener = TcpListener::bind(addr).await?;

        info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// GET /health
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "name": "quill",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = until_signal("Ctrl-C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = until_signal("SIGTERM", async {
        let mut signal =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        signal.recv().await;
        Ok::<(), std::io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}

/// Resolves when `listener` fires. A listener that cannot be installed never
/// resolves, so the server keeps running on the remaining signals.
async fn until_signal<F>(name: &str, listener: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = listener.await {
        tracing::error!("Failed to listen for {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}
