//! Static file server for the generated site.
//!
//! Plain file serving: directories resolve to their `index.html`, and every
//! response is marked `no-cache` so a reload always shows the latest build.

use axum::Router;
use axum::http::{HeaderValue, header};
use std::path::Path;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Build the router serving `root`.
pub fn router(root: &Path) -> Router {
    let files = ServeDir::new(root).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(files)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serve `root` on an already-bound listener until `shutdown` fires or its
/// sender is dropped.
pub async fn serve(
    listener: TcpListener,
    root: &Path,
    shutdown: oneshot::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, router(root))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
}
