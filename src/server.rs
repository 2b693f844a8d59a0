use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cli::ServeArgs;
use crate::config::SiteConfig;
use crate::metadata::PageMetadata;
use crate::site::Site;

#[derive(Clone)]
struct AppState {
    site: Arc<Site>,
}

/// `/` and `/healthz`, plus static assets from `public_dir` when it exists.
pub fn router(site: Arc<Site>, public_dir: Option<&Path>) -> Router {
    let state = AppState { site };

    let mut app = Router::new()
        .route("/", get(landing_handler))
        .route("/healthz", get(|| async { "ok\n" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match public_dir {
        Some(dir) if dir.is_dir() => {
            app = app.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => {
            tracing::warn!(dir = %dir.display(), "public dir not found; static assets disabled");
        }
        None => {}
    }

    app
}

async fn landing_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.site.render(&PageMetadata::default()))
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let site = Site::new(SiteConfig::from_env()).context("configure site")?;
    let app = router(Arc::new(site), Some(&args.public_dir));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutting down");
}
