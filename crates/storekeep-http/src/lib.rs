//! Admin HTTP routes for storekeep backups
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | POST | `/api/backup/create` | create-backup |
//! | POST | `/api/backup/auto` | auto-backup |
//! | GET | `/api/backup/list` | list-backups |
//! | POST | `/api/backup/restore` | restore-backup |
//! | DELETE | `/api/backup/clean` | clean-old-backups |
//!
//! Every route requires `Authorization: Bearer <admin token>`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

pub fn build_router(state: ApiState) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route("/api/backup/create", post(handlers::create_backup))
        .route("/api/backup/auto", post(handlers::auto_backup))
        .route("/api/backup/list", get(handlers::list_backups))
        .route("/api/backup/restore", post(handlers::restore_backup))
        .route("/api/backup/clean", delete(handlers::clean_backups))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::require_admin,
        ))
        .layer(axum_middleware::from_fn(middleware::log_requests))
}

/// Serves the backup routes until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ApiState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Backup API listening on {}", addr);
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
