mod appstate;
mod config;
mod controller;
mod error;
mod guard;
mod identity;
mod model;
mod plugins;
#[cfg(test)]
mod testing;
mod toast;
mod views;

use std::net::SocketAddr;

use appstate::AppState;
use axum::{Router, http::StatusCode};
use axum_login::AuthManagerLayerBuilder;
use config::Config;
use controller::Routes;
use error::Error;
use identity::AuthIdentity;
use maud::Markup;
use model::database::{Database, DatabaseComponent};
use plugins::{dashboard::Dashboard, home::Home, users::User};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use views::utils::page_not_found;

async fn handler_404() -> (StatusCode, Markup) {
    (StatusCode::NOT_FOUND, page_not_found())
}

async fn create_database(config: &Config) -> Result<Database, Error> {
    Database::new_with_filename(&config.database_file)
        .await?
        .initialise_table::<User>()
        .await
}

pub fn create_router(state: AppState, config: &Config) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.session_secure);
    let auth_layer = AuthManagerLayerBuilder::new(state.pool.clone(), session_layer).build();

    let dashboard = guard::protect(
        Router::<AppState>::new().add_routes::<Dashboard>(),
        AuthIdentity::new(state.pool.clone()),
    );

    Router::<AppState>::new()
        .add_routes::<Home>()
        .add_routes::<User>()
        .merge(dashboard)
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .fallback(handler_404)
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn create_listener(addr: SocketAddr) -> Result<TcpListener, Error> {
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!(target: "app", "Serving app at: http://{}", addr);
            Ok(listener)
        }
        Err(err) => Err(Error::SocketBind(format!("{addr}: {err}"))),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: "app", ?err, "failed to listen for shutdown signal");
    }
    info!(target: "app", "shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let db = create_database(&config).await?;
    let app = create_router(AppState::new(db), &config);
    let listener = create_listener(config.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| Error::SocketBind(format!("{:?}", err)))
}
