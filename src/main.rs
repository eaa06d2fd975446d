// src/main.rs
mod auth;
mod catalog;
mod config;
mod database;
mod dtos;
mod error;
mod extractors;
mod handlers;
mod middleware;
mod models;
mod routes;
mod state;
mod validation;

use tracing_subscriber::fmt::init as tracing_init;
use tokio::net::TcpListener;
use dotenvy::dotenv;
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();

    let config = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    let db_pool = match database::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return;
        }
    };

    if let Err(e) = database::run_migrations(&db_pool).await {
        tracing::error!(error = %e, "Failed to run migrations");
        return;
    }

    if let Some(seed) = &config.bootstrap_admin {
        if let Err(e) = handlers::user::bootstrap_admin(&db_pool, seed).await {
            tracing::error!(error = %e, "Failed to bootstrap admin user");
            return;
        }
    }

    let host = config.host;
    let base_port = config.port;
    let app = routes::app(state::AppState::new(db_pool, config));

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = base_port.saturating_add(offset);
            let addr = SocketAddr::from((host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", base_port, host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}
