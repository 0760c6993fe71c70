//! Campus Points - gamification engine for academic resource sharing
//!
//! Architecture:
//! - SeaORM for database access (SQLite) behind the `Store` trait
//! - Axum for the HTTP API with rate limiting
//! - Plugins supervised on Tokio tasks

mod cache;
mod catalog;
mod entity;
mod error;
mod plugins;
mod points;
mod prelude;
mod state;
mod store;
mod sv;
mod utils;

use std::sync::Arc;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::{App, cron, server},
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "campus_points=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  info!("Starting Campus Points v{}", env!("CARGO_PKG_VERSION"));

  let app = Arc::new(AppState::new(config).await?);

  let running =
    App::new().register(server::Plugin).register(cron::Plugin).run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down");
  running.shutdown().await;

  Ok(())
}
