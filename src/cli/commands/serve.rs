use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing::{info, warn};

use super::ServiceContext;
use crate::domain::models::{Config, ServerConfig};
use crate::infrastructure::http::{serve_with_shutdown, AppState};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind, overriding the configuration
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip fetching the bulk collections before serving
    #[arg(long)]
    pub no_warm: bool,
}

impl ServeArgs {
    /// Server settings with command-line overrides applied
    pub fn server_config(&self, base: &ServerConfig) -> ServerConfig {
        ServerConfig {
            host: self.host.clone().unwrap_or_else(|| base.host.clone()),
            port: self.port.unwrap_or(base.port),
            warm_cache: base.warm_cache && !self.no_warm,
        }
    }
}

pub async fn execute(args: ServeArgs, config: &Config) -> Result<()> {
    let server = args.server_config(&config.server);
    let context = ServiceContext::from_config(config)?;

    info!(
        upstream = %config.upstream.base_url,
        ttl_secs = config.cache.ttl_secs,
        "starting rickmorty-api"
    );

    if server.warm_cache {
        for (collection, err) in context.cache.warm().await {
            warn!(%collection, error = %err, "cache warm-up failed, will refresh on first request");
        }
    }

    let state = Arc::new(AppState::new(context.search, context.cache));
    serve_with_shutdown(&server, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => warn!(error = %err, "failed to listen for shutdown signal"),
    }
}
