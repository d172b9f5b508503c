use std::path::PathBuf;

use nowplaying_core::config::load_config;
use nowplaying_core::lifecycle::{HostLifecycle, ServiceHost};
use nowplaying_core::overlay::server::shutdown_signal;

pub async fn run(config_path: Option<PathBuf>, port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    tracing::info!("Starting Now Playing Overlay...");
    tracing::info!("  Bind: {}:{}", config.server.bind_address(), config.server.port);
    tracing::info!("  Static dir: {:?}", config.overlay.static_dir);
    tracing::info!("  Relay chunk size: {} bytes", config.relay.chunk_size);
    match config.relay.request_timeout {
        Some(secs) => tracing::info!("  Relay timeout: {}s", secs),
        None => tracing::info!("  Relay timeout: none"),
    }

    if !config.overlay.static_dir.join("index.html").exists() {
        tracing::warn!(
            "No index.html in {:?}; the overlay page will answer 404",
            config.overlay.static_dir
        );
    }

    // Same path a host plugin takes: load starts the background server and returns.
    let mut host = ServiceHost::new(config);
    host.on_load()?;

    if let Some(addr) = host.local_addr() {
        tracing::info!("Overlay available at http://{}/", addr);
    }
    tracing::info!("Press Ctrl+C to stop");

    shutdown_signal().await;

    tokio::task::spawn_blocking(move || host.on_unload()).await??;

    Ok(())
}
