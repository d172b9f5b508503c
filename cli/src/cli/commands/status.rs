use std::path::PathBuf;

use nowplaying_core::config::load_config_with_source;

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, source) = load_config_with_source(config_path)?;

    println!("Now Playing Overlay Status");
    println!("==========================");
    println!();
    println!("Configuration:");
    match &source {
        Some(path) => println!("  Config file: {:?}", path),
        None => println!("  Config file: none (defaults)"),
    }
    println!("  Static dir: {:?}", config.overlay.static_dir);
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  LAN access: {}", config.server.allow_lan_access);
    println!();
    println!("Relay settings:");
    println!("  Chunk size: {} bytes", config.relay.chunk_size);
    match config.relay.request_timeout {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }

    // Check if server is reachable
    println!();
    let url = format!("http://{}:{}/healthz", config.server.host, config.server.port);
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}
