use std::path::PathBuf;

use nowplaying_core::config::load_config;
use nowplaying_core::overlay::relay_url;

pub fn run(config_path: Option<PathBuf>, target: &str) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let base = format!("http://{}:{}", config.server.host, config.server.port);
    println!("{}", relay_url(&base, target));
    Ok(())
}
