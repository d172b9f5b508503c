use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overlay server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_lan_access: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_lan_access: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Directory holding index.html and the page's assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Size of the chunks forwarded to the caller
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Whole-request timeout in seconds for the outbound fetch. Unset means wait forever.
    #[serde(default)]
    pub request_timeout: Option<u64>,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            request_timeout: None,
            user_agent: None,
        }
    }
}

// Default value functions
fn default_port() -> u16 { 12479 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_chunk_size() -> usize { 4096 }

/// Get default config file path
/// Uses ~/.config/nowplaying-overlay/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("nowplaying-overlay")
        .join("config.toml")
}

/// Parse and validate a TOML document
pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    let mut config: Config = toml::from_str(content)?;
    if config.relay.chunk_size == 0 {
        anyhow::bail!("relay.chunk_size must be greater than zero");
    }
    config.overlay.static_dir = expand_path(&config.overlay.static_dir);
    Ok(config)
}

/// Resolve a relative static directory against `base`.
pub fn resolve_static_dir(dir: &Path, base: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    }
}

// Without a config file, prefer ./static, then static/ next to the executable.
fn locate_default_static_dir(dir: &Path) -> PathBuf {
    if dir.is_dir() {
        return dir.to_path_buf();
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|parent| resolve_static_dir(dir, parent)));
    match beside_exe {
        Some(candidate) if candidate.is_dir() => candidate,
        _ => dir.to_path_buf(),
    }
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.overlay.static_dir = resolve_static_dir(&config.overlay.static_dir, base);
    Ok(config)
}

/// Load config from file, or return defaults if not found.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    load_config_with_source(path).map(|(config, _)| config)
}

/// Load config and report which file it came from (`None` for defaults).
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/nowplaying-overlay/config.toml)
///
/// A relative `overlay.static_dir` is taken relative to the file it was read from.
pub fn load_config_with_source(
    path: Option<PathBuf>,
) -> anyhow::Result<(Config, Option<PathBuf>)> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let config = read_config(&config_path)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok((config, Some(config_path)));
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    let local_config = PathBuf::from("config.toml");
    if local_config.exists() {
        match read_config(&local_config) {
            Ok(config) => {
                tracing::info!("Loaded config from current directory {:?}", local_config);
                return Ok((config, Some(local_config)));
            }
            Err(e) => {
                tracing::error!("Failed to load ./config.toml: {}. Falling back to default path.", e);
            }
        }
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let config = read_config(&default_path)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok((config, Some(default_path)))
    } else {
        tracing::info!("No config file found, using defaults");
        let mut config = Config::default();
        config.overlay.static_dir = locate_default_static_dir(&config.overlay.static_dir);
        Ok((config, None))
    }
}

/// Expand ~ in path to home directory
pub fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.port, 12479);
        assert_eq!(config.server.bind_address(), "127.0.0.1");
        assert_eq!(config.relay.chunk_size, 4096);
        assert!(config.relay.request_timeout.is_none());
        assert_eq!(config.overlay.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [server]
            port = 8080
            allow_lan_access = true

            [relay]
            request_timeout = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.bind_address(), "0.0.0.0");
        assert_eq!(config.relay.request_timeout, Some(30));
        assert_eq!(config.relay.chunk_size, 4096);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = parse_config("[relay]\nchunk_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config(Some(PathBuf::from("/nonexistent/overlay.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[overlay]\nstatic_dir = \"/srv/overlay\"\n").unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.overlay.static_dir, PathBuf::from("/srv/overlay"));
    }

    #[test]
    fn relative_static_dir_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.toml");
        std::fs::write(&path, "[overlay]\nstatic_dir = \"assets\"\n").unwrap();

        let (config, source) = load_config_with_source(Some(path.clone())).unwrap();
        assert_eq!(config.overlay.static_dir, dir.path().join("assets"));
        assert_eq!(source, Some(path));
    }

    #[test]
    fn default_static_dir_also_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.overlay.static_dir, dir.path().join("static"));
    }

    #[test]
    fn absolute_static_dir_is_kept() {
        let absolute = std::env::temp_dir().join("overlay-assets");
        assert_eq!(resolve_static_dir(&absolute, Path::new("/etc")), absolute);
        assert_eq!(
            resolve_static_dir(Path::new("static"), Path::new("/opt/overlay")),
            PathBuf::from("/opt/overlay/static")
        );
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_path(Path::new("~/overlay"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("overlay"));
        }
        assert_eq!(expand_path(Path::new("static")), PathBuf::from("static"));
    }
}
