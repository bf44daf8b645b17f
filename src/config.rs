use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

/// Default cap on request bodies, which bounds upload size
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500_000_000;

/// Configuration for the imageshare server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Largest request body accepted, in bytes
    pub max_upload_bytes: usize,
    /// Directory served under `/assets`
    pub assets_dir: PathBuf,
    /// Directory for daily rotated log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_json: Option<bool>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "imageshare", about = "An image sharing web application")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[clap(long, env = "IMAGESHARE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "IMAGESHARE_PORT")]
    pub port: Option<u16>,

    /// Maximum request body size in bytes
    #[clap(long, env = "IMAGESHARE_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Directory holding the static assets
    #[clap(long, env = "IMAGESHARE_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Directory to write log files to
    #[clap(long, env = "IMAGESHARE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log as JSON
    #[clap(long, env = "IMAGESHARE_LOG_JSON")]
    pub log_json: Option<bool>,

    /// Debug mode
    #[clap(long, env = "IMAGESHARE_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            max_upload_bytes: update.max_upload_bytes.unwrap_or(self.max_upload_bytes),
            assets_dir: update.assets_dir.unwrap_or(self.assets_dir),
            log_dir: update.log_dir.or(self.log_dir),
            log_json: update.log_json.unwrap_or(self.log_json),
        }
    }

    /// The `host:port` pair to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("imageshare.db".to_string(), |path| {
        path.join("imageshare.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 3000,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        assets_dir: PathBuf::from("assets"),
        log_dir: None,
        log_json: false,
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        host: args.host.clone(),
        port: args.port,
        max_upload_bytes: args.max_upload_bytes,
        assets_dir: args.assets_dir.clone(),
        log_dir: args.log_dir.clone(),
        log_json: args.log_json,
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: &CliArgs) -> Config {
    let config_dir = match ProjectDirs::from("com", "imageshare", "imageshare") {
        Some(proj_dirs) => Some(PathBuf::from(proj_dirs.config_dir())),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    };

    let config_dir = config_dir.and_then(|path| {
        if !path.exists() {
            info!("Config path not found at {:?}, using defaults", path);
            None
        } else {
            Some(path)
        }
    });

    let base = base_config(config_dir.clone());
    let file_update = config_from_file(config_dir.map(|dir| dir.join("config.toml")))
        .unwrap_or_default();

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(file_update)
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, bind={}, max_upload_bytes={}, assets_dir={:?}",
        config.database_url,
        config.bind_address(),
        config.max_upload_bytes,
        config.assets_dir
    );

    config
}

#[cfg(test)]
mod tests;
