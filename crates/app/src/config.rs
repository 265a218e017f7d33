use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use codehouse_infra::store::DEFAULT_POSTS_DIR;
use thiserror::Error;

use crate::cli::Cli;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub posts_dir: PathBuf,
    pub static_dir: PathBuf,
    pub post_locks: LockMode,
    pub edit_applies_media: bool,
    pub cors_allow_origins: Vec<String>,
}

/// How mutations on the same post are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LockMode {
    /// One lock per post id.
    Keyed,
    /// No locking; concurrent writers to one post may lose updates.
    #[value(name = "none")]
    Disabled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid socket address: {0}")]
    InvalidSocket(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            posts_dir: PathBuf::from(DEFAULT_POSTS_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            post_locks: LockMode::Keyed,
            edit_applies_media: false,
            cors_allow_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr_raw = read_string("CODEHOUSE_HTTP_ADDR", DEFAULT_HTTP_ADDR);
        let http_addr = http_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocket(http_addr_raw.clone()))?;
        let posts_dir = PathBuf::from(read_string("CODEHOUSE_POSTS_DIR", DEFAULT_POSTS_DIR));
        if posts_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "CODEHOUSE_POSTS_DIR",
                String::new(),
            ));
        }
        let static_dir = PathBuf::from(read_string("CODEHOUSE_STATIC_DIR", DEFAULT_STATIC_DIR));
        let post_locks = read_lock_mode("CODEHOUSE_POST_LOCKS")?;
        let edit_applies_media = read_bool("CODEHOUSE_EDIT_APPLIES_MEDIA", false)?;
        let cors_allow_origins = read_list("CODEHOUSE_CORS_ALLOW_ORIGINS");

        Ok(Self {
            http_addr,
            posts_dir,
            static_dir,
            post_locks,
            edit_applies_media,
            cors_allow_origins,
        })
    }

    /// Command line flags win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(addr) = cli.http_addr {
            self.http_addr = addr;
        }
        if let Some(dir) = cli.posts_dir.as_ref() {
            self.posts_dir = dir.clone();
        }
        if let Some(mode) = cli.post_locks {
            self.post_locks = mode;
        }
    }
}

impl LockMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LockMode::Keyed => "keyed",
            LockMode::Disabled => "none",
        }
    }
}

pub fn load_dotenv() -> Result<(), std::io::Error> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
        if std::env::var_os(&key).is_none() {
            // Safety: invoked during startup before any threads are spawned.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    parse_bool(&raw).ok_or(ConfigError::InvalidValue(key, raw))
}

fn read_lock_mode(key: &'static str) -> Result<LockMode, ConfigError> {
    let raw = read_string(key, "keyed");
    LockMode::from_str(raw.trim(), true).map_err(|_| ConfigError::InvalidValue(key, raw))
}

fn read_list(key: &'static str) -> Vec<String> {
    std::env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let value = ['"', '\'']
        .iter()
        .find_map(|quote| value.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(value);
    Some((key.to_string(), value.to_string()))
}
