use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use lettre::message::Mailbox;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "entourage";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_FROM: &str = "Entourage <onboarding@resend.dev>";
pub const DEFAULT_OWNER: &str = "owner@entourage.dev";
pub const DEFAULT_SUBJECT: &str = "New Waitlist Signup - Entourage";
pub const DEFAULT_API_KEY_ENV: &str = "RESEND_API_KEY";
pub const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub api_key_env: String,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

impl NotificationsConfig {
    /// Reads the email API credential from the configured environment
    /// variable. Unset or blank means notifications are off.
    pub fn api_key(&self) -> Option<String> {
        let value = env::var(&self.api_key_env).ok()?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            },
            notifications: NotificationsConfig {
                enabled: true,
                from: DEFAULT_FROM.to_string(),
                to: DEFAULT_OWNER.to_string(),
                subject: DEFAULT_SUBJECT.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid server.bind value: {0}")]
    InvalidBind(String),
    #[error("invalid notifications.{field}: {message}")]
    InvalidNotificationsField {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    notifications: Option<NotificationsFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationsFile {
    enabled: Option<bool>,
    from: Option<String>,
    to: Option<String>,
    subject: Option<String>,
    api_key_env: Option<String>,
    api_base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(bind) = parsed.server.and_then(|server| server.bind) {
        config.server.bind = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
    }

    if let Some(file) = parsed.notifications {
        let notifications = &mut config.notifications;
        if let Some(enabled) = file.enabled {
            notifications.enabled = enabled;
        }
        if let Some(from) = file.from {
            notifications.from = parse_mailbox("from", &from)?;
        }
        if let Some(to) = file.to {
            notifications.to = parse_mailbox("to", &to)?;
        }
        if let Some(subject) = file.subject {
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(invalid_field("subject", "must not be empty"));
            }
            notifications.subject = subject.to_string();
        }
        if let Some(api_key_env) = file.api_key_env {
            let api_key_env = api_key_env.trim();
            if api_key_env.is_empty() {
                return Err(invalid_field("api_key_env", "must not be empty"));
            }
            notifications.api_key_env = api_key_env.to_string();
        }
        if let Some(base_url) = file.api_base_url {
            notifications.api_base_url = parse_base_url(&base_url)?;
        }
        if let Some(timeout) = file.timeout_seconds {
            if timeout == 0 {
                return Err(invalid_field("timeout_seconds", "must be greater than zero"));
            }
            notifications.timeout_seconds = timeout;
        }
    }

    Ok(config)
}

fn parse_mailbox(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    value
        .parse::<Mailbox>()
        .map_err(|_| invalid_field(field, "must be a valid email address"))?;
    Ok(value.to_string())
}

fn parse_base_url(value: &str) -> Result<String> {
    let url = Url::parse(value.trim())
        .map_err(|err| invalid_field("api_base_url", &err.to_string()))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(invalid_field("api_base_url", "must use http or https"));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn invalid_field(field: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidNotificationsField {
        field,
        message: message.to_string(),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
