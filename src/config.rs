use log::warn;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_DATA_FILE: &str = "data.txt";
pub const DEFAULT_PROXY_FILE: &str = "proxy.txt";
pub const DEFAULT_GAME_POINTS: u32 = 2000;
pub const DEFAULT_GAME_DURATION_SECS: u64 = 30;
pub const DEFAULT_FALLBACK_WAIT_SECS: u64 = 600;
pub const DEFAULT_LOGIN_ATTEMPTS: u32 = 3;

/// Runtime knobs shared by every part of the orchestrator.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_file: PathBuf,
    pub proxy_file: PathBuf,
    pub game_points: u32,
    pub game_duration: Duration,
    pub fallback_wait: Duration,
    pub login_attempts: u32,
    pub reload_inputs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            proxy_file: PathBuf::from(DEFAULT_PROXY_FILE),
            game_points: DEFAULT_GAME_POINTS,
            game_duration: Duration::from_secs(DEFAULT_GAME_DURATION_SECS),
            fallback_wait: Duration::from_secs(DEFAULT_FALLBACK_WAIT_SECS),
            login_attempts: DEFAULT_LOGIN_ATTEMPTS,
            reload_inputs: false,
        }
    }
}

/// One line of the credential file paired with the proxy on the same line index.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub credential: String,
    pub proxy: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Empty(PathBuf),
    InvalidProxy { line: usize, source: url::ParseError },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "Cannot read {}: {}", path.display(), source),
            ConfigError::Empty(path) => write!(f, "{} contains no entries", path.display()),
            ConfigError::InvalidProxy { line, source } => write!(f, "Invalid proxy on line {}: {}", line, source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::InvalidProxy { source, .. } => Some(source),
            ConfigError::Empty(_) => None,
        }
    }
}

/// Splits newline-delimited input, dropping carriage returns and blank lines.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lines = parse_lines(&content);
    if lines.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    Ok(lines)
}

/// Pairs credentials with proxies by position. Every proxy must be a valid URL.
pub fn pair_accounts(credentials: Vec<String>, proxies: Vec<String>) -> Result<Vec<Account>, ConfigError> {
    for (index, proxy) in proxies.iter().enumerate() {
        Url::parse(proxy).map_err(|source| ConfigError::InvalidProxy { line: index + 1, source })?;
    }
    if credentials.len() != proxies.len() {
        warn!(
            "{} credentials but {} proxies; accounts are matched to proxies by line",
            credentials.len(),
            proxies.len()
        );
    }

    let mut proxies = proxies.into_iter();
    Ok(credentials
        .into_iter()
        .map(|credential| Account { credential, proxy: proxies.next() })
        .collect())
}

pub fn load_accounts(settings: &Settings) -> Result<Vec<Account>, ConfigError> {
    let credentials = read_lines(&settings.data_file)?;
    let proxies = read_lines(&settings.proxy_file)?;
    pair_accounts(credentials, proxies)
}
