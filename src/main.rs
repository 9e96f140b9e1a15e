#[macro_use]
mod logging;
mod account;
mod config;
mod endpoints;
mod farming;
mod game;
mod models;
mod network_client;
mod rewards;
mod scheduler;
mod session;
mod state_reader;
mod utils;
#[cfg(test)]
mod test_support;

use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::network_client::HttpConnector;
use crate::scheduler::Scheduler;

// Custom Application Error Type
#[derive(Debug)]
enum AppError {
    Config(config::ConfigError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err)
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// File with one account credential per line.
    #[clap(long, default_value = config::DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// File with one proxy URL per line, matched to credentials by line.
    #[clap(long, default_value = config::DEFAULT_PROXY_FILE)]
    proxies: PathBuf,

    /// Reward points submitted when claiming a game session.
    #[clap(long, default_value_t = config::DEFAULT_GAME_POINTS)]
    game_points: u32,

    /// Seconds to wait between opening and claiming a game session.
    #[clap(long, default_value_t = config::DEFAULT_GAME_DURATION_SECS)]
    game_duration: u64,

    /// Seconds to wait between passes when no farming completion is pending.
    #[clap(long, default_value_t = config::DEFAULT_FALLBACK_WAIT_SECS)]
    fallback_wait: u64,

    /// Login attempts per account before it is skipped for the pass.
    #[clap(long, default_value_t = config::DEFAULT_LOGIN_ATTEMPTS)]
    login_attempts: u32,

    /// Re-read both input files before every pass.
    #[clap(long)]
    reload_inputs: bool,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Settings {
            data_file: args.data,
            proxy_file: args.proxies,
            game_points: args.game_points,
            game_duration: Duration::from_secs(args.game_duration),
            fallback_wait: Duration::from_secs(args.fallback_wait),
            login_attempts: args.login_attempts.max(1),
            reload_inputs: args.reload_inputs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    logging::init();

    let settings = Settings::from(args);
    let accounts = config::load_accounts(&settings)?;
    info!("Loaded {} accounts", accounts.len());

    let mut scheduler = Scheduler::new(HttpConnector, settings, accounts);
    scheduler.run_forever().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn every_flag_has_help_text() {
        let command = Args::command();
        for arg in command.get_arguments() {
            if matches!(arg.get_id().as_str(), "help" | "version") {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{} has no help text", arg.get_id());
        }
    }

    #[test]
    fn defaults_match_settings_defaults() {
        let settings = Settings::from(Args::parse_from(["blum-farmer"]));
        let defaults = Settings::default();
        assert_eq!(settings.game_points, defaults.game_points);
        assert_eq!(settings.login_attempts, defaults.login_attempts);
        assert_eq!(settings.fallback_wait, defaults.fallback_wait);
        assert_eq!(settings.data_file, defaults.data_file);
    }
}
