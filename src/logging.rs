use colored::Colorize;
use env_logger::Env;
use log::Level;
use std::io::Write;

/// Log target for status lines that report a completed action.
pub const SUCCESS_TARGET: &str = "blum_farmer::success";

/// `info!` record rendered as a success line on the console.
macro_rules! success {
    ($($arg:tt)+) => {
        log::info!(target: $crate::logging::SUCCESS_TARGET, $($arg)+)
    };
}

/// Installs the console logger. Defaults to `info`, `RUST_LOG` overrides it.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let text = record.args().to_string();
            let line = match record.level() {
                Level::Error => format!("[!] {}", text).red(),
                Level::Warn => format!("[*] {}", text).yellow(),
                Level::Info if record.target() == SUCCESS_TARGET => format!("[*] {}", text).green(),
                Level::Info => format!("[*] {}", text).blue(),
                Level::Debug | Level::Trace => format!("[{}] {}", record.level(), text).dimmed(),
            };
            writeln!(buf, "{}", line)
        })
        .init();
}
