use chrono::{Local, TimeZone, Utc};
use std::io::Write;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Wall-clock time in epoch milliseconds, the unit the service reports farming times in.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats an epoch-millisecond timestamp in local time as `dd/mm/YYYY HH:MM:SS`.
pub fn format_local_time(epoch_millis: i64) -> String {
    match Local.timestamp_millis_opt(epoch_millis).single() {
        Some(time) => time.format("%d/%m/%Y %H:%M:%S").to_string(),
        None => epoch_millis.to_string(),
    }
}

/// Formats a duration in milliseconds as `HH:MM:SS`. Negative values clamp to zero.
pub fn format_hms(millis: i64) -> String {
    let total = millis.max(0) / 1000;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Waits for `total`, rewriting a one-line countdown on stdout once per second.
pub async fn countdown(total: Duration) {
    let deadline = Instant::now() + total;
    let mut stdout = std::io::stdout();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        // Write errors are ignored.
        let _ = write!(stdout, "\r[*] Waiting {} seconds to continue...   ", remaining.as_secs());
        let _ = stdout.flush();
        sleep_until(deadline.min(Instant::now() + Duration::from_secs(1))).await;
    }
    let _ = writeln!(stdout);
}
