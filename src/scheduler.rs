use colored::Colorize;
use log::{debug, error, info, warn};
use std::time::Duration;

use crate::account::AccountContext;
use crate::config::{self, Account, Settings};
use crate::farming::{self, FarmOutcome, FarmPhase};
use crate::game;
use crate::network_client::{Connector, Gateway, NetworkError};
use crate::rewards;
use crate::session;
use crate::state_reader;
use crate::utils;

/// Only this account's farming completion decides how long to wait between passes.
pub const HORIZON_ACCOUNT: usize = 0;

#[derive(Debug)]
pub enum AccountError {
    MissingProxy,
    Proxy { proxy: String, source: NetworkError },
    Auth,
    UserInfo,
}

impl std::fmt::Display for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountError::MissingProxy => write!(f, "No proxy configured for this account"),
            AccountError::Proxy { proxy, source } => write!(f, "Cannot use proxy {}: {}", proxy, source),
            AccountError::Auth => write!(f, "Could not get a token"),
            AccountError::UserInfo => write!(f, "Could not get user info"),
        }
    }
}

impl std::error::Error for AccountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccountError::Proxy { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Wait before the next pass: until the horizon if it is still ahead, otherwise `fallback`.
pub fn inter_pass_wait(horizon: Option<i64>, now_millis: i64, fallback: Duration) -> Duration {
    match horizon {
        Some(end_time) if end_time > now_millis => Duration::from_millis((end_time - now_millis) as u64),
        _ => fallback,
    }
}

/// Drives passes over every account, one account at a time, forever.
pub struct Scheduler<C> {
    connector: C,
    settings: Settings,
    accounts: Vec<Account>,
}

impl<C: Connector> Scheduler<C> {
    pub fn new(connector: C, settings: Settings, accounts: Vec<Account>) -> Self {
        Scheduler { connector, settings, accounts }
    }

    pub async fn run_forever(&mut self) {
        loop {
            self.pass_and_wait().await;
        }
    }

    /// One iteration of the outer loop: a full pass, the inter-pass wait, then the optional
    /// input reload. Returns the wait that was observed.
    pub async fn pass_and_wait(&mut self) -> Duration {
        let horizon = self.run_pass().await;
        let now = utils::now_millis();
        let wait = inter_pass_wait(horizon, now, self.settings.fallback_wait);
        if horizon.is_some_and(|end_time| end_time > now) {
            info!("Waiting for farming to complete before the next pass...");
        } else {
            info!("Waiting {} minutes before the next pass...", wait.as_secs() / 60);
        }
        utils::countdown(wait).await;

        if self.settings.reload_inputs {
            match config::load_accounts(&self.settings) {
                Ok(accounts) => self.accounts = accounts,
                Err(e) => error!("Could not reload accounts, keeping the previous list: {}", e),
            }
        }
        wait
    }

    /// Processes every account once. Returns the farming completion time of the horizon
    /// account, if it had farming running.
    pub async fn run_pass(&self) -> Option<i64> {
        let mut horizon = None;
        for (index, account) in self.accounts.iter().enumerate() {
            match self.process_account(index, account).await {
                Ok(end_time) if index == HORIZON_ACCOUNT => horizon = end_time,
                Ok(_) => {}
                Err(e) => error!("Skipping account {}: {}", index + 1, e),
            }
            println!();
        }
        horizon
    }

    async fn process_account(&self, index: usize, account: &Account) -> Result<Option<i64>, AccountError> {
        let proxy = account.proxy.as_deref().ok_or(AccountError::MissingProxy)?;
        let proxy_error = |source| AccountError::Proxy { proxy: proxy.to_string(), source };
        let gateway = self.connector.connect(proxy).map_err(proxy_error)?;
        let ip = gateway.public_ip().await.map_err(proxy_error)?;

        let mut ctx = AccountContext::new(index, account.credential.as_str(), proxy, gateway);
        debug!("Account {} routed through {}", index + 1, ctx.proxy());
        let attempts = self.settings.login_attempts;

        if !session::authenticate(&mut ctx, attempts).await {
            return Err(AccountError::Auth);
        }
        let user = state_reader::fetch_user(&mut ctx, attempts).await.ok_or(AccountError::UserInfo)?;

        println!(
            "========== Account {} | {} | ip: {} ==========",
            ctx.index() + 1,
            user.username.green(),
            ip
        );

        let balance = state_reader::fetch_balance(&mut ctx, attempts).await;
        let mut farming_end = None;
        match &balance {
            Some(snapshot) => {
                info!("Fetching account info....");
                success!("Balance: {}", snapshot.available_balance);
                success!("Play passes: {}", snapshot.play_passes);
                let now = utils::now_millis();
                let phase = FarmPhase::of(snapshot.farming.as_ref(), now);
                farming_end = phase.end_time();
                if let FarmOutcome::Restarted { claimed: false, started: true } = farming::advance(&ctx, phase, now).await {
                    warn!("Farming restarted without claiming the previous cycle");
                }
            }
            None => error!("Could not fetch balance"),
        }

        rewards::claim_daily_reward(&ctx).await;
        rewards::collect_friend_balance(&mut ctx, attempts).await;

        let passes = balance.as_ref().map_or(0, |snapshot| snapshot.play_passes);
        let games = game::run_games(&mut ctx, passes, self.settings.game_points, self.settings.game_duration).await;
        if games.played > 0 {
            info!("Games played: {}, rewards claimed: {}", games.played, games.claimed);
        }

        success!("Finished processing account {}", user.username);
        Ok(farming_end)
    }
}
