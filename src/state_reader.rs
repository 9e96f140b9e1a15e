use log::{error, info, warn};
use serde::de::DeserializeOwned;

use crate::account::AccountContext;
use crate::endpoints;
use crate::models::{BalanceSnapshot, FriendBalance, UserInfo};
use crate::network_client::{ApiRequest, Gateway};
use crate::session;

pub async fn fetch_user<G: Gateway>(ctx: &mut AccountContext<G>, login_attempts: u32) -> Option<UserInfo> {
    read(ctx, endpoints::USER_ME_URL, "user info", login_attempts).await
}

pub async fn fetch_balance<G: Gateway>(ctx: &mut AccountContext<G>, login_attempts: u32) -> Option<BalanceSnapshot> {
    read(ctx, endpoints::BALANCE_URL, "balance", login_attempts).await
}

pub async fn fetch_friend_balance<G: Gateway>(ctx: &mut AccountContext<G>, login_attempts: u32) -> Option<FriendBalance> {
    read(ctx, endpoints::FRIENDS_BALANCE_URL, "friend balance", login_attempts).await
}

/// GETs `url` and decodes the body. A token-invalid response triggers one re-authentication
/// and one repeat of the same read; a second rejection is reported as a failed read.
async fn read<G, T>(ctx: &mut AccountContext<G>, url: &str, what: &str, login_attempts: u32) -> Option<T>
where
    G: Gateway,
    T: DeserializeOwned,
{
    let mut reauthenticated = false;
    loop {
        let response = match ctx.send(ApiRequest::get(url)).await {
            Ok(response) => response,
            Err(e) => {
                error!("Could not fetch {}: {}", what, e);
                return None;
            }
        };

        if response.is_success() {
            return match response.parse::<T>() {
                Ok(value) => Some(value),
                Err(e) => {
                    error!("Could not read {} response: {}", what, e);
                    None
                }
            };
        }

        if !response.is_token_invalid() {
            error!("Could not fetch {}: {}", what, response.describe());
            return None;
        }
        if reauthenticated {
            error!("Could not fetch {}: token rejected again after re-authentication", what);
            return None;
        }

        warn!("Token is invalid, fetching a new one...");
        if !session::authenticate(ctx, login_attempts).await {
            error!("Failed to get a new token.");
            return None;
        }
        info!("Got a new token, retrying {}...", what);
        reauthenticated = true;
    }
}
