use log::{error, info};

use crate::account::AccountContext;
use crate::endpoints;
use crate::network_client::{ApiRequest, ApiResponse, Gateway, NetworkError};
use crate::state_reader;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FriendOutcome {
    Unavailable,
    NothingToClaim,
    Claimed { amount: f64, ok: bool },
}

/// Daily check-in. Acts like every other action: no token refresh on rejection.
pub async fn claim_daily_reward<G: Gateway>(ctx: &AccountContext<G>) -> bool {
    match post_daily_reward(ctx).await {
        Ok(response) if response.is_success() => {
            success!("Claimed daily reward!");
            true
        }
        Ok(response) => {
            error!("Already checked in today or check-in unavailable: {}", response.describe());
            false
        }
        Err(e) => {
            error!("Already checked in today or check-in unavailable: {}", e);
            false
        }
    }
}

async fn post_daily_reward<G: Gateway>(ctx: &AccountContext<G>) -> Result<ApiResponse, NetworkError> {
    let url = endpoints::daily_reward_url()?;
    ctx.send(ApiRequest::post(url.as_str())).await
}

/// Reads the referral balance and claims it when there is anything to claim.
pub async fn collect_friend_balance<G: Gateway>(ctx: &mut AccountContext<G>, login_attempts: u32) -> FriendOutcome {
    let Some(friends) = state_reader::fetch_friend_balance(ctx, login_attempts).await else {
        error!("Could not check friend balance!");
        return FriendOutcome::Unavailable;
    };
    info!("Friend balance: {}", friends.amount_for_claim);
    if friends.amount_for_claim <= 0.0 {
        info!("No friend balance to claim!");
        return FriendOutcome::NothingToClaim;
    }

    let ok = ctx
        .act(ApiRequest::post(endpoints::FRIENDS_CLAIM_URL), "claim friend balance")
        .await
        .is_some();
    if ok {
        success!("Claimed friend balance!");
    }
    FriendOutcome::Claimed { amount: friends.amount_for_claim, ok }
}
