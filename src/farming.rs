use log::info;
use serde_json::json;

use crate::account::AccountContext;
use crate::endpoints;
use crate::models::FarmingStatus;
use crate::network_client::{ApiRequest, Gateway};
use crate::utils;

/// Farming state of one account, derived once from a balance read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmPhase {
    /// No cycle running.
    Idle,
    /// Cycle running, matures at `end_time`.
    Active { end_time: i64 },
    /// Cycle matured, reward claimable.
    Ready { end_time: i64 },
}

impl FarmPhase {
    pub fn of(farming: Option<&FarmingStatus>, now_millis: i64) -> Self {
        match farming {
            None => FarmPhase::Idle,
            Some(status) if now_millis < status.end_time => FarmPhase::Active { end_time: status.end_time },
            Some(status) => FarmPhase::Ready { end_time: status.end_time },
        }
    }

    pub fn end_time(&self) -> Option<i64> {
        match self {
            FarmPhase::Idle => None,
            FarmPhase::Active { end_time } | FarmPhase::Ready { end_time } => Some(*end_time),
        }
    }
}

/// What the controller did for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmOutcome {
    Started { ok: bool },
    Waiting { remaining_millis: i64 },
    Restarted { claimed: bool, started: bool },
}

/// Acts on the account's farming phase: start when idle, wait while active, claim and
/// immediately restart once matured. A failed claim does not prevent the restart.
pub async fn advance<G: Gateway>(ctx: &AccountContext<G>, phase: FarmPhase, now_millis: i64) -> FarmOutcome {
    if let Some(end_time) = phase.end_time() {
        info!("Farming completes at: {}", utils::format_local_time(end_time));
    }

    match phase {
        FarmPhase::Idle => FarmOutcome::Started { ok: start_farming(ctx).await },
        FarmPhase::Active { end_time } => {
            let remaining_millis = end_time - now_millis;
            info!("Farming time remaining: {}", utils::format_hms(remaining_millis));
            FarmOutcome::Waiting { remaining_millis }
        }
        FarmPhase::Ready { .. } => {
            let claimed = claim_farming(ctx).await;
            let started = start_farming(ctx).await;
            FarmOutcome::Restarted { claimed, started }
        }
    }
}

pub async fn start_farming<G: Gateway>(ctx: &AccountContext<G>) -> bool {
    let request = ApiRequest::post(endpoints::FARMING_START_URL).with_body(json!({ "action": "start_farming" }));
    let ok = ctx.act(request, "start farming").await.is_some();
    if ok {
        success!("Started farming!");
    }
    ok
}

pub async fn claim_farming<G: Gateway>(ctx: &AccountContext<G>) -> bool {
    let ok = ctx
        .act(ApiRequest::post(endpoints::FARMING_CLAIM_URL), "claim farming reward")
        .await
        .is_some();
    if ok {
        success!("Claimed farming reward!");
    }
    ok
}
