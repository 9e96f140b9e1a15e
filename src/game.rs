use log::{error, info, warn};
use serde_json::json;
use std::time::Duration;

use crate::account::AccountContext;
use crate::endpoints;
use crate::models::GameSession;
use crate::network_client::{ApiRequest, Gateway};
use crate::utils;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameReport {
    pub played: u32,
    pub claimed: u32,
    pub stopped_early: bool,
}

/// Plays up to `passes` sessions one after another: play, wait out the session, claim.
/// The first failed play ends the loop; a failed claim does not.
pub async fn run_games<G: Gateway>(
    ctx: &mut AccountContext<G>,
    passes: u32,
    points: u32,
    session_length: Duration,
) -> GameReport {
    let mut report = GameReport::default();
    if passes == 0 {
        info!("No play passes");
        return report;
    }

    for round in 1..=passes {
        if play_game(ctx).await.is_none() {
            error!("Could not play game {}", round);
            report.stopped_early = true;
            break;
        }
        report.played += 1;
        success!("Started game {}...", round);

        utils::countdown(session_length).await;

        if claim_game(ctx, points).await {
            report.claimed += 1;
            success!("Claimed reward for game {}!", round);
        }
    }
    report
}

/// Opens a game session and binds its id to the account.
pub async fn play_game<G: Gateway>(ctx: &mut AccountContext<G>) -> Option<GameSession> {
    let request = ApiRequest::post(endpoints::GAME_PLAY_URL).with_body(json!({ "game": endpoints::GAME_NAME }));
    let body = ctx.act(request, "play game").await?;
    match serde_json::from_value::<GameSession>(body) {
        Ok(session) => {
            ctx.open_game(session.game_id.clone());
            Some(session)
        }
        Err(e) => {
            error!("Play response carried no game id: {}", e);
            None
        }
    }
}

/// Claims the open session with `points`. The session is consumed whatever the outcome;
/// without an open session nothing is sent.
pub async fn claim_game<G: Gateway>(ctx: &mut AccountContext<G>, points: u32) -> bool {
    let Some(game_id) = ctx.take_game() else {
        warn!("No current game id to claim.");
        return false;
    };
    let request = ApiRequest::post(endpoints::GAME_CLAIM_URL).with_body(json!({ "gameId": game_id, "points": points }));
    ctx.act(request, "claim game reward").await.is_some()
}
