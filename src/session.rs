use log::{debug, error, warn};
use serde_json::json;

use crate::account::AccountContext;
use crate::endpoints;
use crate::models::TokenResponse;
use crate::network_client::{ApiRequest, Gateway};

/// Exchanges the account credential for a bearer token, trying at most `attempts` times
/// with no delay between tries. Returns `None` once every attempt has failed.
pub async fn acquire_token<G: Gateway>(gateway: &G, credential: &str, attempts: u32) -> Option<String> {
    for attempt in 1..=attempts {
        let request = ApiRequest::post(endpoints::AUTH_URL).with_body(json!({ "query": credential }));
        match gateway.send(request, None).await {
            Ok(response) if response.status == reqwest::StatusCode::OK => match response.parse::<TokenResponse>() {
                Ok(parsed) => {
                    success!("Logged in successfully");
                    return Some(parsed.token.refresh);
                }
                Err(e) => {
                    warn!("Login response had no token, retry {}: {}", attempt, e);
                }
            },
            Ok(response) => {
                debug!("Login response body: {}", response.body);
                warn!("Failed to get token, retry {}: {}", attempt, response.describe());
            }
            Err(e) => {
                error!("Failed to get token, retry {}: {}", attempt, e);
            }
        }
    }
    error!("Failed to get token after {} attempts.", attempts);
    None
}

/// Acquires a token and binds it to the account. Returns whether the account now holds a
/// usable token.
pub async fn authenticate<G: Gateway>(ctx: &mut AccountContext<G>, attempts: u32) -> bool {
    match acquire_token(ctx.gateway(), ctx.credential(), attempts).await {
        Some(token) => {
            ctx.bind_token(token);
            true
        }
        None => false,
    }
}
