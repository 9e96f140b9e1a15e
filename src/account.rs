use log::error;
use serde_json::Value;

use crate::network_client::{ApiRequest, ApiResponse, Gateway, NetworkError};

/// Transient state for one account during one pass. Built fresh for every account and
/// dropped when the account is done, so nothing leaks into the next account.
pub struct AccountContext<G> {
    index: usize,
    credential: String,
    proxy: String,
    gateway: G,
    token: Option<String>,
    game_id: Option<String>,
}

impl<G: Gateway> AccountContext<G> {
    pub fn new(index: usize, credential: impl Into<String>, proxy: impl Into<String>, gateway: G) -> Self {
        AccountContext {
            index,
            credential: credential.into(),
            proxy: proxy.into(),
            gateway,
            token: None,
            game_id: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn proxy(&self) -> &str {
        &self.proxy
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn bind_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn open_game(&mut self, game_id: String) {
        self.game_id = Some(game_id);
    }

    /// Clears the open game session, handing back its id.
    pub fn take_game(&mut self) -> Option<String> {
        self.game_id.take()
    }

    /// Sends a request with this account's bearer token attached, if one is bound.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, NetworkError> {
        self.gateway.send(request, self.token()).await
    }

    /// Performs an action call. Any transport failure or non-success status is logged
    /// and reported as `None`; nothing local changes in that case.
    pub async fn act(&self, request: ApiRequest, what: &str) -> Option<Value> {
        match self.send(request).await {
            Ok(response) if response.is_success() => Some(response.body),
            Ok(response) => {
                error!("Could not {}: {}", what, response.describe());
                None
            }
            Err(e) => {
                error!("Could not {}: {}", what, e);
                None
            }
        }
    }
}
