//! Scripted in-memory gateway for exercising the orchestrator without a network.

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::network_client::{ApiRequest, ApiResponse, Connector, Gateway, NetworkError};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub url: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<ApiResponse>>,
    fallback: HashMap<String, ApiResponse>,
    calls: Vec<Call>,
    ip: Option<String>,
}

/// Replays queued responses per URL, then the URL's fallback, then a 404. Clones share
/// the same script and call log.
#[derive(Clone, Default)]
pub struct MockGateway {
    script: Arc<Mutex<Script>>,
}

fn response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(StatusCode::from_u16(status).unwrap(), body)
}

impl MockGateway {
    pub fn new() -> Self {
        let gateway = MockGateway::default();
        gateway.script.lock().unwrap().ip = Some("203.0.113.7".to_string());
        gateway
    }

    /// A gateway whose proxy never answers the IP check.
    pub fn unreachable() -> Self {
        MockGateway::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: Value) -> &Self {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(url.to_string())
            .or_default()
            .push_back(response(status, body));
        self
    }

    pub fn always(&self, url: &str, status: u16, body: Value) -> &Self {
        self.script.lock().unwrap().fallback.insert(url.to_string(), response(status, body));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    pub fn count(&self, method: &Method, url: &str) -> usize {
        self.calls().iter().filter(|c| &c.method == method && c.url == url).count()
    }
}

impl Gateway for MockGateway {
    async fn send(&self, request: ApiRequest, token: Option<&str>) -> Result<ApiResponse, NetworkError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call {
            method: request.method.clone(),
            url: request.url.clone(),
            token: token.map(str::to_string),
            body: request.body.clone(),
        });
        if let Some(next) = script.queued.get_mut(&request.url).and_then(VecDeque::pop_front) {
            return Ok(next);
        }
        Ok(script
            .fallback
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| response(404, json!({"message": "not scripted"}))))
    }

    async fn public_ip(&self) -> Result<String, NetworkError> {
        self.script.lock().unwrap().ip.clone().ok_or_else(|| NetworkError::ApiError {
            status: StatusCode::BAD_GATEWAY,
            message: "proxy did not answer".to_string(),
        })
    }
}

/// Hands out the gateway registered for each proxy URL.
#[derive(Clone, Default)]
pub struct MockConnector {
    gateways: HashMap<String, MockGateway>,
}

impl MockConnector {
    pub fn with(mut self, proxy: &str, gateway: MockGateway) -> Self {
        self.gateways.insert(proxy.to_string(), gateway);
        self
    }
}

impl Connector for MockConnector {
    type Gateway = MockGateway;

    fn connect(&self, proxy: &str) -> Result<MockGateway, NetworkError> {
        self.gateways
            .get(proxy)
            .cloned()
            .ok_or_else(|| NetworkError::InvalidProxy(proxy.to_string()))
    }
}
