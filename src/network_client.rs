use log::debug;
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, Error as ReqwestError, Method, Proxy, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

use crate::endpoints;

static BASE_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static(endpoints::WEB_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(endpoints::WEB_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Edg/125.0.0.0"));
    headers
});

/// Message the service puts in the body when a bearer token has expired or was revoked.
pub const TOKEN_INVALID_MESSAGE: &str = "Token is invalid";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

#[derive(Debug)]
pub enum NetworkError {
    Reqwest(ReqwestError),
    ApiError { status: StatusCode, message: String },
    UrlParseError(url::ParseError),
    SerdeJsonError(serde_json::Error),
    InvalidProxy(String),
}

impl From<ReqwestError> for NetworkError {
    fn from(err: ReqwestError) -> NetworkError {
        NetworkError::Reqwest(err)
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> NetworkError {
        NetworkError::UrlParseError(err)
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> NetworkError {
        NetworkError::SerdeJsonError(err)
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::Reqwest(e) => write!(f, "HTTP request error: {}", e),
            NetworkError::ApiError { status, message } => write!(f, "API error ({}): {}", status, message),
            NetworkError::UrlParseError(e) => write!(f, "URL parsing error: {}", e),
            NetworkError::SerdeJsonError(e) => write!(f, "JSON deserialization error: {}", e),
            NetworkError::InvalidProxy(detail) => write!(f, "Invalid proxy: {}", detail),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Reqwest(e) => Some(e),
            NetworkError::UrlParseError(e) => Some(e),
            NetworkError::SerdeJsonError(e) => Some(e),
            _ => None,
        }
    }
}

/// One call against the remote service. The bearer token is supplied separately by the
/// account that issues it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        ApiRequest { method: Method::GET, url: url.into(), body: None }
    }

    pub fn post(url: impl Into<String>) -> Self {
        ApiRequest { method: Method::POST, url: url.into(), body: None }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        ApiResponse { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn is_token_invalid(&self) -> bool {
        !self.is_success()
            && self
                .message()
                .is_some_and(|m| m.trim().eq_ignore_ascii_case(TOKEN_INVALID_MESSAGE))
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, NetworkError> {
        Ok(T::deserialize(&self.body)?)
    }

    /// Short human-readable reason for a failed call.
    pub fn describe(&self) -> String {
        match self.message() {
            Some(message) => format!("{} ({})", message, self.status),
            None if self.body.is_null() => self.status.to_string(),
            None => format!("{} ({})", self.body, self.status),
        }
    }
}

/// Transport seam used by every component that talks to the remote service. Implementations
/// never retry on their own.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    async fn send(&self, request: ApiRequest, token: Option<&str>) -> Result<ApiResponse, NetworkError>;

    /// Public address seen by the outside world through this gateway's proxy.
    async fn public_ip(&self) -> Result<String, NetworkError>;
}

/// Builds one gateway per account, bound to that account's proxy.
pub trait Connector {
    type Gateway: Gateway;

    fn connect(&self, proxy: &str) -> Result<Self::Gateway, NetworkError>;
}

pub struct HttpGateway {
    client: Client,
}

impl HttpGateway {
    pub fn through_proxy(proxy_url: &str) -> Result<Self, NetworkError> {
        let proxy = Proxy::all(proxy_url)
            .map_err(|e| NetworkError::InvalidProxy(format!("{}: {}", proxy_url, e)))?;
        let client = Client::builder()
            .default_headers(BASE_HEADERS.clone())
            .proxy(proxy)
            .build()?;
        Ok(HttpGateway { client })
    }
}

impl Gateway for HttpGateway {
    async fn send(&self, request: ApiRequest, token: Option<&str>) -> Result<ApiResponse, NetworkError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| NetworkError::ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: format!("Bearer token is not a valid header value: {}", e),
                })?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("[API] Sending {} to {}", request.method, request.url);
        let start_time = Instant::now();
        let response_result = builder.send().await;
        debug!("[TIMING] {} {} took {:.2?}", request.method, request.url, start_time.elapsed());

        let response = response_result?;
        let status = response.status();
        let response_text = response.text().await?;
        debug!("[API] {} response body ({}): {}", request.url, status, response_text);

        let body = if response_text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response_text).unwrap_or(Value::String(response_text))
        };
        Ok(ApiResponse::new(status, body))
    }

    async fn public_ip(&self) -> Result<String, NetworkError> {
        let start_time = Instant::now();
        let response_result = self.client.get(endpoints::IP_CHECK_URL).send().await;
        debug!("[TIMING] proxy IP check took {:.2?}", start_time.elapsed());

        let response = response_result?;
        if !response.status().is_success() {
            return Err(NetworkError::ApiError {
                status: response.status(),
                message: "Could not check the proxy IP".to_string(),
            });
        }
        let ip_json: IpResponse = serde_json::from_str(&response.text().await?)?;
        Ok(ip_json.ip)
    }
}

/// Connects real accounts through reqwest, one client per proxy.
pub struct HttpConnector;

impl Connector for HttpConnector {
    type Gateway = HttpGateway;

    fn connect(&self, proxy: &str) -> Result<HttpGateway, NetworkError> {
        HttpGateway::through_proxy(proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_invalid_needs_failure_status_and_message() {
        let expired = ApiResponse::new(StatusCode::UNAUTHORIZED, json!({"message": "Token is invalid"}));
        assert!(expired.is_token_invalid());

        let other = ApiResponse::new(StatusCode::UNAUTHORIZED, json!({"message": "Forbidden"}));
        assert!(!other.is_token_invalid());

        let ok = ApiResponse::new(StatusCode::OK, json!({"message": "Token is invalid"}));
        assert!(!ok.is_token_invalid());
    }

    #[test]
    fn url_parse_failure_converts_to_network_error() {
        let err = NetworkError::from(url::Url::parse("::no scheme").unwrap_err());
        assert!(matches!(err, NetworkError::UrlParseError(_)));
        assert!(err.to_string().starts_with("URL parsing error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn describe_prefers_message_over_raw_body() {
        let with_message = ApiResponse::new(StatusCode::BAD_REQUEST, json!({"message": "already started"}));
        assert_eq!(with_message.describe(), "already started (400 Bad Request)");

        let empty = ApiResponse::new(StatusCode::NOT_FOUND, Value::Null);
        assert_eq!(empty.describe(), "404 Not Found");
    }

    #[test]
    fn malformed_proxy_is_rejected() {
        assert!(matches!(
            HttpGateway::through_proxy("not a proxy url"),
            Err(NetworkError::InvalidProxy(_))
        ));
    }
}
