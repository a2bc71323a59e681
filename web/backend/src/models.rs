use axum::http::{HeaderMap, Method, header};
use serde::Serialize;
use std::net::SocketAddr;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Per-request facts handed to the page handlers and the error log.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub path: String,
    pub method: Method,
    pub user_agent: Option<String>,
    pub client_ip: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, path: &str, headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // first hop of X-Forwarded-For, then the socket peer
        let client_ip = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .or_else(|| peer.map(|addr| addr.ip().to_string()));

        Self {
            path: path.to_string(),
            method,
            user_agent,
            client_ip,
        }
    }
}
