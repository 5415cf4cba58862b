use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::RelayError;

pub const WARNING_COLOR: u32 = 0xFFFF00;
pub const CRITICAL_COLOR: u32 = 0xFF0000;

/// The notification channels a request can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Warning,
    Critical,
}

impl Channel {
    pub fn from_selector(selector: &str) -> Option<Channel> {
        match selector {
            "warning" => Some(Channel::Warning),
            "critical" => Some(Channel::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Warning => "warning",
            Channel::Critical => "critical",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Channel::Warning => WARNING_COLOR,
            Channel::Critical => CRITICAL_COLOR,
        }
    }
}

/// Channel selector token: the request path without surrounding slashes.
pub fn selector_from_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// One inbound invocation, independent of the server that received it.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RelayRequest {
    pub fn new(path: impl Into<String>, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        RelayRequest {
            path: path.into(),
            headers,
            body: body.into(),
        }
    }
}

/// Path parsing state attached to failure responses when debug mode is on.
/// Never carries the configured secret or destination URLs.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub path: String,
    pub selector: String,
    pub channel: Option<&'static str>,
    pub destination_configured: bool,
    pub api_key_configured: bool,
    pub api_key_provided: bool,
    pub auto_colors: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayResponse {
    pub fn success(channel: Channel) -> Self {
        RelayResponse {
            status: StatusCode::OK,
            body: json!({
                "message": format!("Webhook successfully sent ({})", channel.as_str()),
                "level": channel.as_str(),
            }),
        }
    }

    pub fn failure(err: &RelayError, debug: Option<&DebugInfo>) -> Self {
        let mut body = json!({ "error": err.to_string() });
        if let RelayError::Upstream { details, .. } = err {
            body["details"] = details.clone();
        }
        if let Some(debug) = debug.and_then(|debug| serde_json::to_value(debug).ok()) {
            body["debug"] = debug;
        }

        RelayResponse {
            status: err.status(),
            body,
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response<Body> {
        (self.status, Json(self.body)).into_response()
    }
}
