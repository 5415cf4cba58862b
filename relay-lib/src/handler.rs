use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use reqwest::Client;
use serde_json::{Map, Value};
use validator::Validate;

use crate::auth;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::send::send_post_request;
use crate::structs::discord::DiscordWebhookBody;
use crate::structs::relay::{selector_from_path, Channel, DebugInfo, RelayRequest, RelayResponse};

/// Validates one inbound alert and forwards it to the Discord webhook of the
/// channel named by the request path.
pub struct RelayHandler {
    config: RelayConfig,
    client: Client,
}

impl RelayHandler {
    pub fn new(config: RelayConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: RelayConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Runs the whole pipeline. Every outcome, including a panic inside the
    /// pipeline, is turned into a response.
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        let debug = self.config.debug_mode.then(|| self.debug_info(&request));
        let result = catch_internal(self.relay(request)).await;
        respond(result, debug.as_ref())
    }

    async fn relay(&self, request: RelayRequest) -> Result<Channel, RelayError> {
        auth::check_api_key(self.config.api_key.as_deref(), &request.headers)?;

        let selector = selector_from_path(&request.path);
        let channel = Channel::from_selector(selector).ok_or(RelayError::InvalidDestination)?;
        let url = self.config.destination(channel).ok_or(RelayError::InvalidDestination)?;

        let mut payload = parse_body(&request.body)?;
        let embed = first_embed(&mut payload)?;

        if self.config.auto_colors {
            embed.insert("color".to_string(), Value::from(channel.color()));
        }

        if !has_content(embed) {
            return Err(RelayError::MissingContent);
        }

        let webhook: DiscordWebhookBody = serde_json::from_value(Value::Object(payload))
            .map_err(|e| RelayError::Validation(e.to_string()))?;
        webhook.validate()?;

        send_post_request(&self.client, url, &webhook).await?;

        Ok(channel)
    }

    fn debug_info(&self, request: &RelayRequest) -> DebugInfo {
        let selector = selector_from_path(&request.path);
        let channel = Channel::from_selector(selector);

        DebugInfo {
            path: request.path.clone(),
            selector: selector.to_string(),
            channel: channel.map(|channel| channel.as_str()),
            destination_configured: channel
                .and_then(|channel| self.config.destination(channel))
                .is_some(),
            api_key_configured: self.config.api_key.is_some(),
            api_key_provided: auth::api_key_provided(&request.headers),
            auto_colors: self.config.auto_colors,
        }
    }
}

// converts a panic inside the pipeline into an internal error
async fn catch_internal<F>(pipeline: F) -> Result<Channel, RelayError>
where
    F: Future<Output = Result<Channel, RelayError>>,
{
    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(RelayError::Internal(panic_message(panic))),
    }
}

fn respond(result: Result<Channel, RelayError>, debug: Option<&DebugInfo>) -> RelayResponse {
    match result {
        Ok(channel) => {
            tracing::info!(
                "[Forwarded] {} webhook sent to discord successfully",
                channel.as_str()
            );
            RelayResponse::success(channel)
        }
        Err(err) => {
            if err.is_client_error() {
                tracing::warn!("[Rejected] {}", err);
            } else {
                tracing::error!("[Failed] {}", err);
            }
            RelayResponse::failure(&err, debug)
        }
    }
}

// an empty body is treated as an empty object
fn parse_body(body: &[u8]) -> Result<Map<String, Value>, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RelayError::Validation("request body must be a JSON object".to_string())),
        Err(e) => Err(RelayError::Validation(format!("request body is not valid JSON: {}", e))),
    }
}

// makes sure there is a first embed to color and inspect, creating an empty one if needed
fn first_embed(payload: &mut Map<String, Value>) -> Result<&mut Map<String, Value>, RelayError> {
    let embeds = payload.entry("embeds").or_insert(Value::Null);
    if embeds.is_null() {
        *embeds = Value::Array(Vec::new());
    }

    let Value::Array(embeds) = embeds else {
        return Err(RelayError::Validation("embeds: expected a list of embed objects".to_string()));
    };
    if embeds.is_empty() {
        embeds.push(Value::Object(Map::new()));
    }

    match embeds.first_mut() {
        Some(Value::Object(embed)) => Ok(embed),
        _ => Err(RelayError::Validation("embeds[0]: expected an embed object".to_string())),
    }
}

fn has_content(embed: &Map<String, Value>) -> bool {
    ["title", "description", "fields"]
        .iter()
        .any(|key| embed.get(*key).is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected panic".to_string()
    }
}
