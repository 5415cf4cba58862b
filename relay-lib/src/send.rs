use std::error::Error as _;

use reqwest::Client;
use serde_json::Value;

use crate::error::RelayError;
use crate::structs::discord::DiscordWebhookBody;

/// Posts the payload to the destination exactly once. A non-2xx reply is
/// surfaced with its status and body, a transport failure with its cause.
pub async fn send_post_request(
    client: &Client,
    url: &str,
    body: &DiscordWebhookBody,
) -> Result<(), RelayError> {
    tracing::debug!("Sending POST request with payload: {:?}", body);

    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| RelayError::Transport(error_chain(e)))?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let bytes = response.bytes().await.map_err(|e| RelayError::Transport(error_chain(e)))?;
    tracing::error!("Destination rejected POST request. Status: {}, payload: {:?}", status, body);

    Err(RelayError::Upstream {
        status,
        details: error_details(&bytes),
    })
}

fn error_details(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String("No error details".to_string());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// the destination url carries the webhook token, strip it before rendering
fn error_chain(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
