use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

/// Outbound Discord webhook payload. Unknown fields are rejected at every
/// level and absent values are left out when serialized.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscordWebhookBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[validate(custom(function = "http_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    // missing means false, an explicit null stays unset
    #[serde(default = "default_false", skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "http_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<i64>,
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<EmbedField>>,
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default = "default_false", skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmbedFooter {
    pub text: String,
    #[validate(custom(function = "http_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmbedImage {
    #[validate(custom(function = "http_url"))]
    pub url: String,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmbedAuthor {
    pub name: String,
    #[validate(custom(function = "http_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[validate(custom(function = "http_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

fn default_false() -> Option<bool> {
    Some(false)
}

/// Absolute http(s) URL with a host.
fn http_url(value: &str) -> Result<(), ValidationError> {
    let invalid = || {
        let mut err = ValidationError::new("http_url");
        err.message = Some("must be an http or https URL with a host".into());
        err
    };

    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid());
    }

    Ok(())
}
