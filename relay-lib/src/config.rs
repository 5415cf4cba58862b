use std::fmt;

use crate::structs::relay::Channel;

/// Process-wide relay settings, read once at startup and never mutated.
#[derive(Clone, PartialEq)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub warning_webhook_url: Option<String>,
    pub critical_webhook_url: Option<String>,
    pub debug_mode: bool,
    pub auto_colors: bool,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        RelayConfig {
            api_key: get_optional("API_KEY"),
            warning_webhook_url: get_optional("DISCORD_WEBHOOK_URL_WARNING"),
            critical_webhook_url: get_optional("DISCORD_WEBHOOK_URL_CRITICAL"),
            debug_mode: get_flag("DEBUG_MODE", false),
            auto_colors: get_flag("AUTO_COLORS", true),
        }
    }

    pub fn destination(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Warning => self.warning_webhook_url.as_deref(),
            Channel::Critical => self.critical_webhook_url.as_deref(),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| if value.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("RelayConfig")
            .field("api_key", &redact(&self.api_key))
            .field("warning_webhook_url", &redact(&self.warning_webhook_url))
            .field("critical_webhook_url", &redact(&self.critical_webhook_url))
            .field("debug_mode", &self.debug_mode)
            .field("auto_colors", &self.auto_colors)
            .finish()
    }
}

// stored verbatim, only a blank value counts as unset
fn get_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            tracing::debug!("Found {}", name);
            Some(value)
        }
        _ => {
            tracing::debug!("No {} found", name);
            None
        }
    }
}

fn get_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => {
                tracing::warn!(
                    "{} is not a valid boolean ({:?}), using default {}",
                    name,
                    value,
                    default
                );
                default
            }
        },
        Err(_) => {
            tracing::debug!("No {} found, using default {}", name, default);
            default
        }
    }
}
