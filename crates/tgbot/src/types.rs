//! Shared types for the gateway crate.
//!
//! Covers bot configuration, transport overrides, chat identifiers, the
//! Bot API response envelope, and call results.

use crate::error::{BotError, BotResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;

/// Field mapping sent with a call: name → scalar, file reference, or nested value.
pub type Params = serde_json::Map<String, Value>;

/// Turn a JSON object into [`Params`].
///
/// `null` yields an empty map. Other non-object values carry no field names
/// and are dropped with a warning.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        Value::Null => Params::new(),
        other => {
            warn!("Ignoring non-object call parameters: {}", other);
            Params::new()
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Bot Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Configuration for a gateway instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Bot API token (from @BotFather).
    pub token: String,
    /// Chat used when a call leaves `chat_id` unset.
    #[serde(default)]
    pub default_chat_id: Option<ChatId>,
    /// API host, overridable for self-hosted Bot API servers.
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    /// Options merged under caller fields for message-shaped calls.
    #[serde(default = "default_options")]
    pub default_options: Params,
    /// Markup tags kept in outbound message text.
    #[serde(default = "default_allowed_tags")]
    pub allowed_tags: Vec<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional proxy URL (SOCKS5 or HTTP).
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Overall request timeout in seconds; unbounded when unset.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub transport_overrides: TransportOverrides,
    /// Fire-and-forget: fresh connection and a one second timeout.
    #[serde(default)]
    pub async_mode: bool,
    /// Enables the trace file.
    #[serde(default)]
    pub debug: bool,
    /// Directory holding `telegram.log`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_user_agent() -> String {
    "TGBotApp 1.0".to_string()
}
fn default_allowed_tags() -> Vec<String> {
    ["i", "b", "a", "code", "pre"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}
fn default_options() -> Params {
    params(json!({
        "disable_notification": false,
        "parse_mode": ParseMode::Html.as_str(),
        "disable_web_page_preview": false,
    }))
}

impl BotConfig {
    /// Config with the given token and every other field at its default.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_chat_id: None,
            api_base_url: default_api_base(),
            default_options: default_options(),
            allowed_tags: default_allowed_tags(),
            user_agent: default_user_agent(),
            proxy_url: None,
            timeout_seconds: None,
            transport_overrides: TransportOverrides::default(),
            async_mode: false,
            debug: false,
            log_dir: None,
        }
    }
}

/// Raw transport settings that take precedence over the regular config.
///
/// Only async mode outranks these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOverrides {
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub accept_invalid_certs: Option<bool>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub connect_timeout_seconds: Option<u64>,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Chat id / parse mode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Chat ID can be a numeric ID or a @username string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Numeric(i64),
    Username(String),
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatId::Numeric(id) => write!(f, "{}", id),
            ChatId::Username(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Numeric(id)
    }
}

impl From<&str> for ChatId {
    fn from(name: &str) -> Self {
        ChatId::Username(name.to_string())
    }
}

impl From<String> for ChatId {
    fn from(name: String) -> Self {
        ChatId::Username(name)
    }
}

impl From<ChatId> for Value {
    fn from(id: ChatId) -> Self {
        match id {
            ChatId::Numeric(n) => Value::from(n),
            ChatId::Username(s) => Value::String(s),
        }
    }
}

/// Message parse mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParseMode {
    #[serde(rename = "Markdown")]
    Markdown,
    #[serde(rename = "MarkdownV2")]
    MarkdownV2,
    #[serde(rename = "HTML")]
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
            ParseMode::MarkdownV2 => "MarkdownV2",
            ParseMode::Html => "HTML",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Bot API response wrappers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generic wrapper for Telegram Bot API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i32>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Additional response parameters (e.g. rate-limit info).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
    #[serde(default)]
    pub retry_after: Option<i64>,
}

/// Outcome of a gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// Decoded response body, success or error envelope alike.
    Completed(Value),
    /// Async mode gave up waiting; the request was sent but no body was read.
    Dispatched,
}

impl CallResult {
    pub fn body(&self) -> Option<&Value> {
        match self {
            CallResult::Completed(v) => Some(v),
            CallResult::Dispatched => None,
        }
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            CallResult::Completed(v) => Some(v),
            CallResult::Dispatched => None,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self, CallResult::Dispatched)
    }

    /// `true` when the remote envelope reports `"ok": true`.
    pub fn is_ok(&self) -> bool {
        self.body()
            .and_then(|b| b.get("ok"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn result(&self) -> Option<&Value> {
        self.body().and_then(|b| b.get("result"))
    }

    pub fn description(&self) -> Option<&str> {
        self.body()
            .and_then(|b| b.get("description"))
            .and_then(Value::as_str)
    }

    pub fn error_code(&self) -> Option<i64> {
        self.body()
            .and_then(|b| b.get("error_code"))
            .and_then(Value::as_i64)
    }

    pub fn retry_after(&self) -> Option<i64> {
        self.body()
            .and_then(|b| b.pointer("/parameters/retry_after"))
            .and_then(Value::as_i64)
    }

    /// Decode the body into a typed envelope.
    pub fn parse<T: DeserializeOwned>(&self) -> BotResult<ApiResponse<T>> {
        let body = self.body().ok_or_else(|| BotError::Decode {
            body: String::new(),
            message: "no response body (request was dispatched asynchronously)".into(),
        })?;
        serde_json::from_value(body.clone()).map_err(|e| BotError::Decode {
            body: body.to_string(),
            message: e.to_string(),
        })
    }
}
