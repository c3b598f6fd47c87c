//! The request gateway: one generic call path for every Bot API method.
//!
//! A call resolves the endpoint URL, builds the payload (attachment upload
//! included), sends it with the configured transport settings, records a
//! trace line, and decodes the JSON body. Remote error envelopes come back
//! as data in [`CallResult::Completed`].

use crate::catalog::{Method, Shape};
use crate::error::{BotError, BotResult};
use crate::payload::{build_payload, merge_defaults};
use crate::sanitize::sanitize;
use crate::trace::{TraceLine, TraceLog};
use crate::transport::{self, ClientCache, TransportSettings};
use crate::types::*;
use log::{debug, warn};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Gateway shared between tasks: calls take the read lock, setters the write lock.
pub type SharedBot = Arc<RwLock<TelegramBot>>;

/// Telegram Bot API gateway.
#[derive(Debug)]
pub struct TelegramBot {
    config: BotConfig,
    clients: ClientCache,
}

impl TelegramBot {
    /// Create a gateway with default settings.
    pub fn new(token: impl Into<String>, default_chat_id: Option<ChatId>) -> BotResult<Self> {
        let mut config = BotConfig::new(token);
        config.default_chat_id = default_chat_id;
        Self::with_config(config)
    }

    /// Create a gateway from a full [`BotConfig`].
    pub fn with_config(mut config: BotConfig) -> BotResult<Self> {
        if config.token.is_empty() {
            return Err(BotError::Config("Bot token must not be empty".into()));
        }
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        Ok(Self {
            config,
            clients: ClientCache::new(),
        })
    }

    /// Wrap the gateway for sharing across tasks.
    pub fn shared(self) -> SharedBot {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn token(&self) -> &str {
        &self.config.token
    }

    /// Get the token (masked for logging).
    pub fn masked_token(&self) -> String {
        let token = &self.config.token;
        if token.len() > 10 && token.is_ascii() {
            format!("{}...{}", &token[..5], &token[token.len() - 4..])
        } else {
            "***".to_string()
        }
    }

    // ── Configuration ───────────────────────────────────────────────

    pub fn set_async(&mut self, enabled: bool) -> &mut Self {
        self.config.async_mode = enabled;
        self
    }

    pub fn set_debug(&mut self, enabled: bool) -> &mut Self {
        self.config.debug = enabled;
        self
    }

    pub fn set_log_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config.log_dir = Some(path.into());
        self
    }

    pub fn set_proxy(&mut self, proxy_url: Option<String>) -> &mut Self {
        self.config.proxy_url = proxy_url;
        self
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn set_timeout(&mut self, seconds: Option<u64>) -> &mut Self {
        self.config.timeout_seconds = seconds;
        self
    }

    pub fn set_api_base_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn set_default_chat_id(&mut self, chat_id: Option<ChatId>) -> &mut Self {
        self.config.default_chat_id = chat_id;
        self
    }

    /// Set (or with `Value::Null`, remove) a default option for message calls.
    pub fn set_default_option(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        let key = key.into();
        if value.is_null() {
            self.config.default_options.remove(&key);
        } else {
            self.config.default_options.insert(key, value);
        }
        self
    }

    pub fn set_allowed_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_transport_overrides(&mut self, overrides: TransportOverrides) -> &mut Self {
        self.config.transport_overrides = overrides;
        self
    }

    // ── Request path ────────────────────────────────────────────────

    /// Build the full URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_base_url, self.config.token, method)
    }

    /// Effective transport settings for the next call.
    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings::resolve(&self.config)
    }

    fn trace_log(&self) -> TraceLog<'_> {
        TraceLog::new(self.config.debug, self.config.log_dir.as_deref())
    }

    /// Call any Bot API method by name with the given fields.
    ///
    /// Names are not checked against the catalog.
    pub async fn call(&self, method: &str, fields: Params) -> BotResult<CallResult> {
        let url = self.method_url(method);
        let payload = build_payload(&fields)?;
        let client = self.clients.client_for(&self.transport_settings())?;

        debug!(
            "Bot API → {} ({} fields, token {})",
            method,
            payload.fields().len(),
            self.masked_token()
        );

        let body = match transport::execute(&client, &url, payload).await {
            Ok(body) => {
                self.trace_log().record(TraceLine::Response(&body));
                body
            }
            Err(e) if e.is_transport() => {
                self.trace_log().record(TraceLine::TransportError(&e.to_string()));
                if self.config.async_mode && matches!(e, BotError::Timeout(_)) {
                    debug!("Bot API {} dispatched without waiting for a response", method);
                    return Ok(CallResult::Dispatched);
                }
                warn!("Bot API {} failed: {}", method, e);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(CallResult::Completed(value)),
            Err(e) => {
                warn!("Bot API {} returned a non-JSON body: {}", method, e);
                Err(BotError::Decode {
                    body,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Assemble the fields for a catalog method.
    ///
    /// Positional `args` bind to the method's positional parameter names and
    /// take precedence over `options`. A missing or null `chat_id` falls back
    /// to the default chat. Message-shaped methods get the default options
    /// merged underneath and their `text` sanitized.
    pub fn assemble(&self, method: Method, args: &[Value], options: Params) -> BotResult<Params> {
        let positional = method.positional();
        if args.len() > positional.len() {
            return Err(BotError::InvalidParams(format!(
                "{} takes at most {} positional argument(s), got {}",
                method,
                positional.len(),
                args.len()
            )));
        }

        let mut fields = match method.shape() {
            Shape::Message => merge_defaults(&self.config.default_options, options),
            Shape::Plain => options,
        };

        for (i, name) in positional.iter().enumerate() {
            let mut value = args.get(i).cloned().unwrap_or(Value::Null);
            if *name == "chat_id" && value.is_null() {
                if let Some(ref chat) = self.config.default_chat_id {
                    value = chat.clone().into();
                }
            }
            if !value.is_null() {
                fields.insert(name.to_string(), value);
            }
        }

        if method.shape() == Shape::Message {
            if let Some(Value::String(text)) = fields.get("text") {
                let clean = sanitize(text, &self.config.allowed_tags);
                fields.insert("text".into(), Value::String(clean));
            }
        }

        Ok(fields)
    }

    /// Call a catalog method with positional arguments and an option map.
    pub async fn invoke(&self, method: Method, args: &[Value], options: Params) -> BotResult<CallResult> {
        let fields = self.assemble(method, args, options)?;
        self.call(method.name(), fields).await
    }

    // ── Convenience ─────────────────────────────────────────────────

    /// Get the bot's own user via getMe.
    pub async fn get_me(&self) -> BotResult<CallResult> {
        self.invoke(Method::GetMe, &[], Params::new()).await
    }

    /// Send a text message to `chat_id`, or to the default chat when `None`.
    pub async fn send_message(
        &self,
        text: &str,
        chat_id: Option<ChatId>,
        options: Params,
    ) -> BotResult<CallResult> {
        let chat = chat_id.map(Value::from).unwrap_or(Value::Null);
        self.invoke(Method::SendMessage, &[Value::from(text), chat], options)
            .await
    }

    /// Upload a local photo (or pass `{"file_id": ...}` via options) to a chat.
    pub async fn send_photo(
        &self,
        path: &str,
        chat_id: ChatId,
        options: Params,
    ) -> BotResult<CallResult> {
        self.invoke(
            Method::SendPhoto,
            &[Value::from(path), Value::from(chat_id)],
            options,
        )
        .await
    }
}
