//! HTTP transport for Bot API calls.
//!
//! [`TransportSettings::resolve`] layers the effective client settings, from
//! lowest to highest precedence:
//!
//! 1. built-in defaults: peer certificate verification off, configured user
//!    agent, connection verbosity off, configured timeout;
//! 2. the configured proxy;
//! 3. [`TransportOverrides`](crate::types::TransportOverrides);
//! 4. async mode: no idle connection reuse and a one second timeout.
//!
//! Certificate verification stays off unless an override turns it back on.

use crate::error::{BotError, BotResult};
use crate::payload::{FormField, FormValue, Payload};
use crate::types::BotConfig;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart;
use std::sync::Mutex;
use std::time::Duration;

/// Timeout applied in async mode.
pub const ASYNC_TIMEOUT: Duration = Duration::from_secs(1);

/// Effective settings used to build the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub proxy_url: Option<String>,
    pub accept_invalid_certs: bool,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Extra default headers, sorted by name.
    pub headers: Vec<(String, String)>,
    /// Never keep idle connections for reuse.
    pub fresh_connection: bool,
    pub verbose: bool,
}

impl TransportSettings {
    pub fn resolve(config: &BotConfig) -> Self {
        let mut settings = Self {
            proxy_url: None,
            accept_invalid_certs: true,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout_seconds.map(Duration::from_secs),
            connect_timeout: None,
            headers: Vec::new(),
            fresh_connection: false,
            verbose: false,
        };

        if let Some(ref proxy) = config.proxy_url {
            settings.proxy_url = Some(proxy.clone());
        }

        let overrides = &config.transport_overrides;
        if let Some(ref proxy) = overrides.proxy_url {
            settings.proxy_url = Some(proxy.clone());
        }
        if let Some(accept) = overrides.accept_invalid_certs {
            settings.accept_invalid_certs = accept;
        }
        if let Some(ref ua) = overrides.user_agent {
            settings.user_agent = ua.clone();
        }
        if let Some(secs) = overrides.timeout_seconds {
            settings.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = overrides.connect_timeout_seconds {
            settings.connect_timeout = Some(Duration::from_secs(secs));
        }
        let mut headers: Vec<(String, String)> = overrides
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();
        settings.headers = headers;

        if config.async_mode {
            settings.fresh_connection = true;
            settings.timeout = Some(ASYNC_TIMEOUT);
        }

        settings
    }

    /// Build a `reqwest::Client` carrying these settings.
    pub fn build_client(&self) -> BotResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .connection_verbose(self.verbose);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(ref proxy_url) = self.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| BotError::Config(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if self.fresh_connection {
            builder = builder.pool_max_idle_per_host(0);
        }
        if !self.headers.is_empty() {
            let mut map = HeaderMap::new();
            for (name, value) in &self.headers {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| BotError::Config(format!("Invalid header name '{name}': {e}")))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| BotError::Config(format!("Invalid header value: {e}")))?;
                map.insert(name, value);
            }
            builder = builder.default_headers(map);
        }

        builder
            .build()
            .map_err(|e| BotError::Config(format!("HTTP client build error: {e}")))
    }
}

/// Keeps the last built client and rebuilds it only when settings change.
#[derive(Debug, Default)]
pub struct ClientCache {
    slot: Mutex<Option<(TransportSettings, reqwest::Client)>>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_for(&self, settings: &TransportSettings) -> BotResult<reqwest::Client> {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        if let Some((cached, client)) = slot.as_ref() {
            if cached == settings {
                return Ok(client.clone());
            }
        }
        debug!(
            "Building HTTP client (proxy={}, fresh={})",
            settings.proxy_url.is_some(),
            settings.fresh_connection
        );
        let client = settings.build_client()?;
        *slot = Some((settings.clone(), client.clone()));
        Ok(client)
    }

    /// Settings of the cached client, if any.
    pub fn cached_settings(&self) -> Option<TransportSettings> {
        let slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        slot.as_ref().map(|(s, _)| s.clone())
    }
}

/// Send the call and return the raw response body.
///
/// The body is returned whatever the HTTP status: Bot API error envelopes
/// arrive with 4xx/5xx codes and are still data for the caller.
pub async fn execute(client: &reqwest::Client, url: &str, payload: Payload) -> BotResult<String> {
    let request = match payload {
        Payload::Empty => client.get(url),
        Payload::Form(fields) => client.post(url).multipart(build_form(fields).await?),
    };

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    debug!("Bot API ← HTTP {} ({} bytes)", status, body.len());
    Ok(body)
}

/// Convert form fields into a multipart form, reading file parts from disk.
pub async fn build_form(fields: Vec<FormField>) -> BotResult<multipart::Form> {
    let mut form = multipart::Form::new();
    for field in fields {
        form = match field.value {
            FormValue::Text(text) => form.text(field.name, text),
            FormValue::File(path) => {
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|e| BotError::Io(format!("{}: {}", path.display(), e)))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| field.name.clone());
                let part = multipart::Part::bytes(data)
                    .file_name(file_name.clone())
                    .mime_str(guess_mime_type(&file_name))
                    .map_err(|e| BotError::Config(format!("Invalid MIME type: {e}")))?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

/// Guess MIME type from file extension.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tgs" => "application/x-tgsticker",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "txt" | "log" => "text/plain",
        "json" => "application/json",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}
