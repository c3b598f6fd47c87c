//! # tgbot – Telegram Bot API request gateway
//!
//! Thin, complete binding for the Telegram Bot HTTP API. Every method goes
//! through one generic call path; the method catalog is data.
//!
//! ## Features
//!
//! - **Endpoint resolution** – `{base}/bot{token}/{method}`, unknown methods
//!   passed through for forward compatibility
//! - **Payloads** – bodiless GET for empty calls, multipart POST otherwise,
//!   one attachment upload per call (`photo`, `sticker`, `audio`,
//!   `document`, `video` in that priority) or a `file_id` reference
//! - **Message defaults** – notification, parse mode and link preview
//!   defaults merged under caller options, HTML text sanitized to an
//!   allow-list
//! - **Transport** – proxy, lenient TLS, user agent, timeouts, raw
//!   overrides, and a fire-and-forget async mode
//! - **Trace log** – debug-gated append-only `telegram.log`
//! - **Webhooks & updates** – body decoding and polling offsets
//!
//! ```no_run
//! use serde_json::json;
//! use tgbot::{params, ChatId, Method, TelegramBot};
//!
//! # async fn demo() -> tgbot::BotResult<()> {
//! let mut bot = TelegramBot::new("123456:ABC-DEF", Some(ChatId::from(-100200300)))?;
//! bot.set_debug(true).set_log_dir("/var/log/bot");
//!
//! let sent = bot.send_message("<b>Deploy</b> finished", None, params(json!({}))).await?;
//! if !sent.is_ok() {
//!     eprintln!("rejected: {:?}", sent.description());
//! }
//!
//! bot.invoke(Method::GetChat, &[], params(json!({"chat_id": "@ops"}))).await?;
//! # Ok(())
//! # }
//! ```

pub mod types;
pub mod error;
pub mod sanitize;
pub mod payload;
pub mod transport;
pub mod trace;
pub mod catalog;
pub mod client;
pub mod webhook;

pub use catalog::{Method, MethodSpec, Shape, CATALOG};
pub use client::{SharedBot, TelegramBot};
pub use error::{BotError, BotResult};
pub use types::*;
