//! Payload building: turn call fields into a bodiless GET or a multipart form.
//!
//! At most one attachment is uploaded per call. Fields are scanned in
//! [`ATTACHMENT_FIELDS`] order and only the first non-null one goes through
//! [`resolve_attachment`]; any later attachment-eligible field is encoded
//! like an ordinary value.

use crate::error::{BotError, BotResult};
use crate::types::Params;
use serde_json::Value;
use std::path::PathBuf;

/// Attachment-eligible fields, highest priority first.
pub const ATTACHMENT_FIELDS: [&str; 5] = ["photo", "sticker", "audio", "document", "video"];

/// Value of a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    /// Absolute path of a local file to upload.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

/// Request body for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No fields: the call is a bodiless GET.
    Empty,
    /// Multipart POST fields.
    Form(Vec<FormField>),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    pub fn fields(&self) -> &[FormField] {
        match self {
            Payload::Empty => &[],
            Payload::Form(fields) => fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields()
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}

/// Build the request payload for `fields`.
pub fn build_payload(fields: &Params) -> BotResult<Payload> {
    if fields.is_empty() {
        return Ok(Payload::Empty);
    }

    let attachment = ATTACHMENT_FIELDS
        .iter()
        .copied()
        .find(|name| fields.get(*name).map_or(false, |v| !v.is_null()));

    let mut form = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let value = if Some(name.as_str()) == attachment {
            resolve_attachment(value)?
        } else {
            match encode_value(value) {
                Some(text) => FormValue::Text(text),
                None => continue,
            }
        };
        form.push(FormField {
            name: name.clone(),
            value,
        });
    }
    Ok(Payload::Form(form))
}

/// Resolve an attachment value to something uploadable.
///
/// A mapping with a `file_id` references a file already stored on Telegram's
/// side and is sent as that id. Anything else must name an existing local
/// file.
pub fn resolve_attachment(value: &Value) -> BotResult<FormValue> {
    if let Some(file_id) = value.get("file_id") {
        return encode_value(file_id)
            .map(FormValue::Text)
            .ok_or_else(|| BotError::InvalidPath("attachment has a null file_id".into()));
    }

    let path = match value {
        Value::String(p) => p,
        other => {
            return Err(BotError::InvalidPath(format!(
                "expected a file path or {{\"file_id\": ...}}, got {}",
                other
            )))
        }
    };

    let absolute = std::fs::canonicalize(path)
        .map_err(|e| BotError::InvalidPath(format!("{}: {}", path, e)))?;
    if !absolute.is_file() {
        return Err(BotError::InvalidPath(format!(
            "{} is not a regular file",
            absolute.display()
        )));
    }
    Ok(FormValue::File(absolute))
}

/// Merge `fields` over `defaults`; caller values win on key collision.
pub fn merge_defaults(defaults: &Params, fields: Params) -> Params {
    let mut merged = defaults.clone();
    merged.extend(fields);
    merged
}

/// Encode a field value as form text. `None` means the field is omitted.
pub fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}
