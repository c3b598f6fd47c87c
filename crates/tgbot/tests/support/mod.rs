#![allow(dead_code)]

//! In-process stand-in for the Bot API that records every request.
//!
//! Method names with special behaviour:
//! - `brokenJson` answers with an HTML body
//! - `failing` answers 400 with an error envelope
//! - `slow` answers after three seconds

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    File {
        file_name: Option<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub http_method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub fields: BTreeMap<String, Field>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(Field::Text(s)) => Some(s),
            _ => None,
        }
    }
}

type Log = Arc<Mutex<Vec<Recorded>>>;

pub struct MockApi {
    pub base_url: String,
    log: Log,
}

impl MockApi {
    pub async fn start() -> Self {
        let log: Log = Arc::default();
        let app = Router::new().fallback(record).with_state(log.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            log,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

/// Base URL of a port nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn record(
    State(log): State<Log>,
    http_method: Method,
    uri: Uri,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut fields = BTreeMap::new();
    if let Ok(mut form) = multipart {
        while let Some(field) = form.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap().to_vec();
            let value = if file_name.is_some() {
                Field::File {
                    file_name,
                    content_type,
                    data,
                }
            } else {
                Field::Text(String::from_utf8(data).unwrap())
            };
            fields.insert(name, value);
        }
    }

    let path = uri.path().to_string();
    let api_method = path.rsplit('/').next().unwrap_or_default().to_string();
    let headers = headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    log.lock().unwrap().push(Recorded {
        http_method: http_method.to_string(),
        path,
        headers,
        fields,
    });

    match api_method.as_str() {
        "brokenJson" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "failing" => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })),
        )
            .into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"ok": true, "result": true})).into_response()
        }
        _ => Json(json!({"ok": true, "result": {"method": api_method}})).into_response(),
    }
}
