use crate::{
    error::Error,
    request::{encode_form, RequestBody, RequestData},
    response::{is_json_content_type, media_type, HttpResponse},
    util,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Display};

pub const RECORD_CONTENT_TYPE: &str = "application/json";

/// How a body ended up in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CapturedBody {
    Empty,
    Json(Value),
    Text(String),
    /// Opaque payloads are summarised instead of copied.
    Binary { content_type: String, size: usize },
}

impl CapturedBody {
    /// Picks the capture strategy from the declared content type. A JSON body
    /// that fails to parse is returned as text alongside the parse error.
    pub fn from_bytes(content_type: Option<&str>, body: &[u8]) -> (Self, Option<serde_json::Error>) {
        if body.is_empty() {
            return (CapturedBody::Empty, None);
        }

        let content_type = content_type.unwrap_or_default();
        if is_json_content_type(content_type) {
            return match serde_json::from_slice(body) {
                Ok(value) => (CapturedBody::Json(value), None),
                Err(e) => (
                    CapturedBody::Text(String::from_utf8_lossy(body).into_owned()),
                    Some(e),
                ),
            };
        }

        if media_type(content_type).starts_with("text/") {
            return (
                CapturedBody::Text(String::from_utf8_lossy(body).into_owned()),
                None,
            );
        }

        (
            CapturedBody::Binary {
                content_type: content_type.into(),
                size: body.len(),
            },
            None,
        )
    }

    pub fn from_request_body(body: &RequestBody) -> Self {
        match body {
            RequestBody::Json(value) => CapturedBody::Json(value.clone()),
            RequestBody::Form(pairs) => CapturedBody::Text(encode_form(pairs)),
            RequestBody::Text(text) => CapturedBody::Text(text.clone()),
            RequestBody::Multipart(_) | RequestBody::Bytes(_) => CapturedBody::Binary {
                content_type: body.content_type(),
                size: body.encode().len(),
            },
        }
    }

    /// Text form used by baselines, JSON pretty-printed.
    pub fn render(&self) -> String {
        match self {
            CapturedBody::Empty => String::new(),
            CapturedBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            CapturedBody::Text(text) => text.clone(),
            CapturedBody::Binary { content_type, size } => {
                format!("<binary body: {} bytes of {}>", size, content_type)
            }
        }
    }
}

/// One observed request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallRecord {
    pub method: String,
    pub url: String,
    pub request_headers: BTreeMap<String, String>,
    pub request_body: Option<CapturedBody>,
    pub response_status: u16,
    pub response_headers: BTreeMap<String, String>,
    pub response_body: CapturedBody,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl ApiCallRecord {
    pub fn to_attachment(&self) -> Result<Attachment, Error> {
        Ok(Attachment {
            body: serde_json::to_string_pretty(self)?,
            content_type: RECORD_CONTENT_TYPE.into(),
        })
    }

    pub fn from_attachment(attachment: &Attachment) -> Result<Self, Error> {
        Ok(serde_json::from_str(&attachment.body)?)
    }
}

/// Request half of a record, taken before the request is handed on.
#[derive(Debug, Clone)]
pub(crate) struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<CapturedBody>,
}

impl RequestSnapshot {
    pub fn of(request: &RequestData) -> Self {
        Self {
            method: request.method.to_string(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.as_ref().map(CapturedBody::from_request_body),
        }
    }

    /// The response's URL is the resolved one, so it wins over the request's.
    pub fn complete(
        self,
        response: &HttpResponse,
        response_body: CapturedBody,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> ApiCallRecord {
        let url = if response.url().is_empty() {
            self.url
        } else {
            response.url().to_owned()
        };

        ApiCallRecord {
            method: self.method,
            url,
            request_headers: self.headers,
            request_body: self.body,
            response_status: response.status(),
            response_headers: util::extract_headers(response.headers()),
            response_body,
            duration_ms,
            timestamp,
        }
    }
}

/// Payload handed to a record sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub body: String,
    pub content_type: String,
}

impl Attachment {
    pub fn is_record(&self) -> bool {
        self.content_type == RECORD_CONTENT_TYPE
    }
}

pub(crate) fn attachment_name<M: Display, U: Display>(sequence: usize, method: M, url: U) -> String {
    format!("api-call-{:03} {} {}", sequence, method, url)
}
