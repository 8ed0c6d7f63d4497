use crate::{
    error::Error,
    schema::{self, Shape, ValidationResult},
};
use hyper::{body::Bytes, header, HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

const BODY_EXCERPT_LENGTH: usize = 300;

/// A response whose body has been fully buffered.
///
/// All body accessors borrow, so the body can be read any number of times
/// by any number of observers.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    pub fn new<S: Into<String>, B: Into<Bytes>>(
        url: S,
        status: StatusCode,
        headers: HeaderMap,
        body: B,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    pub fn text(&self) -> Result<String, Error> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::InvalidBody(e.to_string()))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn is_json(&self) -> bool {
        self.content_type().map(is_json_content_type).unwrap_or(false)
    }

    /// Validates the body against `shape`. JSON bodies are parsed, anything
    /// else (including an empty body) is validated as raw text.
    pub fn validate_body(&self, shape: &Shape) -> ValidationResult {
        if self.is_json() && !self.body.is_empty() {
            match serde_json::from_slice::<Value>(&self.body) {
                Ok(value) => schema::validate(&value, shape),
                Err(e) => ValidationResult::from_errors(vec![format!(
                    "body: expected valid JSON, {}",
                    e
                )]),
            }
        } else {
            schema::validate_text(&String::from_utf8_lossy(&self.body), shape)
        }
    }

    #[track_caller]
    pub fn expect_schema(&self, shape: &Shape) {
        let result = self.validate_body(shape);

        if !result.is_valid() {
            panic!(
                "Response from {} ({}) does not match its schema:\n{}",
                self.url,
                self.status,
                result.errors().join("\n")
            );
        }
    }

    #[track_caller]
    pub fn expect_status(&self, expected: u16) {
        self.expect_status_in(&[expected]);
    }

    /// Passes when the status is any member of `accepted`, for endpoints
    /// whose error codes vary for the same failure.
    #[track_caller]
    pub fn expect_status_in(&self, accepted: &[u16]) {
        if !accepted.contains(&self.status()) {
            panic!(
                "Expected {} to respond with one of {:?}, got {}. Body: {}",
                self.url,
                accepted,
                self.status(),
                self.body_excerpt()
            );
        }
    }

    fn body_excerpt(&self) -> String {
        String::from_utf8_lossy(&self.body)
            .chars()
            .take(BODY_EXCERPT_LENGTH)
            .collect()
    }
}

pub(crate) fn is_json_content_type(content_type: &str) -> bool {
    let media_type = media_type(content_type);
    media_type == "application/json" || media_type.ends_with("+json")
}

pub(crate) fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
