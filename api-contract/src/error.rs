use crate::baseline::error::{BaselineDifference, BaselineError};
use hyper::http;
use std::{io, sync, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("The lock was poisoned")]
    PoisonedLock,
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),
    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),
    #[error("Invalid body: {0}")]
    InvalidBody(String),
    #[error("Hyper error: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Http Error: {0}")]
    HttpError(#[from] http::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("The request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("Baseline error: {0}")]
    BaselineError(#[from] BaselineError),
    #[error("The recorded calls differ from the baseline:\n{}", format_differences(.0))]
    BaselineChanged(Vec<BaselineDifference>),
}

fn format_differences(differences: &[BaselineDifference]) -> String {
    differences
        .iter()
        .map(|difference| format!("  - {}", difference))
        .collect::<Vec<_>>()
        .join("\n")
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(e: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName(e.to_string())
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(e: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue(e.to_string())
    }
}
