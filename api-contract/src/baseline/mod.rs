//! Regression baselines: recorded calls rendered as text, stored between
//! runs and diffed against the calls of the current run.

pub mod error;
mod markdown;

pub use markdown::MarkdownBaseline;

use crate::record::ApiCallRecord;
use self::error::{BaselineDifference, BaselineError, BodyDifference, DifferenceLocation, HeaderDifference};
use std::{collections::BTreeMap, collections::BTreeSet, fmt::Debug};

/// Headers and rendered body of one side of a call.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RecordedMessage {
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BaselineEntry {
    pub method: String,
    /// Path and query only, so one baseline serves every environment.
    pub url: String,
    pub request: RecordedMessage,
    pub status: u16,
    pub response: RecordedMessage,
}

impl BaselineEntry {
    pub fn from_record(record: &ApiCallRecord) -> Self {
        Self {
            method: record.method.clone(),
            url: strip_origin(&record.url),
            request: RecordedMessage {
                headers: record.request_headers.clone(),
                body: record
                    .request_body
                    .as_ref()
                    .map(|body| body.render())
                    .unwrap_or_default(),
            },
            status: record.response_status,
            response: RecordedMessage {
                headers: record.response_headers.clone(),
                body: record.response_body.render(),
            },
        }
    }

    pub fn content_type(&self) -> &str {
        self.response
            .headers
            .get("content-type")
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn target(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

fn strip_origin(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().into(),
        },
        Err(_) => url.into(),
    }
}

/// Persistence for baselines.
pub trait BaselineStore: Debug + Send + Sync {
    fn load(&self) -> Result<Vec<BaselineEntry>, BaselineError>;
    fn save(&self, entries: &[BaselineEntry]) -> Result<(), BaselineError>;
}

/// Lists every difference between a stored baseline and the current calls.
/// Calls are paired up by position.
pub fn compare(old: &[BaselineEntry], new: &[BaselineEntry]) -> Vec<BaselineDifference> {
    let mut differences = Vec::new();

    if old.len() != new.len() {
        differences.push(BaselineDifference::InteractionCount {
            old: old.len(),
            new: new.len(),
        });
    }

    for (interaction, (old_entry, new_entry)) in old.iter().zip(new.iter()).enumerate() {
        if old_entry.method != new_entry.method || old_entry.url != new_entry.url {
            differences.push(BaselineDifference::Target {
                interaction,
                old: old_entry.target(),
                new: new_entry.target(),
            });
        }
        if old_entry.status != new_entry.status {
            differences.push(BaselineDifference::Status {
                interaction,
                old: old_entry.status,
                new: new_entry.status,
            });
        }

        for (location, old_message, new_message) in [
            (DifferenceLocation::Request, &old_entry.request, &new_entry.request),
            (DifferenceLocation::Response, &old_entry.response, &new_entry.response),
        ] {
            for difference in header_differences(&old_message.headers, &new_message.headers) {
                differences.push(BaselineDifference::Header {
                    interaction,
                    location,
                    difference,
                });
            }
            if let Some(difference) = body_difference(&old_message.body, &new_message.body) {
                differences.push(BaselineDifference::Body {
                    interaction,
                    location,
                    difference,
                });
            }
        }
    }

    differences
}

fn header_differences(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> Vec<HeaderDifference> {
    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    names
        .into_iter()
        .filter_map(|name| {
            let old_value = old.get(name).map(|value| value.trim());
            let new_value = new.get(name).map(|value| value.trim());

            (old_value != new_value).then(|| HeaderDifference {
                header_name: name.clone(),
                old_header_value: old_value.map(String::from),
                new_header_value: new_value.map(String::from),
            })
        })
        .collect()
}

/// Position of the first differing character, 1-based, with the full line
/// from each side as context.
fn body_difference(old: &str, new: &str) -> Option<BodyDifference> {
    let (old, new) = (old.trim(), new.trim());
    if old == new {
        return None;
    }

    let old_lines = old.lines().collect::<Vec<_>>();
    let new_lines = new.lines().collect::<Vec<_>>();
    let line_count = old_lines.len().max(new_lines.len());

    (0..line_count).find_map(|index| {
        let old_line = old_lines.get(index).copied().unwrap_or_default();
        let new_line = new_lines.get(index).copied().unwrap_or_default();
        let old_exists = index < old_lines.len();
        let new_exists = index < new_lines.len();

        if old_line == new_line && old_exists == new_exists {
            return None;
        }

        let column = old_line
            .chars()
            .zip(new_line.chars())
            .take_while(|(lhs, rhs)| lhs == rhs)
            .count()
            + 1;

        Some(BodyDifference {
            line: index + 1,
            column,
            old_context: old_line.into(),
            new_context: new_line.into(),
        })
    })
}
