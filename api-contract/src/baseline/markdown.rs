use super::{error::BaselineError, BaselineEntry, BaselineStore, RecordedMessage};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::BTreeMap,
    fmt::Write,
    fs, io,
    path::{Path, PathBuf},
};

lazy_static! {
    static ref HEADER_REGEX: Regex =
        Regex::new(r"(?m)^(?P<name>[^:\r\n]+):[ \t]*(?P<value>[^\r\n]*)\r?$").unwrap();
    static ref INTERACTION_REGEX: Regex = Regex::new(concat!(
        r"(?ms)^## Interaction (?P<number>[0-9]+): (?P<method>[A-Z]+) (?P<url>\S*)",
        r".*?^### Request headers:.*?^```[^\n]*\n(?P<request_headers>.*?)^```",
        r".*?^### Request body:.*?^```[^\n]*\n(?P<request_body>.*?)^```",
        r".*?^### Response headers:.*?^```[^\n]*\n(?P<response_headers>.*?)^```",
        r".*?^### Response body \((?P<status>[0-9]+)[^)]*\):.*?^```[^\n]*\n(?P<response_body>.*?)^```",
    ))
    .unwrap();
}

/// A baseline kept as a human readable markdown document, one section per
/// call.
///
/// Bodies are stored between fences verbatim, so a body line that itself
/// starts with a fence can't be read back.
#[derive(Debug, Clone)]
pub struct MarkdownBaseline {
    path: PathBuf,
}

impl MarkdownBaseline {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(&self, contents: &str) -> Result<Vec<BaselineEntry>, BaselineError> {
        let mut entries = Vec::new();

        for (index, captures) in INTERACTION_REGEX.captures_iter(contents).enumerate() {
            let number: usize = captures["number"]
                .parse()
                .map_err(|_| BaselineError::InvalidInteractionNumber)?;
            if number != index {
                return Err(BaselineError::InvalidInteractionNumber);
            }

            let status = captures["status"]
                .parse()
                .map_err(|_| BaselineError::InvalidStatusCode)?;

            entries.push(BaselineEntry {
                method: captures["method"].into(),
                url: captures["url"].into(),
                request: RecordedMessage {
                    headers: parse_headers(&captures["request_headers"]),
                    body: strip_fence_newline(&captures["request_body"]),
                },
                status,
                response: RecordedMessage {
                    headers: parse_headers(&captures["response_headers"]),
                    body: strip_fence_newline(&captures["response_body"]),
                },
            });
        }

        if entries.is_empty() && !contents.trim().is_empty() {
            return Err(BaselineError::InvalidBaselineFormat(self.path.clone()));
        }

        Ok(entries)
    }

    pub fn render(entries: &[BaselineEntry]) -> String {
        let mut document = String::new();

        for (number, entry) in entries.iter().enumerate() {
            // Writing into a String can't fail.
            let _ = write!(
                document,
                "## Interaction {}: {} {}\n\n\
                 ### Request headers:\n\n```\n{}```\n\n\
                 ### Request body:\n\n```\n{}\n```\n\n\
                 ### Response headers:\n\n```\n{}```\n\n\
                 ### Response body ({}: {}):\n\n```\n{}\n```\n\n",
                number,
                entry.method,
                entry.url,
                render_headers(&entry.request.headers),
                entry.request.body,
                render_headers(&entry.response.headers),
                entry.status,
                entry.content_type(),
                entry.response.body,
            );
        }

        document
    }
}

impl BaselineStore for MarkdownBaseline {
    fn load(&self) -> Result<Vec<BaselineEntry>, BaselineError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BaselineError::MissingBaseline(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        self.parse(&contents)
    }

    fn save(&self, entries: &[BaselineEntry]) -> Result<(), BaselineError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, Self::render(entries))?;

        Ok(())
    }
}

fn parse_headers(part: &str) -> BTreeMap<String, String> {
    HEADER_REGEX
        .captures_iter(part)
        .map(|capture| {
            (
                capture["name"].trim().to_lowercase(),
                capture["value"].trim().to_string(),
            )
        })
        .collect()
}

fn render_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}\n", name, value))
        .collect()
}

fn strip_fence_newline(part: &str) -> String {
    let part = part.strip_suffix('\n').unwrap_or(part);
    part.strip_suffix('\r').unwrap_or(part).to_string()
}
