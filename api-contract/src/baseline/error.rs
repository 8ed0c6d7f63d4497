use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Baseline {0} is not in the expected markdown format")]
    InvalidBaselineFormat(PathBuf),
    #[error("Couldn't parse interaction number from the baseline file")]
    InvalidInteractionNumber,
    #[error("The status code is invalid")]
    InvalidStatusCode,
    #[error("There is no baseline at {0}, record one first")]
    MissingBaseline(PathBuf),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BodyDifference {
    pub line: usize,
    pub column: usize,
    pub old_context: String,
    pub new_context: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeaderDifference {
    pub header_name: String,
    pub old_header_value: Option<String>,
    pub new_header_value: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DifferenceLocation {
    Request,
    Response,
}

impl Display for DifferenceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifferenceLocation::Request => write!(f, "Request"),
            DifferenceLocation::Response => write!(f, "Response"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BaselineDifference {
    InteractionCount {
        old: usize,
        new: usize,
    },
    Target {
        interaction: usize,
        old: String,
        new: String,
    },
    Status {
        interaction: usize,
        old: u16,
        new: u16,
    },
    Header {
        interaction: usize,
        location: DifferenceLocation,
        difference: HeaderDifference,
    },
    Body {
        interaction: usize,
        location: DifferenceLocation,
        difference: BodyDifference,
    },
}

impl Display for BaselineDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineDifference::InteractionCount { old, new } => write!(
                f,
                "Number of interactions differs. old - {}, new - {}",
                old, new
            ),
            BaselineDifference::Target { interaction, old, new } => write!(
                f,
                "Interaction {}: request differs. old - {}, new - {}",
                interaction, old, new
            ),
            BaselineDifference::Status { interaction, old, new } => write!(
                f,
                "Interaction {}: status code differs. old - {}, new - {}",
                interaction, old, new
            ),
            BaselineDifference::Header {
                interaction,
                location,
                difference:
                    HeaderDifference {
                        header_name,
                        old_header_value,
                        new_header_value,
                    },
            } => {
                let describe = |value: &Option<String>| match value {
                    Some(value) => format!("\"{}\": \"{}\"", header_name, value),
                    None => "<no header value>".into(),
                };

                write!(
                    f,
                    "Interaction {}: {} headers differ. old - {}, new - {}",
                    interaction,
                    location,
                    describe(old_header_value),
                    describe(new_header_value)
                )
            }
            BaselineDifference::Body {
                interaction,
                location,
                difference:
                    BodyDifference {
                        line,
                        column,
                        old_context,
                        new_context,
                    },
            } => write!(
                f,
                "Interaction {}: {} bodies differ at line {}, column {}. Old: \"{}\". New: \"{}\"",
                interaction,
                location,
                line,
                column,
                old_context.escape_default(),
                new_context.escape_default()
            ),
        }
    }
}
