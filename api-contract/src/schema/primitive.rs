use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fmt::{self, Display};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref UUID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
    static ref NUMERIC_REGEX: Regex = Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap();
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
    /// A string holding an ISO-8601 date or date-time.
    Date,
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Number => write!(f, "number"),
            PrimitiveKind::String => write!(f, "string"),
            PrimitiveKind::Boolean => write!(f, "boolean"),
            PrimitiveKind::Date => write!(f, "date"),
        }
    }
}

/// Well-known string formats a primitive can be pinned to.
#[derive(Debug, Clone)]
pub enum Format {
    Email,
    Uuid,
    Uri,
    IsoDate,
    Numeric,
    Pattern(Regex),
}

impl Format {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Format::Email => EMAIL_REGEX.is_match(text),
            Format::Uuid => UUID_REGEX.is_match(text),
            Format::Uri => url::Url::parse(text).is_ok(),
            Format::IsoDate => is_iso_date(text),
            Format::Numeric => NUMERIC_REGEX.is_match(text),
            Format::Pattern(regex) => regex.is_match(text),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Format::Email => "expected valid email format".into(),
            Format::Uuid => "expected valid uuid format".into(),
            Format::Uri => "expected valid uri format".into(),
            Format::IsoDate => "expected valid iso date format".into(),
            Format::Numeric => "expected numeric string".into(),
            Format::Pattern(regex) => format!("expected value matching pattern {}", regex.as_str()),
        }
    }
}

pub(crate) fn is_iso_date(text: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(text).is_ok()
        || chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub allowed: Option<Vec<Value>>,
    pub format: Option<Format>,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub constraints: Constraints,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            constraints: Constraints::default(),
        }
    }

    pub fn number() -> Self {
        Self::new(PrimitiveKind::Number)
    }

    pub fn integer() -> Self {
        Self::number().whole()
    }

    pub fn string() -> Self {
        Self::new(PrimitiveKind::String)
    }

    pub fn boolean() -> Self {
        Self::new(PrimitiveKind::Boolean)
    }

    pub fn date() -> Self {
        Self::new(PrimitiveKind::Date)
    }

    pub fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    pub fn whole(mut self) -> Self {
        self.constraints.integer = true;
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.constraints.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.constraints.max_length = Some(max_length);
        self
    }

    /// Non-empty string, the usual `Joi.string().required()` idiom.
    pub fn non_empty(self) -> Self {
        self.min_length(1)
    }

    pub fn one_of<V: Into<Value>, I: IntoIterator<Item = V>>(mut self, values: I) -> Self {
        self.constraints.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.constraints.format = Some(format);
        self
    }

    pub fn pattern(self, regex: Regex) -> Self {
        self.format(Format::Pattern(regex))
    }

    pub fn nullable(mut self) -> Self {
        self.constraints.nullable = true;
        self
    }
}
