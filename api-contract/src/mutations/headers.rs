use super::HeadersMutation;
use regex::Regex;
use std::collections::BTreeMap;

/// Sets a header, replacing any recorded value.
#[derive(Debug)]
pub struct SetHeaderMutation {
    header_name: String,
    header_value: String,
}

impl SetHeaderMutation {
    pub fn new<S1: AsRef<str>, S2: Into<String>>(name: S1, value: S2) -> Self {
        Self {
            header_name: name.as_ref().to_lowercase(),
            header_value: value.into(),
        }
    }
}

impl HeadersMutation for SetHeaderMutation {
    fn mutate(&self, headers: &mut BTreeMap<String, String>) {
        headers.insert(self.header_name.clone(), self.header_value.clone());
    }
}

/// Drops headers by exact (case-insensitive) name or by name pattern.
#[derive(Debug)]
pub struct RemoveHeadersMutation {
    names: Vec<String>,
    patterns: Vec<Regex>,
}

impl RemoveHeadersMutation {
    pub fn named<S: AsRef<str>, I: IntoIterator<Item = S>>(names: I) -> Self {
        Self {
            names: names.into_iter().map(|name| name.as_ref().to_lowercase()).collect(),
            patterns: Vec::new(),
        }
    }

    pub fn matching<I: IntoIterator<Item = Regex>>(patterns: I) -> Self {
        Self {
            names: Vec::new(),
            patterns: patterns.into_iter().collect(),
        }
    }

    fn removes(&self, name: &str) -> bool {
        self.names.iter().any(|removed| removed == name)
            || self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

impl HeadersMutation for RemoveHeadersMutation {
    fn mutate(&self, headers: &mut BTreeMap<String, String>) {
        headers.retain(|name, _| !self.removes(name));
    }
}

/// Keeps a header present but hides its value, for credentials that must
/// not end up in a committed baseline.
#[derive(Debug)]
pub struct MaskHeadersMutation {
    names: Vec<String>,
    mask: String,
}

impl MaskHeadersMutation {
    pub fn new<S: AsRef<str>, I: IntoIterator<Item = S>, M: Into<String>>(names: I, mask: M) -> Self {
        Self {
            names: names.into_iter().map(|name| name.as_ref().to_lowercase()).collect(),
            mask: mask.into(),
        }
    }
}

impl HeadersMutation for MaskHeadersMutation {
    fn mutate(&self, headers: &mut BTreeMap<String, String>) {
        for name in &self.names {
            if let Some(value) = headers.get_mut(name) {
                *value = self.mask.clone();
            }
        }
    }
}
