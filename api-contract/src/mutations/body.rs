use super::BodyMutation;
use regex::Regex;
use serde_json::Value;

#[derive(Debug)]
pub struct BodyReplaceMutation {
    text: String,
    substitution: String,
}

impl BodyReplaceMutation {
    pub fn new<S1: Into<String>, S2: Into<String>>(text: S1, substitution: S2) -> Self {
        Self {
            text: text.into(),
            substitution: substitution.into(),
        }
    }
}

impl BodyMutation for BodyReplaceMutation {
    fn mutate(&self, body: &mut String) {
        *body = body.replace(&self.text, &self.substitution);
    }
}

/// Replaces every match of `pattern`.
#[derive(Debug)]
pub struct BodyReplaceRegexMutation {
    pattern: Regex,
    substitution: String,
}

impl BodyReplaceRegexMutation {
    pub fn new<S: Into<String>>(pattern: Regex, substitution: S) -> Self {
        Self {
            pattern,
            substitution: substitution.into(),
        }
    }
}

impl BodyMutation for BodyReplaceRegexMutation {
    fn mutate(&self, body: &mut String) {
        *body = self
            .pattern
            .replace_all(body, self.substitution.as_str())
            .into_owned();
    }
}

/// Masks values inside a JSON body addressed by JSON pointers. A `*`
/// segment matches every element of an array or every value of an object.
/// Bodies that aren't JSON are left alone.
#[derive(Debug)]
pub struct MaskJsonFieldsMutation {
    pointers: Vec<Vec<String>>,
    mask: Value,
}

impl MaskJsonFieldsMutation {
    pub fn new<S: AsRef<str>, I: IntoIterator<Item = S>, M: Into<Value>>(pointers: I, mask: M) -> Self {
        Self {
            pointers: pointers
                .into_iter()
                .map(|pointer| split_pointer(pointer.as_ref()))
                .collect(),
            mask: mask.into(),
        }
    }
}

impl BodyMutation for MaskJsonFieldsMutation {
    fn mutate(&self, body: &mut String) {
        let mut value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return,
        };

        for segments in &self.pointers {
            mask(&mut value, segments, &self.mask);
        }

        if let Ok(rendered) = serde_json::to_string_pretty(&value) {
            *body = rendered;
        }
    }
}

fn split_pointer(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn mask(value: &mut Value, segments: &[String], replacement: &Value) {
    let (segment, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *value = replacement.clone();
            return;
        }
    };

    match value {
        Value::Object(map) if segment == "*" => {
            for child in map.values_mut() {
                mask(child, rest, replacement);
            }
        }
        Value::Array(items) if segment == "*" => {
            for child in items.iter_mut() {
                mask(child, rest, replacement);
            }
        }
        Value::Object(map) => {
            if let Some(child) = map.get_mut(segment.as_str()) {
                mask(child, rest, replacement);
            }
        }
        Value::Array(items) => {
            if let Some(child) = segment.parse::<usize>().ok().and_then(|index| items.get_mut(index)) {
                mask(child, rest, replacement);
            }
        }
        _ => {}
    }
}
