use super::{
    primitive::is_iso_date, ArrayShape, ObjectShape, Primitive, PrimitiveKind, Shape, UnknownPolicy,
};
use serde_json::Value;
use std::collections::HashMap;

const ROOT_PATH: &str = "value";

/// Outcome of a single validation. Valid exactly when no errors were found.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub(crate) fn from_errors(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

pub fn validate(value: &Value, shape: &Shape) -> ValidationResult {
    let mut errors = Vec::new();
    check(value, shape, "", &mut errors);

    ValidationResult { errors }
}

/// Validates a raw, non-JSON body. The text is checked as a JSON string.
pub fn validate_text(text: &str, shape: &Shape) -> ValidationResult {
    validate(&Value::String(text.into()), shape)
}

/// Fails the calling test with every violation when `value` doesn't match.
#[track_caller]
pub fn assert_valid(value: &Value, shape: &Shape) {
    let result = validate(value, shape);

    if !result.is_valid() {
        panic!(
            "Schema validation failed with {} error(s):\n{}",
            result.errors.len(),
            result.errors.join("\n")
        );
    }
}

fn check(value: &Value, shape: &Shape, path: &str, errors: &mut Vec<String>) {
    match shape {
        Shape::Primitive(primitive) => check_primitive(value, primitive, path, errors),
        Shape::Object(object) => check_object(value, object, path, errors),
        Shape::Array(array) => check_array(value, array, path, errors),
        Shape::Union(alternatives) => check_union(value, alternatives, path, errors),
        Shape::Reference(shape) => check(value, shape, path, errors),
        Shape::Nullable(inner) => {
            if !value.is_null() {
                check(value, inner, path, errors);
            }
        }
        Shape::Exact(expected) => {
            if expected != value {
                errors.push(format!(
                    "{}: expected {}, got {}",
                    display(path),
                    expected,
                    value
                ));
            }
        }
        Shape::Any => {}
    }
}

fn check_primitive(value: &Value, primitive: &Primitive, path: &str, errors: &mut Vec<String>) {
    let constraints = &primitive.constraints;

    if value.is_null() {
        if !constraints.nullable {
            errors.push(format!(
                "{}: expected {}, got null",
                display(path),
                primitive.kind
            ));
        }
        return;
    }

    let type_matches = match primitive.kind {
        PrimitiveKind::Number => value.is_number(),
        PrimitiveKind::String | PrimitiveKind::Date => value.is_string(),
        PrimitiveKind::Boolean => value.is_boolean(),
    };

    if !type_matches {
        errors.push(format!(
            "{}: expected {}, got {}",
            display(path),
            primitive.kind,
            type_name(value)
        ));
        return;
    }

    if let Some(number) = value.as_f64() {
        if constraints.integer && number.fract() != 0.0 {
            errors.push(format!("{}: expected integer, got {}", display(path), value));
        }
        if let Some(min) = constraints.min {
            if number < min {
                errors.push(format!(
                    "{}: expected number >= {}, got {}",
                    display(path),
                    min,
                    value
                ));
            }
        }
        if let Some(max) = constraints.max {
            if number > max {
                errors.push(format!(
                    "{}: expected number <= {}, got {}",
                    display(path),
                    max,
                    value
                ));
            }
        }
    }

    if let Some(text) = value.as_str() {
        let length = text.chars().count();

        if primitive.kind == PrimitiveKind::Date && !is_iso_date(text) {
            errors.push(format!("{}: expected valid date, got {}", display(path), value));
        }
        if let Some(min_length) = constraints.min_length {
            if length < min_length {
                errors.push(format!(
                    "{}: expected length >= {}, got {}",
                    display(path),
                    min_length,
                    length
                ));
            }
        }
        if let Some(max_length) = constraints.max_length {
            if length > max_length {
                errors.push(format!(
                    "{}: expected length <= {}, got {}",
                    display(path),
                    max_length,
                    length
                ));
            }
        }
        if let Some(format) = &constraints.format {
            if !format.matches(text) {
                errors.push(format!("{}: {}", display(path), format.describe()));
            }
        }
    }

    if let Some(allowed) = &constraints.allowed {
        if !allowed.iter().any(|candidate| same_value(candidate, value)) {
            let rendered = allowed
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(",");
            errors.push(format!(
                "{}: expected one of [{}], got {}",
                display(path),
                rendered,
                value
            ));
        }
    }
}

fn check_object(value: &Value, object: &ObjectShape, path: &str, errors: &mut Vec<String>) {
    let map = match value {
        Value::Object(map) => map,
        other => {
            errors.push(format!(
                "{}: expected object, got {}",
                display(path),
                type_name(other)
            ));
            return;
        }
    };

    for field in &object.fields {
        let field_path = child_path(path, &field.name);

        match map.get(&field.name) {
            Some(field_value) => check(field_value, &field.shape, &field_path, errors),
            None if field.required => {
                errors.push(format!("{}: missing required field", field_path));
            }
            None => {}
        }
    }

    if object.unknown_policy == UnknownPolicy::Reject {
        for key in map.keys() {
            if object.get(key).is_none() {
                errors.push(format!("{}: unexpected field", child_path(path, key)));
            }
        }
    }
}

fn check_array(value: &Value, array: &ArrayShape, path: &str, errors: &mut Vec<String>) {
    let items = match value {
        Value::Array(items) => items,
        other => {
            errors.push(format!(
                "{}: expected array, got {}",
                display(path),
                type_name(other)
            ));
            return;
        }
    };

    if items.len() < array.min_items {
        errors.push(format!(
            "{}: expected at least {} items, got {}",
            display(path),
            array.min_items,
            items.len()
        ));
    }
    if let Some(max_items) = array.max_items {
        if items.len() > max_items {
            errors.push(format!(
                "{}: expected at most {} items, got {}",
                display(path),
                max_items,
                items.len()
            ));
        }
    }

    for (index, item) in items.iter().enumerate() {
        check(item, &array.element, &index_path(path, index), errors);
    }

    if let Some(unique_key) = &array.unique_by {
        // Keys in first-seen order so errors come out deterministically.
        let mut seen: Vec<(String, Vec<usize>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, item) in items.iter().enumerate() {
            let key = match item.pointer(&unique_key.0) {
                Some(key) => key.to_string(),
                None => continue,
            };

            match positions.get(&key) {
                Some(&position) => seen[position].1.push(index),
                None => {
                    positions.insert(key.clone(), seen.len());
                    seen.push((key, vec![index]));
                }
            }
        }

        for (key, indices) in seen.into_iter().filter(|(_, indices)| indices.len() > 1) {
            let indices = indices
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!(
                "{}: duplicate key {} at indices [{}]",
                display(path),
                key,
                indices
            ));
        }
    }
}

fn check_union(value: &Value, alternatives: &[Shape], path: &str, errors: &mut Vec<String>) {
    let mut attempts = Vec::with_capacity(alternatives.len());

    for alternative in alternatives {
        let mut alternative_errors = Vec::new();
        check(value, alternative, path, &mut alternative_errors);

        if alternative_errors.is_empty() {
            return;
        }
        attempts.push(alternative_errors.join(", "));
    }

    let summary = attempts
        .iter()
        .enumerate()
        .map(|(index, attempt)| format!("alternative {}: {}", index + 1, attempt))
        .collect::<Vec<_>>()
        .join("; ");
    errors.push(format!(
        "{}: no alternative matched ({})",
        display(path),
        summary
    ));
}

fn same_value(lhs: &Value, rhs: &Value) -> bool {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => lhs == rhs,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn display(path: &str) -> &str {
    if path.is_empty() {
        ROOT_PATH
    } else {
        path
    }
}

fn child_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.into()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", display(parent), index)
}
