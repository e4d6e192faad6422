use serde_json::{Map, Value};

use crate::{
    ImportError,
    raw::{RawClue, parse_value, split_tags},
};

/// Renders a scalar field as text; numbers keep their JSON spelling.
fn field_text(object: &Map<String, Value>, name: &str) -> String {
    match object.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Clue value: a JSON number, or a string parsed from its digits.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn field_value(object: &Map<String, Value>) -> u32 {
    match object.get("value") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|v| (0.0..=f64::from(u32::MAX)).contains(v))
                    .map(|v| v.round() as u32)
            })
            .unwrap_or(0),
        Some(Value::String(s)) => parse_value(s),
        _ => 0,
    }
}

fn tags(object: &Map<String, Value>) -> Vec<String> {
    match object.get("subject_tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Some(Value::String(s)) => split_tags(s),
        _ => Vec::new(),
    }
}

/// Reads a JSON array of clue objects.
///
/// Elements that are not objects are kept as empty rows so they are counted
/// as discarded.
pub(crate) fn read_json(text: &str) -> Result<Vec<RawClue>, ImportError> {
    let Value::Array(items) = serde_json::from_str(text)? else {
        return Err(ImportError::NotAnArray);
    };
    let clues = items
        .iter()
        .map(|item| {
            let Some(object) = item.as_object() else {
                return RawClue::default();
            };
            RawClue {
                id: Some(field_text(object, "id")),
                round: field_text(object, "round"),
                category: field_text(object, "category"),
                value: field_value(object),
                clue: field_text(object, "clue"),
                response: field_text(object, "response"),
                tags: tags(object),
            }
        })
        .collect();
    Ok(clues)
}
