use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::InvalidClueError;

/// Round a clue was aired in.
///
/// Only clues from the board's eligible round (normally [`Round::First`]) are
/// considered when generating a board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    First,
    Second,
    Final,
    Unknown,
}

impl Round {
    /// Parses the loose round labels found in clue datasets.
    ///
    /// Unrecognized labels map to [`Round::Unknown`] rather than failing.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_uppercase();
        match label.as_str() {
            "1" | "J" | "JEOPARDY" | "JEOPARDY!" | "FIRST" => Self::First,
            "2" | "DJ" | "DOUBLE JEOPARDY" | "DOUBLE JEOPARDY!" | "SECOND" => Self::Second,
            "3" | "FJ" | "FINAL JEOPARDY" | "FINAL JEOPARDY!" | "FINAL" => Self::Final,
            _ => Self::Unknown,
        }
    }
}

impl FromStr for Round {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Final => "final",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Returns the grouping key of a category name.
///
/// Categories are grouped case-insensitively with surrounding whitespace
/// removed and inner whitespace runs collapsed, so `"Science"` and
/// `"SCIENCE "` share one key.
///
/// # Example
///
/// ```
/// use buzzboard_engine::category_key;
///
/// assert_eq!(category_key("  World   History "), category_key("WORLD HISTORY"));
/// ```
#[must_use]
pub fn category_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A normalized clue/response pair.
///
/// Records are immutable once constructed. The constructor guarantees that the
/// clue and response text are non-empty after trimming. Deserialization goes
/// through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClueRecordFields")]
pub struct ClueRecord {
    id: String,
    round: Round,
    category: String,
    value: u32,
    clue: String,
    response: String,
    #[serde(default)]
    tags: BTreeSet<String>,
}

/// Unvalidated wire form of a [`ClueRecord`].
#[derive(Deserialize)]
struct ClueRecordFields {
    id: String,
    round: Round,
    #[serde(default)]
    category: String,
    value: u32,
    clue: String,
    response: String,
    #[serde(default)]
    tags: BTreeSet<String>,
}

impl TryFrom<ClueRecordFields> for ClueRecord {
    type Error = InvalidClueError;

    fn try_from(fields: ClueRecordFields) -> Result<Self, Self::Error> {
        let record = Self::new(
            fields.id,
            fields.round,
            &fields.category,
            fields.value,
            &fields.clue,
            &fields.response,
        )?;
        Ok(record.with_tags(fields.tags))
    }
}

impl ClueRecord {
    /// Creates a record, trimming every text field.
    ///
    /// Fails when the clue or response is empty after trimming.
    pub fn new(
        id: impl Into<String>,
        round: Round,
        category: &str,
        value: u32,
        clue: &str,
        response: &str,
    ) -> Result<Self, InvalidClueError> {
        let id = id.into();
        let clue = clue.trim();
        let response = response.trim();
        if clue.is_empty() {
            return Err(InvalidClueError::EmptyClue { id });
        }
        if response.is_empty() {
            return Err(InvalidClueError::EmptyResponse { id });
        }
        let category = category.trim();
        let category = if category.is_empty() {
            "UNKNOWN"
        } else {
            category
        };
        Ok(Self {
            id,
            round,
            category: category.to_owned(),
            value,
            clue: clue.to_owned(),
            response: response.to_owned(),
            tags: BTreeSet::new(),
        })
    }

    /// Attaches subject tags, dropping blank ones.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn round(&self) -> Round {
        self.round
    }

    /// Display form of the category (trimmed, case preserved).
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Grouping key of the category, see [`category_key`].
    #[must_use]
    pub fn category_key(&self) -> String {
        category_key(&self.category)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub fn clue(&self) -> &str {
        &self.clue
    }

    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_labels() {
        assert_eq!(Round::from_label("1"), Round::First);
        assert_eq!(Round::from_label(" jeopardy! "), Round::First);
        assert_eq!(Round::from_label("DJ"), Round::Second);
        assert_eq!(Round::from_label("Final Jeopardy"), Round::Final);
        assert_eq!(Round::from_label("tiebreaker"), Round::Unknown);
        assert_eq!(Round::from_label(""), Round::Unknown);
    }

    #[test]
    fn test_category_key_merges_case_and_whitespace() {
        assert_eq!(category_key("Science"), category_key("SCIENCE "));
        assert_eq!(category_key("a  b\tc"), "a b c");
        assert_ne!(category_key("Science"), category_key("Sciences"));
    }

    #[test]
    fn test_record_trims_text() {
        let record =
            ClueRecord::new("x", Round::First, "  Rivers ", 200, " Longest river ", " the Nile ")
                .unwrap();
        assert_eq!(record.category(), "Rivers");
        assert_eq!(record.clue(), "Longest river");
        assert_eq!(record.response(), "the Nile");
    }

    #[test]
    fn test_record_rejects_empty_text() {
        let err = ClueRecord::new("x", Round::First, "Rivers", 200, "   ", "Nile").unwrap_err();
        assert!(matches!(err, InvalidClueError::EmptyClue { .. }));
        let err = ClueRecord::new("y", Round::First, "Rivers", 200, "Clue", "").unwrap_err();
        assert!(matches!(err, InvalidClueError::EmptyResponse { .. }));
    }

    #[test]
    fn test_blank_category_becomes_unknown() {
        let record = ClueRecord::new("x", Round::First, " ", 200, "c", "r").unwrap();
        assert_eq!(record.category(), "UNKNOWN");
    }

    #[test]
    fn test_tags_drop_blanks() {
        let record = ClueRecord::new("x", Round::First, "Rivers", 200, "c", "r")
            .unwrap()
            .with_tags(["geo", " ", " africa "]);
        let tags = record.tags().iter().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(tags, ["africa", "geo"]);
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<ClueRecord>(
            r#"{"id":"x","round":"first","category":"","value":7,"clue":"","response":"   "}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty clue text"));

        let record = serde_json::from_str::<ClueRecord>(
            r#"{"id":"y","round":"second","category":" ","value":400,"clue":" c ","response":"r","tags":["geo"," "]}"#,
        )
        .unwrap();
        assert_eq!(record.category(), "UNKNOWN");
        assert_eq!(record.clue(), "c");
        assert_eq!(record.tags().len(), 1);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<ClueRecord>(&json).unwrap(), record);
    }
}
