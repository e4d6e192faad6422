use buzzboard_engine::{ClueRecord, InvalidClueError, Round};

/// Parses a clue value from its digits only (`"$1,000"` is 1000).
///
/// Returns 0 when there are no digits or the value does not fit.
#[must_use]
pub fn parse_value(raw: &str) -> u32 {
    let digits = raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    digits.parse().unwrap_or(0)
}

/// Parses a round label; a blank label means the first round.
#[must_use]
pub fn parse_round(raw: &str) -> Round {
    let raw = raw.trim();
    if raw.is_empty() {
        Round::First
    } else {
        Round::from_label(raw)
    }
}

/// A row as read from a dataset, before validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawClue {
    pub(crate) id: Option<String>,
    pub(crate) round: String,
    pub(crate) category: String,
    pub(crate) value: u32,
    pub(crate) clue: String,
    pub(crate) response: String,
    pub(crate) tags: Vec<String>,
}

impl RawClue {
    /// Validates the row; `n` numbers rows that carry no id.
    pub(crate) fn into_record(self, n: usize) -> Result<ClueRecord, InvalidClueError> {
        let id = self
            .id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("row-{n}"));
        let record = ClueRecord::new(
            id,
            parse_round(&self.round),
            &self.category,
            self.value,
            &self.clue,
            &self.response,
        )?;
        Ok(record.with_tags(self.tags))
    }
}

/// Splits a `|`-separated tag list.
pub(crate) fn split_tags(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("$1,200"), 1200);
        assert_eq!(parse_value("400"), 400);
        assert_eq!(parse_value("None"), 0);
        assert_eq!(parse_value(""), 0);
        assert_eq!(parse_value("99999999999999"), 0);
    }

    #[test]
    fn test_parse_round() {
        assert_eq!(parse_round(""), Round::First);
        assert_eq!(parse_round(" 2 "), Round::Second);
        assert_eq!(parse_round("Final Jeopardy"), Round::Final);
        assert_eq!(parse_round("tiebreaker"), Round::Unknown);
    }

    #[test]
    fn test_blank_id_gets_row_number() {
        let raw = RawClue {
            id: Some("   ".to_owned()),
            clue: "clue".to_owned(),
            response: "response".to_owned(),
            ..RawClue::default()
        };
        assert_eq!(raw.into_record(7).unwrap().id(), "row-7");
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(" a | b||c "), ["a", "b", "c"]);
        assert!(split_tags("").is_empty());
    }
}
