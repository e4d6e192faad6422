use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord};

use crate::raw::{RawClue, parse_value, split_tags};

/// Header-name lookup for one delimited file.
#[derive(Debug)]
struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_owned(), i))
            .collect();
        Self { index }
    }

    /// Field `name` of `record`, empty when the column or field is missing.
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or_default()
    }
}

/// Reads the non-blank rows of a delimited text with a header line.
fn read_rows(text: &str, delimiter: u8) -> Result<(Columns, Vec<StringRecord>), csv::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());
    let columns = Columns::new(reader.headers()?);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record);
    }
    Ok((columns, rows))
}

/// Reads the generic CSV layout.
pub(crate) fn read_csv(text: &str) -> Result<Vec<RawClue>, csv::Error> {
    let (columns, rows) = read_rows(text, b',')?;
    let clues = rows
        .iter()
        .map(|row| {
            let get = |name| columns.get(row, name);
            RawClue {
                id: Some(get("id").to_owned()),
                round: get("round").to_owned(),
                category: get("category").to_owned(),
                value: parse_value(get("value")),
                clue: get("clue").to_owned(),
                response: get("response").to_owned(),
                tags: split_tags(get("subject_tags")),
            }
        })
        .collect();
    Ok(clues)
}

/// Reads the Jeopardy archive TSV layout.
///
/// The archive calls the clue `answer` and the expected response `question`.
/// Rows carry no id; one is derived from the air date, round and row number.
pub(crate) fn read_tsv(text: &str) -> Result<Vec<RawClue>, csv::Error> {
    let (columns, rows) = read_rows(text, b'\t')?;
    let clues = rows
        .iter()
        .enumerate()
        .map(|(k, row)| {
            let get = |name| columns.get(row, name);
            let round = get("round").trim();
            let air_date = match get("air_date").trim() {
                "" => "nodate",
                date => date,
            };
            let id_round = if round.is_empty() { "r" } else { round };
            RawClue {
                id: Some(format!("{air_date}_{id_round}_{k}")),
                round: round.to_owned(),
                category: get("category").to_owned(),
                value: parse_value(get("clue_value")),
                clue: get("answer").to_owned(),
                response: get("question").to_owned(),
                tags: Vec::new(),
            }
        })
        .collect();
    Ok(clues)
}
