//! Dataset import: turns CSV, Jeopardy TSV or JSON clue files into
//! [`ClueRecord`]s.
//!
//! Every reader trims text fields and discards rows whose clue or response
//! is empty. Discarded rows are counted in the [`ImportReport`].
//!
//! ```
//! use buzzboard_import::{DatasetFormat, import_str};
//!
//! let csv = "id,round,category,value,clue,response\n\
//!            a1,1,Rivers,$400,Flows through Cairo,What is the Nile?\n\
//!            a2,1,Rivers,200,,\n";
//! let report = import_str(csv, DatasetFormat::Csv).unwrap();
//! assert_eq!(report.records.len(), 1);
//! assert_eq!(report.records[0].value(), 400);
//! assert_eq!(report.discarded, 1);
//! ```

use std::{fs, path::Path};

use buzzboard_engine::ClueRecord;

pub use self::raw::{parse_round, parse_value};

mod delimited;
mod json;
mod raw;

/// Supported dataset layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum DatasetFormat {
    /// Header `id,round,category,value,clue,response,subject_tags,source_url`.
    #[display("csv")]
    Csv,
    /// Tab-separated Jeopardy archive export (`clue_value`, `answer`,
    /// `question`, `air_date`, ...).
    #[display("tsv")]
    Tsv,
    /// Array of objects with the CSV field names.
    #[display("json")]
    Json,
}

const TSV_HEADER_HINTS: [&str; 4] = ["clue_value", "air_date", "answer", "question"];

impl DatasetFormat {
    /// Detects the format from the file extension, falling back to the
    /// content of the first line.
    #[must_use]
    pub fn detect(path: &Path, text: &str) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("tsv") => Self::Tsv,
            Some("csv") => Self::Csv,
            _ => Self::detect_content(text),
        }
    }

    /// Detects the format from content alone.
    ///
    /// A first line holding a tab and a known archive column name is TSV,
    /// a leading `[` is JSON, anything else is CSV.
    #[must_use]
    pub fn detect_content(text: &str) -> Self {
        let first_line = text.lines().next().unwrap_or_default();
        if first_line.contains('\t') && TSV_HEADER_HINTS.iter().any(|h| first_line.contains(h)) {
            Self::Tsv
        } else if text.trim_start().starts_with('[') {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ImportError {
    #[display("failed to read dataset: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("malformed delimited dataset: {_0}")]
    #[from]
    Csv(csv::Error),
    #[display("malformed JSON dataset: {_0}")]
    #[from]
    Json(serde_json::Error),
    #[display("JSON dataset must be an array of clue objects")]
    NotAnArray,
    #[display("import produced 0 clues ({discarded} rows discarded)")]
    Empty { discarded: usize },
}

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub format: DatasetFormat,
    pub records: Vec<ClueRecord>,
    /// Rows dropped for an empty clue or response.
    pub discarded: usize,
}

/// Reads and normalizes a dataset file, detecting its format.
pub fn import_path(path: &Path) -> Result<ImportReport, ImportError> {
    let text = fs::read_to_string(path)?;
    let format = DatasetFormat::detect(path, &text);
    tracing::debug!(path = %path.display(), %format, "importing dataset");
    import_str(&text, format)
}

/// Normalizes dataset text in the given format.
pub fn import_str(text: &str, format: DatasetFormat) -> Result<ImportReport, ImportError> {
    let rows = match format {
        DatasetFormat::Csv => delimited::read_csv(text)?,
        DatasetFormat::Tsv => delimited::read_tsv(text)?,
        DatasetFormat::Json => json::read_json(text)?,
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut discarded = 0;
    for (n, row) in rows.into_iter().enumerate() {
        match row.into_record(n) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!(row = n, "discarding row: {e}");
                discarded += 1;
            }
        }
    }
    if discarded > 0 {
        tracing::warn!(discarded, kept = records.len(), "rows without clue or response discarded");
    }
    if records.is_empty() {
        return Err(ImportError::Empty { discarded });
    }
    tracing::info!(%format, clues = records.len(), "dataset imported");
    Ok(ImportReport {
        format,
        records,
        discarded,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use buzzboard_engine::Round;

    use super::*;

    #[test]
    fn test_detect_by_extension() {
        let tsv_text = "round\tclue_value\tcategory\n";
        assert_eq!(DatasetFormat::detect(&PathBuf::from("a.JSON"), ""), DatasetFormat::Json);
        assert_eq!(DatasetFormat::detect(&PathBuf::from("a.tsv"), ""), DatasetFormat::Tsv);
        assert_eq!(DatasetFormat::detect(&PathBuf::from("a.csv"), tsv_text), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::detect(&PathBuf::from("a.txt"), tsv_text), DatasetFormat::Tsv);
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(
            DatasetFormat::detect_content("id\tcategory\tclue\n"),
            DatasetFormat::Csv
        );
        assert_eq!(
            DatasetFormat::detect_content("round\tcategory\tanswer\tquestion\n"),
            DatasetFormat::Tsv
        );
        assert_eq!(DatasetFormat::detect_content("  [ {} ]"), DatasetFormat::Json);
        assert_eq!(DatasetFormat::detect_content("id,clue\n"), DatasetFormat::Csv);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<DatasetFormat>().unwrap(), DatasetFormat::Json);
        assert_eq!("Tsv".parse::<DatasetFormat>().unwrap(), DatasetFormat::Tsv);
        assert!("xml".parse::<DatasetFormat>().is_err());
        assert_eq!(DatasetFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_empty_import_fails() {
        let err = import_str("id,round,category,value,clue,response\nx,1,A,200,,\n", DatasetFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, ImportError::Empty { discarded: 1 }));
        let err = import_str("", DatasetFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::Empty { discarded: 0 }));
    }

    #[test]
    fn test_csv_defaults() {
        let text = "category,value,clue,response,subject_tags\n  ,\"$1,000\",  A clue  , A response ,geo| history ||\n";
        let report = import_str(text, DatasetFormat::Csv).unwrap();
        let record = &report.records[0];
        assert_eq!(record.id(), "row-0");
        assert_eq!(record.round(), Round::First);
        assert_eq!(record.category(), "UNKNOWN");
        assert_eq!(record.clue(), "A clue");
        assert_eq!(record.response(), "A response");
        assert_eq!(record.value(), 1000);
        assert_eq!(
            record.tags().iter().map(String::as_str).collect::<Vec<_>>(),
            ["geo", "history"]
        );
    }
}
