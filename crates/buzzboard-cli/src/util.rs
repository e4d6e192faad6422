use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use buzzboard_engine::Summary;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::Stdout {
                writer: io::stdout().lock(),
            }),
        }
    }

    fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;
    Ok(value)
}

/// A summary as written to disk.
#[derive(Debug, Serialize)]
struct SavedSummary<'a> {
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    summary: &'a Summary,
}

fn summary_file_name(timestamp: DateTime<Utc>) -> String {
    format!("summary_{}.json", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Writes `summary` into `dir` under a timestamped name and returns its path.
pub fn save_summary(summary: &Summary, dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let saved_at = Utc::now();
    let path = dir.join(summary_file_name(saved_at));
    let mut output = Output::create(path.clone())?;
    output.write_json(&SavedSummary { saved_at, summary })?;
    tracing::info!(path = %path.display(), "summary saved");
    Ok(path)
}
