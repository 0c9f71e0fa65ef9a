//! Where finished exams go.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::LoadError;
use crate::models::ExamResult;

/// Receives each finished exam once. Delivery is fire-and-forget: a sink
/// logs its own failures and never reports them back to the exam.
pub trait ResultsSink {
    fn record(&mut self, result: &ExamResult);
}

/// Appends one JSON object per line to a history file.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, result: &ExamResult) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(result)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl ResultsSink for HistoryFile {
    fn record(&mut self, result: &ExamResult) {
        match self.append(result) {
            Ok(()) => info!(
                path = %self.path.display(),
                session = %result.session_id,
                score = result.score,
                "exam result saved"
            ),
            Err(err) => warn!(
                path = %self.path.display(),
                session = %result.session_id,
                error = %err,
                "failed to save exam result"
            ),
        }
    }
}

/// Keeps results in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    results: Vec<ExamResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[ExamResult] {
        &self.results
    }
}

impl ResultsSink for MemorySink {
    fn record(&mut self, result: &ExamResult) {
        self.results.push(result.clone());
    }
}

impl<S: ResultsSink + ?Sized> ResultsSink for Box<S> {
    fn record(&mut self, result: &ExamResult) {
        (**self).record(result);
    }
}

/// Read a history file written by [`HistoryFile`]. A missing file is an
/// empty history; blank lines are skipped.
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<Vec<ExamResult>, LoadError> {
    let path = path.as_ref();
    let io_error = |source: io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_error(err)),
    };

    let mut results = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let result = serde_json::from_str(&line).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        results.push(result);
    }
    Ok(results)
}
