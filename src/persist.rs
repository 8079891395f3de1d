use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::report::Report;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultFormat {
    /// `word -> wpm` lines
    #[default]
    Text,
    /// the full serialized report
    Json,
}

impl ResultFormat {
    fn extension(self) -> &'static str {
        match self {
            ResultFormat::Text => "txt",
            ResultFormat::Json => "json",
        }
    }
}

/// Durable storage for finished reports
pub trait ResultSink {
    /// Write `report` and return where it went
    fn persist(&self, report: &Report) -> Result<PathBuf>;
}

/// Writes one file per report, named after its finish timestamp
#[derive(Debug, Clone)]
pub struct FileResultSink {
    dir: PathBuf,
    format: ResultFormat,
}

impl FileResultSink {
    pub fn new<P: AsRef<Path>>(dir: P, format: ResultFormat) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            format,
        }
    }

    fn render(&self, report: &Report) -> Result<String> {
        match self.format {
            ResultFormat::Text => Ok(report.to_text()),
            ResultFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| EngineError::io(&self.dir, std::io::Error::other(e))),
        }
    }
}

impl ResultSink for FileResultSink {
    fn persist(&self, report: &Report) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;

        let path = self
            .dir
            .join(format!("{}.{}", report.identifier(), self.format.extension()));
        let contents = self.render(report)?;
        fs::write(&path, contents).map_err(|e| EngineError::io(&path, e))?;

        info!(path = %path.display(), format = %self.format, "result saved");
        Ok(path)
    }
}
