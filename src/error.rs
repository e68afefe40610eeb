//! Error types for PlotDrop.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for PlotDrop operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors that can occur while loading data, binding columns or exporting plots.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The dropped file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contained no non-blank lines.
    #[error("{} is empty", path.display())]
    EmptyFile { path: PathBuf },

    /// A data row does not have as many cells as the header.
    #[error("{}: line {line} has {found} cells, header has {expected}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A column index outside the dataset was requested.
    #[error("Column {column} out of range (dataset has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// The backend produced no usable pixels for the plot region.
    #[error("Screenshot unavailable for this plot")]
    CaptureUnavailable,

    /// The OS clipboard refused one of the export steps.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// PNG encoding or saving failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl PlotError {
    /// Create a FileUnreadable error.
    pub fn file_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Create a Clipboard error from any displayable backend error.
    pub fn clipboard(err: impl std::fmt::Display) -> Self {
        Self::Clipboard(err.to_string())
    }
}

impl From<arboard::Error> for PlotError {
    fn from(err: arboard::Error) -> Self {
        Self::Clipboard(err.to_string())
    }
}

impl From<toml::de::Error> for PlotError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
