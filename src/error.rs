//! Error types for dbbench-viz operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, charting and writing benchmark results.
#[derive(Error, Debug)]
pub enum Error {
    /// The benchmark input could not be read or parsed. Fatal for the whole run.
    #[error("failed to load records from {path}: {message}")]
    DataLoad {
        /// Input location.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// The input header lacks a required column. Fatal for the whole run.
    #[error("failed to load records from {path}: missing required column '{column}'")]
    MissingColumn {
        /// Input location.
        path: String,
        /// Name of the absent column.
        column: &'static str,
    },

    /// A group reached the renderer without a batch or single chart family.
    #[error("unsupported chart family for operation '{0}'")]
    UnsupportedChartFamily(String),

    /// A chart image could not be written.
    #[error("failed to write artifact for {key} to {}: {source}", path.display())]
    ArtifactWrite {
        /// Group key the artifact belongs to.
        key: String,
        /// Destination path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: Box<Error>,
    },

    /// Two groups in one run map to the same artifact file.
    #[error("artifact for {key} would overwrite the one for {other} at {}", path.display())]
    ArtifactCollision {
        /// Group that was not written.
        key: String,
        /// Earlier group that owns the file.
        other: String,
        /// Shared destination path.
        path: PathBuf,
    },

        /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    Config {
        /// The configuration key with the invalid value.
        key: String,
        /// Why the value is invalid.
        message: String,
    },

    /// Configuration file could not be parsed.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for framebuffer or plot.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Data series have mismatched lengths.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

impl Error {
    /// Whether this error means the input records could not be loaded.
    #[must_use]
    pub fn is_data_load(&self) -> bool {
        matches!(self, Self::DataLoad { .. } | Self::MissingColumn { .. })
    }

    /// Whether this error stems from the configuration.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::ConfigParse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions {
            width: 0,
            height: 100,
        };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_missing_column_is_data_load() {
        let err = Error::MissingColumn {
            path: "metrics.csv".into(),
            column: "ElapsedUs",
        };
        assert!(err.is_data_load());
        assert!(err.to_string().contains("ElapsedUs"));
        assert!(!Error::EmptyData.is_data_load());
    }

    #[test]
    fn test_artifact_write_names_group() {
        let err = Error::ArtifactWrite {
            key: "Athlete/GetAllAsync".into(),
            path: PathBuf::from("out/Athlete_GetAllAsync.png"),
            source: Box::new(Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))),
        };
        let text = err.to_string();
        assert!(text.contains("Athlete/GetAllAsync"));
        assert!(text.contains("Athlete_GetAllAsync.png"));
    }

    #[test]
    fn test_artifact_collision_names_both_groups() {
        let err = Error::ArtifactCollision {
            key: "Team_B/UpdateAsync".into(),
            other: "Team/B/UpdateAsync".into(),
            path: PathBuf::from("out/Team_B_UpdateAsync.png"),
        };
        let text = err.to_string();
        assert!(text.contains("Team_B/UpdateAsync"));
        assert!(text.contains("Team/B/UpdateAsync"));
        assert!(!err.is_data_load());
    }
}
