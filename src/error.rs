//! Error types for DICOM sorting.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting identifiers and reorganizing files.
#[derive(Debug, Error)]
pub enum Error {
    // === Caller errors ===
    /// Semantic field name not present in the field mapping.
    #[error("unknown field '{name}', use --list-fields to see the valid names")]
    UnknownField { name: String },

    // === Per-file errors ===
    /// None of the requested fields yielded a value for this file.
    #[error("no header metadata found for DICOM file: {}", path.display())]
    BlankIdentifier { path: PathBuf },

    /// DICOM file does not exist.
    #[error("DICOM file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// File exists but could not be decoded as DICOM.
    #[error("invalid DICOM file {}: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: dicom_object::ReadError,
    },

    // === File system errors ===
    /// Root directory is missing or not a directory.
    #[error("input directory does not exist: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// Directory traversal failed.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a source file into the output directory failed.
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest could not be serialized to JSON.
    #[error("failed to serialize manifest {}: {source}", path.display())]
    ManifestSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Manifest file could not be written.
    #[error("failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether the batch may continue after this error when unreadable files
    /// are tolerated.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::BlankIdentifier { .. } | Error::FileNotFound { .. } | Error::InvalidDocument { .. }
        )
    }
}

/// Result alias for sorting operations.
pub type Result<T> = std::result::Result<T, Error>;
