//! JSON audit record of a sorting run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::duplicates::RenameMap;
use crate::error::{Error, Result};
use crate::sorter::{SkippedFile, SortOutcome};

#[derive(Serialize, Debug)]
pub struct ProcessingInfo {
    pub processing_id: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub total_files: usize,
    pub renamed_files: usize,
    pub skipped_files: usize,
}

/// Everything needed to audit or replay a run.
#[derive(Serialize, Debug)]
pub struct Manifest<'a> {
    pub processing_info: ProcessingInfo,
    pub root: &'a Path,
    pub output_dir: Option<&'a Path>,
    pub dry_run: bool,
    pub fields: &'a [String],
    pub renamed: &'a RenameMap,
    pub skipped: &'a [SkippedFile],
}

impl<'a> Manifest<'a> {
    pub fn new(outcome: &'a SortOutcome) -> Self {
        Self {
            processing_info: ProcessingInfo {
                processing_id: Uuid::new_v4().to_string(),
                timestamp: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                total_files: outcome.total_files(),
                renamed_files: outcome.renamed.len(),
                skipped_files: outcome.skipped.len(),
            },
            root: &outcome.root,
            output_dir: outcome.output_dir.as_deref(),
            dry_run: outcome.output_dir.is_none(),
            fields: &outcome.fields,
            renamed: &outcome.renamed,
            skipped: &outcome.skipped,
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Writes the manifest to `path`.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<PathBuf> {
        let json = self.to_json(pretty).map_err(|source| Error::ManifestSerialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| Error::ManifestWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(path.to_path_buf())
    }
}
