//! End-to-end run: walk, identify, number, copy.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::document::open_document;
use crate::duplicates::{RenameEntry, RenameMap, resolve};
use crate::error::{Error, Result};
use crate::extract::FieldMapping;
use crate::identifier::IdentifierBuilder;
use crate::walk::{collect_dicom_files, copy_dicom_file, ensure_dir};

/// What to do with a file that cannot be opened as DICOM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Stop the whole run at the first unreadable file.
    #[default]
    Abort,
    /// Log the file, record it as skipped, and continue.
    Skip,
}

/// Settings for one sorting run.
#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    /// Destination for renamed copies. `None` is a dry run.
    pub output_dir: Option<PathBuf>,
    /// Semantic fields to use, in order. `None` uses the whole table.
    pub fields: Option<Vec<String>>,
    pub unreadable: UnreadablePolicy,
    /// Open and identify files on the rayon pool.
    pub parallel: bool,
}

impl SortOptions {
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_unreadable(mut self, policy: UnreadablePolicy) -> Self {
        self.unreadable = policy;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// A file left out of the result and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub source: PathBuf,
    pub reason: String,
}

/// Result of [`Sorter::run`].
#[derive(Debug, Clone)]
pub struct SortOutcome {
    /// Canonical root that was walked.
    pub root: PathBuf,
    /// Canonical output directory, if copies were made.
    pub output_dir: Option<PathBuf>,
    /// Fields the names were built from.
    pub fields: Vec<String>,
    /// Source path to final file name, ordered by name.
    pub renamed: RenameMap,
    pub skipped: Vec<SkippedFile>,
}

impl SortOutcome {
    pub fn total_files(&self) -> usize {
        self.renamed.len() + self.skipped.len()
    }
}

/// Flattens a tree of DICOM files into metadata-derived names.
pub struct Sorter<'a> {
    mapping: &'a FieldMapping,
    options: SortOptions,
    progress: Option<ProgressBar>,
}

impl Sorter<'static> {
    /// Sorter over the standard field table.
    pub fn new(options: SortOptions) -> Self {
        Self::with_mapping(FieldMapping::standard(), options)
    }
}

impl<'a> Sorter<'a> {
    pub fn with_mapping(mapping: &'a FieldMapping, options: SortOptions) -> Self {
        Self {
            mapping,
            options,
            progress: None,
        }
    }

    /// Ticks `progress` once per file identified.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    /// Runs the workflow over every `.dcm` file under `root`.
    ///
    /// # Errors
    ///
    /// Fails on unknown field names, on a missing root, on file system
    /// errors, and on unreadable files unless [`UnreadablePolicy::Skip`] is
    /// set. Files copied before a failure stay in the output directory.
    pub fn run(&self, root: &Path) -> Result<SortOutcome> {
        let builder = match &self.options.fields {
            Some(fields) => IdentifierBuilder::with_fields(self.mapping, fields)?,
            None => IdentifierBuilder::new(self.mapping),
        };

        let root = fs::canonicalize(root).map_err(|_| Error::RootNotFound {
            path: root.to_path_buf(),
        })?;

        let output_dir = match &self.options.output_dir {
            Some(dir) => {
                if !dir.exists() {
                    info!(output_dir = %dir.display(), "creating output directory");
                }
                ensure_dir(dir)?;
                let dir = fs::canonicalize(dir).map_err(|source| Error::CreateDir {
                    path: dir.clone(),
                    source,
                })?;
                Some(dir)
            }
            None => None,
        };

        let files = collect_dicom_files(&root, output_dir.as_deref())?;
        info!(root = %root.display(), files = files.len(), "found DICOM files");
        if let Some(pb) = &self.progress {
            pb.set_length(files.len() as u64);
        }

        let (entries, skipped) = if self.options.parallel && files.len() > 1 {
            let results: Vec<_> = files
                .into_par_iter()
                .map(|path| {
                    let result = self.identify(&builder, &path);
                    (path, result)
                })
                .collect();
            self.collect_candidates(results)?
        } else {
            self.collect_candidates(files.into_iter().map(|path| {
                let result = self.identify(&builder, &path);
                (path, result)
            }))?
        };

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        let renamed = resolve(RenameMap::from_entries(entries));
        info!(
            renamed = renamed.len(),
            skipped = skipped.len(),
            "resolved file names"
        );

        match &output_dir {
            Some(dir) => {
                for entry in &renamed {
                    let target = copy_dicom_file(&entry.source, &entry.name, dir)?;
                    debug!(
                        source = %entry.source.display(),
                        target = %target.display(),
                        "copied"
                    );
                }
                info!(output_dir = %dir.display(), copied = renamed.len(), "copy complete");
            }
            None => info!("dry run, no files copied"),
        }

        Ok(SortOutcome {
            root,
            output_dir,
            fields: builder.fields().to_vec(),
            renamed,
            skipped,
        })
    }

    fn identify(&self, builder: &IdentifierBuilder<'_>, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "extracting header data");
        let result = open_document(path).and_then(|document| builder.build(path, &document));
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        result
    }

    /// Splits per-file results into candidates and skipped files, honouring
    /// the unreadable-file policy. Results are consumed in walk order.
    fn collect_candidates<I>(&self, results: I) -> Result<(Vec<RenameEntry>, Vec<SkippedFile>)>
    where
        I: IntoIterator<Item = (PathBuf, Result<String>)>,
    {
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for (source, result) in results {
            match result {
                Ok(name) => {
                    debug!(source = %source.display(), name = %name, "built identifier");
                    entries.push(RenameEntry { source, name });
                }
                Err(err) if self.tolerates(&err) => {
                    warn!(error = %err, "skipping file");
                    skipped.push(SkippedFile {
                        source,
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    error!(source = %source.display(), error = %err, "aborting run");
                    return Err(err);
                }
            }
        }

        Ok((entries, skipped))
    }

    fn tolerates(&self, err: &Error) -> bool {
        match err {
            Error::BlankIdentifier { .. } => true,
            _ => err.is_per_file() && self.options.unreadable == UnreadablePolicy::Skip,
        }
    }
}
