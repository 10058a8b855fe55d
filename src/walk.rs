//! Finding DICOM files under a root and copying them out.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::identifier::DICOM_EXTENSION;

/// Recursively collects `.dcm` files under `root`.
///
/// Entries are visited in file-name order within each directory so repeated
/// walks of the same tree yield the same sequence. Anything under `exclude`
/// is skipped, provided `exclude` lies strictly inside `root`; an `exclude`
/// equal to or above `root` is ignored.
pub fn collect_dicom_files(root: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let exclude = exclude.filter(|excluded| *excluded != root && excluded.starts_with(root));
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| exclude.is_none_or(|excluded| !entry.path().starts_with(excluded)));

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && has_dicom_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "collected DICOM files");
    Ok(files)
}

fn has_dicom_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DICOM_EXTENSION))
}

/// Copies `source` into `target_dir` as `name`, replacing any existing file.
pub fn copy_dicom_file(source: &Path, name: &str, target_dir: &Path) -> Result<PathBuf> {
    let target = target_dir.join(name);
    fs::copy(source, &target).map_err(|err| Error::Copy {
        from: source.to_path_buf(),
        to: target.clone(),
        source: err,
    })?;
    Ok(target)
}

/// Creates `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
