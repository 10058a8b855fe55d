//! Flatten nested folders of DICOM files into deterministic,
//! metadata-derived file names.
//!
//! Each file is named after a fixed set of header fields (patient ID,
//! laterality, view, date, ...), joined with `_`. Names that collide are
//! numbered `_1`, `_2`, ... after sorting, and unique names get `_1` too, so
//! the output format is always `<fields>_<n>.dcm`.
//!
//! ```no_run
//! use sortdicom::{SortOptions, Sorter};
//!
//! let options = SortOptions::default().with_output_dir("sorted");
//! let outcome = Sorter::new(options).run("patientA".as_ref())?;
//! for entry in &outcome.renamed {
//!     println!("{} -> {}", entry.source.display(), entry.name);
//! }
//! # Ok::<(), sortdicom::Error>(())
//! ```

pub mod document;
pub mod duplicates;
pub mod error;
pub mod extract;
pub mod identifier;
pub mod logging;
pub mod manifest;
pub mod sorter;
pub mod walk;

pub use document::{MetadataDocument, open_document};
pub use duplicates::{RenameEntry, RenameMap, resolve};
pub use error::{Error, Result};
pub use extract::{FieldMapping, TagExtractor, sanitize};
pub use identifier::{DICOM_EXTENSION, IdentifierBuilder};
pub use manifest::Manifest;
pub use sorter::{SkippedFile, SortOptions, SortOutcome, Sorter, UnreadablePolicy};
