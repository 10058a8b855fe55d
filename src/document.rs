//! Loading DICOM files and looking up raw attribute values.

use std::path::Path;

use dicom_core::Tag;
use dicom_core::dictionary::DataDictionary;
use dicom_dictionary_std::tags;
use dicom_object::{DefaultDicomObject, FileDicomObject, InMemDicomObject, OpenFileOptions};
use tracing::debug;

use crate::error::{Error, Result};

/// A decoded metadata set that can be queried by DICOM tag.
pub trait MetadataDocument {
    /// Returns the stringified value of `tag`, or `None` when the attribute
    /// is absent or has no textual representation.
    fn lookup(&self, tag: Tag) -> Option<String>;
}

impl<D> MetadataDocument for InMemDicomObject<D>
where
    D: DataDictionary + Clone,
{
    fn lookup(&self, tag: Tag) -> Option<String> {
        self.element_opt(tag)
            .ok()
            .flatten()
            .and_then(|elem| elem.to_str().ok())
            .map(|value| value.into_owned())
    }
}

impl<O> MetadataDocument for FileDicomObject<O>
where
    O: MetadataDocument,
{
    fn lookup(&self, tag: Tag) -> Option<String> {
        (**self).lookup(tag)
    }
}

/// Opens a DICOM file, reading the data set up to (not including) Pixel Data.
pub fn open_document(path: &Path) -> Result<DefaultDicomObject> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "opening DICOM file");
    OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(path)
        .map_err(|source| Error::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use tempfile::TempDir;

    #[test]
    fn test_lookup_present_and_absent() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            tags::PATIENT_ID,
            VR::LO,
            PrimitiveValue::from("TCGA-AO-A0JB"),
        ));

        assert_eq!(
            obj.lookup(tags::PATIENT_ID).as_deref(),
            Some("TCGA-AO-A0JB")
        );
        assert_eq!(obj.lookup(tags::VIEW_POSITION), None);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = open_document(&dir.path().join("missing.dcm"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_open_garbage_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dummyfile.dcm");
        std::fs::write(&path, "subject,laterality\nA,L\n").unwrap();

        let result = open_document(&path);
        assert!(matches!(result, Err(Error::InvalidDocument { .. })));
    }
}
