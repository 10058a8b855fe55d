//! Builds a filename from the semantic fields of one document.

use std::path::Path;

use crate::document::MetadataDocument;
use crate::error::{Error, Result};
use crate::extract::{FieldMapping, TagExtractor};

/// Extension appended to every generated name.
pub const DICOM_EXTENSION: &str = "dcm";

const SEPARATOR: &str = "_";

/// Joins extracted field values into `<v1>_<v2>_..._<vn>.dcm`.
#[derive(Debug, Clone)]
pub struct IdentifierBuilder<'a> {
    extractor: TagExtractor<'a>,
    fields: Vec<String>,
}

impl<'a> IdentifierBuilder<'a> {
    /// Uses every field of `mapping`, in registration order.
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self {
            extractor: TagExtractor::new(mapping),
            fields: mapping.names().map(str::to_string).collect(),
        }
    }

    /// Uses only `fields`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for the first name missing from
    /// `mapping`.
    pub fn with_fields<I, S>(mapping: &'a FieldMapping, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                if mapping.contains(name) {
                    Ok(name.to_string())
                } else {
                    Err(Error::UnknownField {
                        name: name.to_string(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extractor: TagExtractor::new(mapping),
            fields,
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Builds the identifier for the document read from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankIdentifier`] when no field has a value.
    pub fn build<D>(&self, source: &Path, document: &D) -> Result<String>
    where
        D: MetadataDocument + ?Sized,
    {
        let mut parts = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = self.extractor.extract(document, field)?;
            if !value.is_empty() {
                parts.push(value);
            }
        }

        if parts.is_empty() {
            return Err(Error::BlankIdentifier {
                path: source.to_path_buf(),
            });
        }

        Ok(format!("{}.{DICOM_EXTENSION}", parts.join(SEPARATOR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::FakeDocument;
    use dicom_dictionary_std::tags;

    fn mammogram() -> FakeDocument {
        FakeDocument::default()
            .with(tags::PATIENT_ID, "TCGA-AO-A0JB")
            .with(tags::LATERALITY, "L")
            .with(tags::VIEW_POSITION, "MLO")
            .with(tags::ACQUISITION_DATE, "20010607")
    }

    #[test]
    fn test_build_default_fields() {
        let builder = IdentifierBuilder::new(FieldMapping::standard());
        let doc = mammogram().with(tags::MODALITY, "MG");
        let uid = builder.build(Path::new("000000.dcm"), &doc).unwrap();
        assert_eq!(uid, "TCGA-AO-A0JB_L_MLO_20010607_MG.dcm");
    }

    #[test]
    fn test_build_selected_fields_in_given_order() {
        let builder = IdentifierBuilder::with_fields(
            FieldMapping::standard(),
            ["view", "patient-id"],
        )
        .unwrap();
        let uid = builder.build(Path::new("a.dcm"), &mammogram()).unwrap();
        assert_eq!(uid, "MLO_TCGA-AO-A0JB.dcm");
    }

    #[test]
    fn test_build_skips_missing_field_without_extra_separator() {
        let builder = IdentifierBuilder::with_fields(
            FieldMapping::standard(),
            ["patient-id", "view", "modality"],
        )
        .unwrap();
        let doc = FakeDocument::default().with(tags::PATIENT_ID, "P1");
        let uid = builder.build(Path::new("a.dcm"), &doc).unwrap();
        assert_eq!(uid, "P1.dcm");

        let doc = FakeDocument::default().with(tags::VIEW_POSITION, "CC");
        let uid = builder.build(Path::new("a.dcm"), &doc).unwrap();
        assert_eq!(uid, "CC.dcm");
        assert!(!uid.contains("__"));
    }

    #[test]
    fn test_build_blank_identifier() {
        let builder = IdentifierBuilder::new(FieldMapping::standard());
        let result = builder.build(Path::new("blank.dcm"), &FakeDocument::default());
        match result {
            Err(Error::BlankIdentifier { path }) => assert_eq!(path, Path::new("blank.dcm")),
            other => panic!("expected BlankIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn test_with_fields_rejects_unknown() {
        let result = IdentifierBuilder::with_fields(FieldMapping::standard(), ["view", "mrn"]);
        assert!(matches!(
            result,
            Err(Error::UnknownField { ref name }) if name == "mrn"
        ));
    }
}
