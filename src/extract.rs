//! Semantic field table and tag extraction.
//!
//! A semantic field such as `laterality` is backed by one or more DICOM tags
//! listed in precedence order. Extraction returns the first non-empty value,
//! sanitized so it can be embedded in a filename.

use std::sync::LazyLock;

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use tracing::{debug, trace};

use crate::document::MetadataDocument;
use crate::error::{Error, Result};

/// Fields of the standard table, in registration order.
const STANDARD_FIELDS: &[(&str, &[Tag])] = &[
    ("patient-id", &[tags::PATIENT_ID]),
    ("laterality", &[tags::LATERALITY, tags::IMAGE_LATERALITY]),
    ("view", &[tags::VIEW_POSITION]),
    ("acquisition-date", &[tags::ACQUISITION_DATE, tags::STUDY_DATE]),
    (
        "sequence-description",
        &[tags::SERIES_DESCRIPTION, tags::STUDY_DESCRIPTION],
    ),
    ("modality", &[tags::MODALITY]),
];

static STANDARD: LazyLock<FieldMapping> = LazyLock::new(|| {
    let mut builder = FieldMapping::builder();
    for (name, field_tags) in STANDARD_FIELDS {
        builder = builder.field(name, field_tags.iter().copied());
    }
    builder.build()
});

/// One semantic field and the tags that may supply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub tags: Vec<Tag>,
}

/// Formats a tag as `(GGGG,EEEE)`.
pub fn format_tag(tag: Tag) -> String {
    format!("({:04X},{:04X})", tag.group(), tag.element())
}

/// Ordered table from semantic field name to candidate tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<FieldEntry>,
}

impl FieldMapping {
    /// The built-in table, constructed once per process.
    pub fn standard() -> &'static FieldMapping {
        &STANDARD
    }

    pub fn builder() -> FieldMappingBuilder {
        FieldMappingBuilder::default()
    }

    /// Tags bound to `name`, matched case-insensitively.
    pub fn tags_for(&self, name: &str) -> Option<&[Tag]> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.tags.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags_for(name).is_some()
    }

    /// Field names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for alternate field tables.
#[derive(Debug, Default)]
pub struct FieldMappingBuilder {
    entries: Vec<FieldEntry>,
}

impl FieldMappingBuilder {
    /// Registers a field. Re-registering a name replaces its tags but keeps
    /// its original position.
    #[must_use]
    pub fn field(mut self, name: &str, field_tags: impl IntoIterator<Item = Tag>) -> Self {
        let name = name.to_ascii_lowercase();
        let field_tags: Vec<Tag> = field_tags.into_iter().collect();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.tags = field_tags,
            None => self.entries.push(FieldEntry {
                name,
                tags: field_tags,
            }),
        }
        self
    }

    pub fn build(self) -> FieldMapping {
        FieldMapping {
            entries: self.entries,
        }
    }
}

/// Looks up semantic fields in a document using a field table.
#[derive(Debug, Clone, Copy)]
pub struct TagExtractor<'a> {
    mapping: &'a FieldMapping,
}

impl Default for TagExtractor<'static> {
    fn default() -> Self {
        Self::new(FieldMapping::standard())
    }
}

impl<'a> TagExtractor<'a> {
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &'a FieldMapping {
        self.mapping
    }

    /// Returns the sanitized value for `field`, or an empty string if none of
    /// its tags carry a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if `field` is not in the table.
    pub fn extract<D>(&self, document: &D, field: &str) -> Result<String>
    where
        D: MetadataDocument + ?Sized,
    {
        let candidates = self
            .mapping
            .tags_for(field)
            .ok_or_else(|| Error::UnknownField {
                name: field.to_string(),
            })?;

        let value = candidates.iter().find_map(|&tag| match document.lookup(tag) {
            Some(raw) => {
                let cleaned = sanitize(raw.trim_end_matches([' ', '\0']));
                if cleaned.is_empty() {
                    debug!(field, tag = %format_tag(tag), "tag present but empty");
                    None
                } else {
                    trace!(field, tag = %format_tag(tag), value = %cleaned, "found tag");
                    Some(cleaned)
                }
            }
            None => {
                debug!(field, tag = %format_tag(tag), "tag not found, trying next");
                None
            }
        });

        Ok(value.unwrap_or_default())
    }
}

/// Makes a header value safe for use in a filename.
///
/// Whitespace and `/` become `_`, `( ) * & $` are dropped, `:` becomes `.`.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter_map(|c| match c {
            '(' | ')' | '*' | '&' | '$' => None,
            '/' => Some('_'),
            ':' => Some('.'),
            c if c.is_whitespace() => Some('_'),
            c => Some(c),
        })
        .collect()
}
