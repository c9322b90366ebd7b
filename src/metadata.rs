use serde::{Deserialize, Serialize};

use crate::error::{CcError, Result};

pub const DEFAULT_SEPARATOR: char = ';';

/// Title and description of a video in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub language: String,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            language: language.into(),
        }
    }
}

/// How many atomic strings each packed field contributed, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    counts: Vec<usize>,
}

impl FieldLayout {
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Length of the flat batch this layout describes.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Flat list of translatable strings plus the layout needed to unpack it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBatch {
    pub texts: Vec<String>,
    pub layout: FieldLayout,
}

/// Splits composite metadata fields on a reserved separator.
///
/// The separator is consumed: `join` does not put it back, so a packed
/// field comes back as the concatenation of its translated parts. Callers
/// must keep the separator out of metadata content.
#[derive(Debug, Clone, Copy)]
pub struct FieldPacker {
    separator: char,
}

impl Default for FieldPacker {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl FieldPacker {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn split(&self, composite: &str) -> Vec<String> {
        composite.split(self.separator).map(str::to_string).collect()
    }

    pub fn join(&self, parts: &[String]) -> String {
        parts.concat()
    }

    pub fn pack_fields<S: AsRef<str>>(&self, fields: &[S]) -> FieldBatch {
        let mut texts = Vec::new();
        let mut counts = Vec::with_capacity(fields.len());

        for field in fields {
            let parts = self.split(field.as_ref());
            counts.push(parts.len());
            texts.extend(parts);
        }

        FieldBatch {
            texts,
            layout: FieldLayout { counts },
        }
    }

    /// Slice a translated flat batch back into one string per field.
    pub fn unpack_fields(&self, layout: &FieldLayout, translated: &[String]) -> Result<Vec<String>> {
        let expected = layout.total();
        if translated.len() != expected {
            return Err(CcError::BatchSizeMismatch {
                expected,
                actual: translated.len(),
            });
        }

        let mut fields = Vec::with_capacity(layout.counts.len());
        let mut offset = 0;
        for &count in &layout.counts {
            fields.push(self.join(&translated[offset..offset + count]));
            offset += count;
        }
        Ok(fields)
    }
}
