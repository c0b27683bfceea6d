//! Field metadata for aggregates.
//!
//! Each field of an [`Aggregate`] is described by a [`FieldDef`]: its Rust
//! identifier and an optional annotation of the form
//! `"<name>[,required][,omitifempty]"`. [`TagTable`] turns those definitions
//! into a lookup from external name to field, and [`resolve`] caches one
//! table per aggregate type for the life of the process.
//!
//! The table is shared and never mutated. Each decode takes a [`Checkout`]
//! that tracks which fields it has seen.
mod cache;

use std::{collections::HashMap, sync::Arc};

use fixedbitset::FixedBitSet;
use thiserror::Error;

pub use cache::resolve;

#[cfg(doc)]
use crate::Aggregate;

/// Static description of one aggregate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    ident: &'static str,
    annotation: Option<&'static str>,
}

impl FieldDef {
    /// Describes the field `ident` with an optional annotation.
    #[must_use]
    pub const fn new(ident: &'static str, annotation: Option<&'static str>) -> Self {
        Self { ident, annotation }
    }

    /// The Rust field name.
    #[must_use]
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The raw `#[json = "..."]` annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&'static str> {
        self.annotation
    }
}

/// Resolved metadata of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    index: usize,
    ident: &'static str,
    name: Box<str>,
    required: bool,
    omit_if_empty: bool,
}

impl FieldTag {
    /// Position of the field in [`Aggregate::FIELDS`].
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The Rust field name.
    #[must_use]
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The name the field has in the document.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set by the `required` modifier.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Set by the `omitifempty` modifier. The decoder ignores it; it is kept
    /// for encoders that share the same annotations.
    #[must_use]
    pub fn omit_if_empty(&self) -> bool {
        self.omit_if_empty
    }
}

/// An annotation or field set that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A modifier other than `required` or `omitifempty`.
    #[error("illegal tag value `{value}` on field `{field}`")]
    IllegalTagValue {
        /// The Rust field carrying the annotation.
        field: &'static str,
        /// The rejected segment.
        value: String,
    },
    /// Two fields resolve to the same external name.
    #[error("fields `{first}` and `{second}` both use the name `{name}`")]
    DuplicateName {
        /// The shared external name.
        name: String,
        /// The field declared first.
        first: &'static str,
        /// The field declared second.
        second: &'static str,
    },
}

/// Parses one field's annotation.
///
/// Segments are separated by `,` and trimmed of spaces, tabs, CR and LF.
/// A non-empty first segment is the external name; otherwise the name is
/// derived from `ident` with [`to_snake_case`]. Later segments must be
/// `required`, `omitifempty` or empty.
///
/// # Errors
///
/// Returns [`TagError::IllegalTagValue`] for any other modifier.
pub fn parse_field(index: usize, def: &FieldDef) -> Result<FieldTag, TagError> {
    let ident = def.ident.strip_prefix("r#").unwrap_or(def.ident);
    let mut tag = FieldTag {
        index,
        ident: def.ident,
        name: to_snake_case(ident).into_boxed_str(),
        required: false,
        omit_if_empty: false,
    };
    let Some(annotation) = def.annotation else {
        return Ok(tag);
    };

    let trim = |s: &'static str| s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'));
    let mut segments = annotation.split(',').map(trim);
    if let Some(name) = segments.next().filter(|name| !name.is_empty()) {
        tag.name = name.into();
    }
    for modifier in segments {
        match modifier {
            "required" => tag.required = true,
            "omitifempty" => tag.omit_if_empty = true,
            "" => {}
            other => {
                return Err(TagError::IllegalTagValue {
                    field: def.ident,
                    value: other.to_owned(),
                });
            }
        }
    }
    Ok(tag)
}

/// Converts an identifier to snake case.
///
/// Every ASCII uppercase letter after the first character is preceded by
/// `_` and lowercased. Everything else passes through, so digits stay
/// attached: `StreetAddress1` becomes `street_address1`.
#[must_use]
pub fn to_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Name-to-field lookup for one aggregate type.
#[derive(Debug)]
pub struct TagTable {
    fields: Vec<FieldTag>,
    by_name: HashMap<Box<str>, usize>,
    custom_decode: bool,
    validates: bool,
}

impl TagTable {
    /// Builds a table from field definitions.
    ///
    /// # Errors
    ///
    /// Fails on an illegal modifier or when two fields share a name.
    pub fn build(
        defs: &[FieldDef],
        custom_decode: bool,
        validates: bool,
    ) -> Result<Self, TagError> {
        let mut fields: Vec<FieldTag> = Vec::with_capacity(defs.len());
        let mut by_name: HashMap<Box<str>, usize> = HashMap::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            let tag = parse_field(index, def)?;
            if let Some(&first) = by_name.get(&tag.name) {
                let first = &fields[first];
                return Err(TagError::DuplicateName {
                    name: tag.name.into(),
                    first: first.ident,
                    second: tag.ident,
                });
            }
            by_name.insert(tag.name.clone(), index);
            fields.push(tag);
        }
        Ok(Self {
            fields,
            by_name,
            custom_decode,
            validates,
        })
    }

    /// Looks a field up by its external name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldTag> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldTag] {
        &self.fields
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the aggregate has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the aggregate decodes its own raw span.
    #[must_use]
    pub fn custom_decode(&self) -> bool {
        self.custom_decode
    }

    /// Whether the aggregate checks itself after its fields are decoded.
    #[must_use]
    pub fn validates(&self) -> bool {
        self.validates
    }

    /// Starts a decode with every field unseen.
    #[must_use]
    pub fn checkout(self: &Arc<Self>) -> Checkout {
        Checkout {
            table: Arc::clone(self),
            seen: FixedBitSet::with_capacity(self.fields.len()),
        }
    }
}

/// Per-decode view of a [`TagTable`] with its own seen flags.
#[derive(Debug)]
pub struct Checkout {
    table: Arc<TagTable>,
    seen: FixedBitSet,
}

impl Checkout {
    /// Index of the field called `name` in the document.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.table.by_name.get(name).copied()
    }

    /// Records that the field at `index` was present.
    pub fn mark_seen(&mut self, index: usize) {
        self.seen.insert(index);
    }

    /// Whether the field at `index` was present.
    #[must_use]
    pub fn is_seen(&self, index: usize) -> bool {
        self.seen.contains(index)
    }

    /// The first required field, in declaration order, that was not seen.
    #[must_use]
    pub fn first_missing(&self) -> Option<&FieldTag> {
        self.table
            .fields
            .iter()
            .find(|tag| tag.required && !self.seen.contains(tag.index))
    }

    /// The shared table this checkout reads.
    #[must_use]
    pub fn table(&self) -> &TagTable {
        &self.table
    }
}
