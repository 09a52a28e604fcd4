//! Field projection lists and nested document lookup
//!
//! A projection is an ordered list of field paths, possibly dotted for
//! nested access ("user.location.city"). It is carried between lifecycle
//! phases as a comma-joined string (see `job_context`), parsed once per
//! reader, and consumed when translating documents into records.

use crate::searchstream::record::FieldValue;
use crate::searchstream::schema::Schema;
use std::collections::HashMap;
use std::fmt;

/// An ordered list of projected field paths
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProjection {
    paths: Vec<String>,
}

impl FieldProjection {
    /// Parse the comma-joined projection string form
    ///
    /// Empty input yields an empty projection (natural full read).
    pub fn parse(projection: &str) -> Self {
        let paths = projection
            .split(',')
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .map(|path| path.to_string())
            .collect();
        Self { paths }
    }

    /// Build a projection from an explicit field path list
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive a projection from a store's declared schema
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            paths: schema
                .fields
                .iter()
                .map(|field| field.name.clone())
                .collect(),
        }
    }

    /// The comma-joined string form carried through the side channel
    pub fn as_projection_string(&self) -> String {
        self.paths.join(",")
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl fmt::Display for FieldProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.as_projection_string())
    }
}

/// Walk a dotted path through a nested document
///
/// Each segment descends through map-shaped values. The walk stops at the
/// first missing segment or non-map intermediate and reports the value as
/// absent; callers decide what an unset slot means.
pub fn lookup_path<'a>(
    document: &'a HashMap<String, FieldValue>,
    path: &str,
) -> Option<&'a FieldValue> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = document.get(first)?;

    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}
