//! ColumnDescriptor and Description types for user-facing API.
//!
//! A `Description` is computed once per cursor from the wrapped result set's
//! field metadata and never recomputed.

use tracing::debug;

use crate::result_set::ResultSet;

use super::datatype::Datatype;
use super::field::FieldDesc;
use super::type_tag::TypeTag;

/// A column of a result (name and type code).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Column type code.
    pub type_code: TypeTag,
    /// Field metadata the type code was derived from.
    pub field: FieldDesc,
}

impl ColumnDescriptor {
    /// Create a column descriptor from field metadata.
    pub fn from_field(field: FieldDesc) -> Self {
        Self {
            name: field.name.clone(),
            type_code: field.datatype.type_tag(),
            field,
        }
    }

    /// The DB-API `(name, type_code)` pair.
    pub fn as_pair(&self) -> (&str, TypeTag) {
        (&self.name, self.type_code)
    }
}

/// Ordered column descriptors for a result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    /// Column descriptors, in field order.
    pub columns: Vec<ColumnDescriptor>,
}

impl Description {
    /// Create a description from column descriptors.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Describe every field of a result set, preserving field order.
    ///
    /// A field without metadata is described as `STRING`.
    pub fn from_result_set<R: ResultSet + ?Sized>(results: &R) -> Self {
        let columns = results
            .field_names()
            .into_iter()
            .map(|name| match results.field_desc(name) {
                Some(field) => ColumnDescriptor::from_field(field.clone()),
                None => {
                    debug!(field = name, "no metadata for field, describing as STRING");
                    ColumnDescriptor::from_field(FieldDesc::new(
                        name,
                        Datatype::Other(String::new()),
                    ))
                }
            })
            .collect();
        Self { columns }
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// `(name, type_code)` pairs in column order.
    pub fn pairs(&self) -> Vec<(&str, TypeTag)> {
        self.columns.iter().map(ColumnDescriptor::as_pair).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index.
    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Index of the first column with this exact name.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of the first column with this ID.
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.field.id.as_deref() == Some(id))
    }

    /// Index of the first column with this UCD (case-insensitive).
    pub fn find_by_ucd(&self, ucd: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field.has_ucd(ucd))
    }

    /// Index of the first column with this utype (case-insensitive).
    pub fn find_by_utype(&self, utype: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field.has_utype(utype))
    }

    /// Index of the first column carrying a dataset access URL.
    pub fn find_access_url(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.field.is_access_url())
    }
}
