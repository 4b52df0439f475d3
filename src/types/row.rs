//! Fetched result rows.
//!
//! A row keeps the cursor's shared [`Description`], so its values can be
//! addressed the same ways as the cursor's current row: by position, name,
//! ID, UCD or utype.

use std::sync::Arc;

use super::column::{ColumnDescriptor, Description};
use super::value::Value;

/// One fetched row: values in description order.
#[derive(Debug, Clone)]
pub struct Row {
    /// Index of the row within its result.
    position: usize,
    values: Vec<Value>,
    description: Arc<Description>,
}

impl Row {
    pub fn new(position: usize, values: Vec<Value>, description: Arc<Description>) -> Self {
        Self {
            position,
            values,
            description,
        }
    }

    /// Index of the row within its result.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Value of the column at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    fn value_at(&self, index: Option<usize>) -> Option<&Value> {
        self.values.get(index?)
    }

    /// Value of the first column with this exact name.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.value_at(self.description.find_by_name(name))
    }

    /// Value of the first column with this ID.
    pub fn get_by_id(&self, id: &str) -> Option<&Value> {
        self.value_at(self.description.find_by_id(id))
    }

    /// Value of the first column with this UCD (case-insensitive).
    pub fn get_by_ucd(&self, ucd: &str) -> Option<&Value> {
        self.value_at(self.description.find_by_ucd(ucd))
    }

    /// Value of the first column with this utype (case-insensitive).
    pub fn get_by_utype(&self, utype: &str) -> Option<&Value> {
        self.value_at(self.description.find_by_utype(utype))
    }

    /// Dataset access URL carried by this row, if any.
    pub fn data_url(&self) -> Option<&str> {
        let url = self.value_at(self.description.find_access_url())?.as_str()?.trim();
        (!url.is_empty()).then_some(url)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.description.columns
    }
}

/// Rows compare by their values alone.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
