//! Boundary with the query layer that produces results.
//!
//! A cursor needs four things from a result: ordered field names, per-field
//! metadata, a row count, and positional access to name-keyed records. Any
//! parsed response implementing [`ResultSet`] can be walked by a cursor.
//! [`ResultTable`] is an in-memory implementation.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Lookup, Result};
use crate::types::{ColumnDescriptor, Description, FieldDesc, Value};

/// A tabular query result, owned by the query layer.
pub trait ResultSet {
    /// Field names in column order.
    fn field_names(&self) -> Vec<&str>;

    /// Metadata for the named field.
    fn field_desc(&self, name: &str) -> Option<&FieldDesc>;

    /// Total number of rows.
    fn size(&self) -> usize;

    /// The record at `index`, or `None` past the end.
    fn record(&self, index: usize) -> Option<&Record>;

    /// INFO elements attached to the response.
    fn infos(&self) -> &[Info] {
        &[]
    }
}

/// Name-keyed values of one result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set the value of a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A name/value INFO element of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub name: String,
    pub value: String,
}

impl Info {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A record seen through a cursor's description.
///
/// Lookups address columns the way the description orders them; the first
/// matching column wins.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    description: &'a Description,
    record: &'a Record,
    position: usize,
}

impl<'a> RecordView<'a> {
    pub fn new(description: &'a Description, record: &'a Record, position: usize) -> Self {
        Self {
            description,
            record,
            position,
        }
    }

    /// Row index of the record within its result.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn description(&self) -> &'a Description {
        self.description
    }

    fn value_at(&self, index: Option<usize>) -> Option<&'a Value> {
        let column: &'a ColumnDescriptor = self.description.get(index?)?;
        self.record.get(&column.name)
    }

    /// Value of the column at `index`.
    ///
    /// `ColumnNotFound` for an index outside the description, `MissingField`
    /// for a described column the record lacks.
    pub fn require(&self, index: usize) -> Result<&'a Value> {
        let column = self.description.get(index).ok_or_else(|| Error::ColumnNotFound {
            lookup: Lookup::Index,
            key: index.to_string(),
        })?;
        self.record
            .get(&column.name)
            .ok_or_else(|| Error::MissingField {
                row: self.position,
                name: column.name.clone(),
            })
    }

    /// Value of the column at `index`.
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.value_at(Some(index))
    }

    pub fn by_id(&self, id: &str) -> Option<&'a Value> {
        self.value_at(self.description.find_by_id(id))
    }

    pub fn by_name(&self, name: &str) -> Option<&'a Value> {
        self.value_at(self.description.find_by_name(name))
    }

    pub fn by_ucd(&self, ucd: &str) -> Option<&'a Value> {
        self.value_at(self.description.find_by_ucd(ucd))
    }

    pub fn by_utype(&self, utype: &str) -> Option<&'a Value> {
        self.value_at(self.description.find_by_utype(utype))
    }

    /// Value of the first column whose utype ends with `suffix`.
    pub fn by_utype_suffix(&self, suffix: &str) -> Option<&'a Value> {
        let index = self
            .description
            .columns
            .iter()
            .position(|c| c.field.utype_ends_with(suffix));
        self.value_at(index)
    }

    /// Value of the access-URL column.
    pub fn access_url(&self) -> Option<&'a Value> {
        self.value_at(self.description.find_access_url())
    }
}

/// In-memory result set.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    fields: Vec<FieldDesc>,
    records: Vec<Record>,
    infos: Vec<Info>,
}

impl ResultTable {
    /// Create an empty table with the given fields.
    ///
    /// Field names must be unique.
    pub fn new(fields: Vec<FieldDesc>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::data(format!("duplicate field name: {}", field.name)));
            }
        }
        Ok(Self {
            fields,
            records: Vec::new(),
            infos: Vec::new(),
        })
    }

    /// Append a row given its values in field order.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.fields.len() {
            return Err(Error::data(format!(
                "row has {} values, table has {} fields",
                values.len(),
                self.fields.len()
            )));
        }
        let record = self
            .fields
            .iter()
            .map(|f| f.name.clone())
            .zip(values)
            .collect();
        self.records.push(record);
        Ok(())
    }

    /// Append an already-built record.
    pub fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Attach an INFO element.
    pub fn with_info(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.infos.push(Info::new(name, value));
        self
    }

    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }
}

impl ResultSet for ResultTable {
    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn field_desc(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn size(&self) -> usize {
        self.records.len()
    }

    fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    fn infos(&self) -> &[Info] {
        &self.infos
    }
}
