//! Column types, field metadata and values of query results.

mod column;
mod datatype;
mod field;
mod row;
mod type_tag;
mod value;

pub use column::{ColumnDescriptor, Description};
pub use datatype::Datatype;
pub use field::FieldDesc;
pub use row::Row;
pub use type_tag::{TypeTag, BINARY, DATETIME, NUMBER, ROWID, STRING};
pub use value::Value;
