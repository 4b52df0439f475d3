//! DB-API style cursors over DAL query results
//!
//! A read-only implementation of the Python Database API 2.0 cursor interface
//! for tabular responses of astronomical data-access services. Client code
//! written against the familiar fetch/scroll pattern can walk a VOTable-like
//! result without knowing the service's response format.
//!
//! # Example
//!
//! ```no_run
//! use dal_dbapi::{Cursor, Datatype, FieldDesc, ResultCursor, ResultTable, Result, Value};
//!
//! fn main() -> Result<()> {
//!     // A result as produced by the query layer
//!     let mut table = ResultTable::new(vec![
//!         FieldDesc::new("title", Datatype::Char).with_ucd("VOX:Image_Title"),
//!         FieldDesc::new("url", Datatype::Char).with_ucd("VOX:Image_AccessReference"),
//!     ])?;
//!     table.push_row(vec![
//!         Value::from("Crab Nebula"),
//!         Value::from("https://archive.example.org/crab.fits"),
//!     ])?;
//!
//!     let mut cursor = ResultCursor::new(&table);
//!     println!("{:?}", cursor.description());
//!
//!     // Download the dataset of the first row
//!     let path = cursor.cache_dataset(None)?;
//!     println!("saved {}", path.display());
//!
//!     let rows = cursor.fetch_all()?;
//!     println!("{} rows", rows.len());
//!
//!     cursor.close()?;
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod cursor;
pub mod dataset;
pub mod error;
pub mod result_set;
pub mod types;

/// DB-API level implemented.
pub const API_LEVEL: &str = "2.0";

/// Threads may share the module and connections, but not cursors.
pub const THREAD_SAFETY: u8 = 2;

/// Parameter binding is not applicable.
pub const PARAM_STYLE: &str = "n/a";

// Re-export main types
pub use connection::{connect, Connection};
pub use cursor::{Cursor, CursorIterExt, ResultCursor, Rows, ScrollMode};
pub use dataset::{
    DatasetFetcher, DefaultNaming, FetchParams, FilenamePolicy, HttpFetcher, ImageNaming,
};
pub use error::{Error, ErrorClass, Lookup, Result, Warning};
pub use result_set::{Info, Record, RecordView, ResultSet, ResultTable};
pub use types::{
    ColumnDescriptor, Datatype, Description, FieldDesc, Row, TypeTag, Value, BINARY, DATETIME,
    NUMBER, ROWID, STRING,
};
