//! Connection entry point.
//!
//! DAL services answer one-shot queries; there is no session to connect to.
//! Cursors are created directly over a query's result (see
//! [`ResultCursor::new`](crate::ResultCursor::new)).

use crate::error::{Error, Result};

/// A database connection.
///
/// This type has no values: connections are not supported.
#[derive(Debug)]
pub enum Connection {}

/// Open a connection to `source`.
///
/// Always fails with [`Error::NotSupported`].
pub fn connect(_source: &str) -> Result<Connection> {
    Err(Error::not_supported("connect"))
}
