//! Error types for the DAL cursor interface.
//!
//! Every error belongs to one of the DB-API classification classes, reported
//! by [`Error::class`]. All classes except [`ErrorClass::Interface`] are
//! database errors in the DB-API sense.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for cursor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// DB-API error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Misuse of the access layer itself.
    Interface,
    /// Malformed or out-of-range data in a row or column.
    Data,
    /// Failure of the underlying data source beyond caller control.
    Operational,
    /// Inconsistency in the data source's integrity.
    Integrity,
    /// Internal failure of the access layer.
    Internal,
    /// Erroneous request, such as a missing column.
    Programming,
    /// Operation the data model cannot support.
    NotSupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::Interface => "InterfaceError",
            ErrorClass::Data => "DataError",
            ErrorClass::Operational => "OperationalError",
            ErrorClass::Integrity => "IntegrityError",
            ErrorClass::Internal => "InternalError",
            ErrorClass::Programming => "ProgrammingError",
            ErrorClass::NotSupported => "NotSupportedError",
        };
        f.write_str(name)
    }
}

/// How a column was addressed in a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Index,
    Id,
    Name,
    Ucd,
    Utype,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lookup::Index => "index",
            Lookup::Id => "ID",
            Lookup::Name => "name",
            Lookup::Ucd => "UCD",
            Lookup::Utype => "utype",
        };
        f.write_str(name)
    }
}

/// Error type for cursor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading or writing a dataset.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Interface misuse.
    #[error("Interface error: {message}")]
    Interface { message: String },

    /// Data error.
    #[error("Data error: {message}")]
    Data { message: String },

    /// Operational error.
    #[error("Operational error: {message}")]
    Operational { message: String },

    /// Integrity error.
    #[error("Integrity error: {message}")]
    Integrity { message: String },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Programming error.
    #[error("Programming error: {message}")]
    Programming { message: String },

    /// Operation not supported by this data model.
    #[error("Not supported: {operation}")]
    NotSupported { operation: String },

    /// No column matched the lookup key.
    #[error("Column not found by {lookup}: {key}")]
    ColumnNotFound { lookup: Lookup, key: String },

    /// The cursor position does not address a row.
    #[error("No current row at position {position}")]
    NoCurrentRow { position: usize },

    /// A scroll would move the cursor before the first row.
    #[error("Scroll position {position} is out of range")]
    ScrollOutOfRange { position: i64 },

    /// A record lacks a field listed by the result set.
    #[error("Row {row} has no value for field {name}")]
    MissingField { row: usize, name: String },

    /// The current row has no access URL.
    #[error("No access URL available for the current row")]
    NoAccessUrl,

    /// The access URL could not be parsed.
    #[error("Invalid access URL '{url}': {message}")]
    InvalidAccessUrl { url: String, message: String },

    /// The referenced dataset could not be retrieved.
    #[error("Failed to retrieve dataset from {url}: {message}")]
    DatasetRetrieval { url: String, message: String },
}

impl Error {
    /// Create an interface error.
    pub fn interface(message: impl Into<String>) -> Self {
        Self::Interface {
            message: message.into(),
        }
    }

    /// Create a data error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Create an operational error.
    pub fn operational(message: impl Into<String>) -> Self {
        Self::Operational {
            message: message.into(),
        }
    }

    /// Create a programming error.
    pub fn programming(message: impl Into<String>) -> Self {
        Self::Programming {
            message: message.into(),
        }
    }

    /// Create a not-supported error for the named operation.
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// The DB-API class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Interface { .. } => ErrorClass::Interface,
            Error::Data { .. }
            | Error::MissingField { .. }
            | Error::NoAccessUrl
            | Error::InvalidAccessUrl { .. } => ErrorClass::Data,
            Error::Io(_) | Error::Operational { .. } | Error::DatasetRetrieval { .. } => {
                ErrorClass::Operational
            }
            Error::Integrity { .. } => ErrorClass::Integrity,
            Error::Internal { .. } => ErrorClass::Internal,
            Error::Programming { .. }
            | Error::ColumnNotFound { .. }
            | Error::NoCurrentRow { .. }
            | Error::ScrollOutOfRange { .. } => ErrorClass::Programming,
            Error::NotSupported { .. } => ErrorClass::NotSupported,
        }
    }

    /// Whether this error falls under DB-API's `DatabaseError` branch.
    pub fn is_database_error(&self) -> bool {
        self.class() != ErrorClass::Interface
    }
}

/// A non-fatal condition noticed while reading a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Warning: {message}")]
pub struct Warning {
    pub message: String,
}

impl Warning {
    /// Create a warning.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(Error::not_supported("connect").class(), ErrorClass::NotSupported);
        assert_eq!(Error::NoAccessUrl.class(), ErrorClass::Data);
        assert_eq!(
            Error::ColumnNotFound {
                lookup: Lookup::Ucd,
                key: "pos.eq.ra".to_string()
            }
            .class(),
            ErrorClass::Programming
        );
        let io_err = Error::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(io_err.class(), ErrorClass::Operational);
    }

    #[test]
    fn test_database_error_branch() {
        assert!(!Error::interface("misuse").is_database_error());
        assert!(Error::data("bad").is_database_error());
        assert!(Error::not_supported("nextset").is_database_error());
        assert!(Error::Integrity {
            message: "x".to_string()
        }
        .is_database_error());
    }

    #[test]
    fn test_display() {
        let err = Error::ColumnNotFound {
            lookup: Lookup::Name,
            key: "flux".to_string(),
        };
        assert_eq!(err.to_string(), "Column not found by name: flux");
        assert_eq!(ErrorClass::NotSupported.to_string(), "NotSupportedError");
        assert_eq!(Warning::new("truncated").to_string(), "Warning: truncated");
    }
}
