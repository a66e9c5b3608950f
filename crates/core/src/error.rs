//! Error types for Shoal.
//!
//! Every fallible operation returns [`Result`]. The variants mirror the status
//! codes surfaced to callers; `SUCCESS` is `Ok(_)` and end-of-stream is reported
//! as `Ok(false)` / `Ok(None)` by iterators, never as an error.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Shoal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable status codes, used for user-visible messages and structured logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rc {
    Success,
    RecordEof,
    NotFound,
    InvalidArgument,
    SchemaTableNotExist,
    SchemaFieldNotExist,
    InvalidSchema,
    IoErrOpen,
    IoErrRead,
    IoErrWrite,
    Internal,
    Unimplemented,
}

impl Rc {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rc::Success => "SUCCESS",
            Rc::RecordEof => "RECORD_EOF",
            Rc::NotFound => "NOTFOUND",
            Rc::InvalidArgument => "INVALID_ARGUMENT",
            Rc::SchemaTableNotExist => "SCHEMA_TABLE_NOT_EXIST",
            Rc::SchemaFieldNotExist => "SCHEMA_FIELD_NOT_EXIST",
            Rc::InvalidSchema => "INVALID_SCHEMA",
            Rc::IoErrOpen => "IOERR_OPEN",
            Rc::IoErrRead => "IOERR_READ",
            Rc::IoErrWrite => "IOERR_WRITE",
            Rc::Internal => "INTERNAL",
            Rc::Unimplemented => "UNIMPLEMENTED",
        }
    }
}

impl fmt::Display for Rc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for Shoal operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Lookup miss. Often recoverable, e.g. probing the wrong side of a join.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Caller supplied ill-typed or ill-shaped data.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("table does not exist: {table}")]
    SchemaTableNotExist { table: String },

    #[error("field {field} does not exist in table {table}")]
    SchemaFieldNotExist { table: String, field: String },

    /// Invalid schema definition.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("failed to open {path:?}: {source}")]
    IoErrOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    IoErrRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    IoErrWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invariant violation.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Feature combination not supported.
    #[error("unimplemented: {message}")]
    Unimplemented { message: String },
}

impl Error {
    /// Returns the status code of this error.
    pub fn rc(&self) -> Rc {
        match self {
            Error::NotFound { .. } => Rc::NotFound,
            Error::InvalidArgument { .. } => Rc::InvalidArgument,
            Error::SchemaTableNotExist { .. } => Rc::SchemaTableNotExist,
            Error::SchemaFieldNotExist { .. } => Rc::SchemaFieldNotExist,
            Error::InvalidSchema { .. } => Rc::InvalidSchema,
            Error::IoErrOpen { .. } => Rc::IoErrOpen,
            Error::IoErrRead { .. } => Rc::IoErrRead,
            Error::IoErrWrite { .. } => Rc::IoErrWrite,
            Error::Internal { .. } => Rc::Internal,
            Error::Unimplemented { .. } => Rc::Unimplemented,
        }
    }

    /// Returns true for a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Creates a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn table_not_exist(table: impl Into<String>) -> Self {
        Error::SchemaTableNotExist {
            table: table.into(),
        }
    }

    pub fn field_not_exist(table: impl Into<String>, field: impl Into<String>) -> Self {
        Error::SchemaFieldNotExist {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    pub fn io_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::IoErrOpen {
            path: path.into(),
            source,
        }
    }

    pub fn io_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::IoErrRead {
            path: path.into(),
            source,
        }
    }

    pub fn io_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::IoErrWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Creates an unimplemented error.
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Error::Unimplemented {
            message: message.into(),
        }
    }
}
