//! Content store bootstrap: connections, SQL helper functions and schema.
//!
//! # Responsibility
//! - Open and configure SQLite connections for articles, tags and comments.
//! - Register `casefold`, which case-insensitive search predicates call.
//! - Bring the schema up to the version this binary was built with.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No repository sees a connection before bootstrap succeeded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::{latest_version, schema_version};
pub use open::{open_db, open_db_in_memory, register_functions};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A scalar SQL function could not be installed on the connection.
    FunctionRegistration {
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The compiled-in migration list is not strictly increasing from 1.
    InvalidMigrationRegistry { version: u32, expected: u32 },
    /// The database was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::FunctionRegistration { name, source } => {
                write!(f, "failed to register SQL function `{name}`: {source}")
            }
            Self::InvalidMigrationRegistry { version, expected } => write!(
                f,
                "migration version {version} is out of order, expected {expected}"
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "content store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::FunctionRegistration { source: err, .. } => Some(err),
            Self::InvalidMigrationRegistry { .. } | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
