// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Failures surfaced by the storage layer.
///
/// Diesel and serde errors are flattened to strings at the boundary so
/// callers never depend on backend error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The underlying database reported a failure.
    Database(String),
    /// Opening the `SQLite` connection failed.
    Connection(String),
    /// Applying the embedded migrations failed.
    Migration(String),
    /// A statement could not be built or executed.
    Query(String),
    /// A JSON details column or stored date could not be encoded or decoded.
    Encoding(String),
    /// Database setup (WAL mode, pragmas) failed.
    Setup(String),
    /// `PRAGMA foreign_keys` reported disabled after being requested.
    ForeignKeysDisabled,
    /// A referenced row does not exist.
    MissingRecord(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(msg) => write!(f, "database failure: {msg}"),
            Self::Connection(msg) => write!(f, "could not open database: {msg}"),
            Self::Migration(msg) => write!(f, "migration failed: {msg}"),
            Self::Query(msg) => write!(f, "query failed: {msg}"),
            Self::Encoding(msg) => write!(f, "stored value could not be decoded/encoded: {msg}"),
            Self::Setup(msg) => write!(f, "database setup failed: {msg}"),
            Self::ForeignKeysDisabled => {
                write!(f, "SQLite did not enable foreign key enforcement")
            }
            Self::MissingRecord(msg) => write!(f, "missing record: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::MissingRecord(String::from("row not found")),
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
