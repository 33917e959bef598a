// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite persistence layer for the Wochenplan backend.
//!
//! This crate stores assembled week plans and the upload audit trail.
//! It is built on Diesel with embedded migrations; `SQLite` is the only
//! backend. File-based databases run in WAL mode, and tests use unique
//! shared in-memory databases for isolation.
//!
//! The write path is transactional: a week plan is persisted completely
//! or not at all. Drivers and public holidays are reference data that
//! survive across weeks; routes, availability rows, and fixed
//! assignments are scoped to their week.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use time::Date;

use wochenplan_audit::UploadAttempt;
use wochenplan_core::WeekPlan;
use wochenplan_domain::{Driver, DriverAvailability, FixedAssignment, Route};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{DuplicateRoute, PersistOutcome, UploadRecord};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests get isolated databases without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for week plans and the upload history.
///
/// Holds a single `SQLite` connection. Callers serialize access
/// themselves; the server keeps the adapter behind a mutex.
pub struct SqlitePersistence {
    conn: SqliteConnection,
}

impl SqlitePersistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database via an
    /// atomic counter, ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::Setup("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // WAL mode for better read concurrency on file databases.
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Replaces a week's stored rows with the given plan, transactionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is written.
    pub fn replace_week(&mut self, plan: &WeekPlan) -> Result<PersistOutcome, PersistenceError> {
        mutations::week::replace_week(&mut self.conn, plan)
    }

    /// Appends a plan to a week's stored rows, transactionally.
    ///
    /// Existing `(date, route)` rows are kept and reported as duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is written.
    pub fn append_week(&mut self, plan: &WeekPlan) -> Result<PersistOutcome, PersistenceError> {
        mutations::week::append_week(&mut self.conn, plan)
    }

    /// Records one upload attempt in the history table.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_upload(&mut self, attempt: &UploadAttempt) -> Result<(), PersistenceError> {
        mutations::uploads::record_upload(&mut self.conn, attempt)
    }

    /// Returns a week's routes in `(date, name)` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn week_routes(&mut self, week_start: Date) -> Result<Vec<Route>, PersistenceError> {
        queries::week::week_routes(&mut self.conn, week_start)
    }

    /// Returns every known driver, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_drivers(&mut self) -> Result<Vec<Driver>, PersistenceError> {
        queries::week::all_drivers(&mut self.conn)
    }

    /// Returns a week's availability rows with their driver names.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn week_availability(
        &mut self,
        week_start: Date,
    ) -> Result<Vec<DriverAvailability>, PersistenceError> {
        queries::week::week_availability(&mut self.conn, week_start)
    }

    /// Returns a week's fixed assignments with driver and route names.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn week_assignments(
        &mut self,
        week_start: Date,
    ) -> Result<Vec<FixedAssignment>, PersistenceError> {
        queries::week::week_assignments(&mut self.conn, week_start)
    }

    /// Returns the most recent upload attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_uploads(&mut self, limit: i64) -> Result<Vec<UploadRecord>, PersistenceError> {
        queries::uploads::recent_uploads(&mut self.conn, limit)
    }
}
