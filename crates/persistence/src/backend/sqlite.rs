// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Everything that cannot be said in backend-agnostic Diesel DSL lives
//! here: opening the connection, applying embedded migrations, PRAGMA
//! configuration, and the `last_insert_rowid()` workaround. Week and
//! upload queries stay in `queries/` and `mutations/`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Schema migrations compiled into the binary; applied on every open.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

// PRAGMA has no Diesel DSL, so pragma reads go through sql_query
// with a one-column row struct.
#[derive(QueryableByName)]
struct ForeignKeysPragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns the rowid of the most recent insert on this connection.
///
/// Inserts that need their generated id call this instead of a
/// `RETURNING` clause, which `SQLite` does not support everywhere.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Confirms `SQLite` is actually enforcing foreign keys.
///
/// Availability and assignment rows reference drivers and routes;
/// without enforcement a failed delete order would corrupt a week
/// silently, so a disabled pragma is treated as fatal at startup.
///
/// # Errors
///
/// Returns [`PersistenceError::ForeignKeysDisabled`] when the pragma
/// reports off, or a query error if the pragma cannot be read.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragmaRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeysDisabled);
    }
    debug!("SQLite foreign key enforcement is active");
    Ok(())
}

/// Opens a connection, turns on foreign keys, and applies pending
/// migrations.
///
/// `database_url` is anything `SqliteConnection::establish` accepts: a
/// file path, `":memory:"`, or a shared-cache memory URL.
///
/// # Errors
///
/// Returns an error if the connection cannot be opened, the pragma
/// fails, or a migration does not apply.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(url = %database_url, "opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::Connection(e.to_string()))?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::Query(e.to_string()))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }

    Ok(conn)
}

/// Switches a file-backed database to WAL journaling.
///
/// Not meaningful for in-memory databases, so the caller only invokes
/// this on the file path branch.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::Query(e.to_string()))?;
    Ok(())
}
