//! Connection bootstrap and schema migrations.
//!
//! The on-disk column names (`courseCode`, `studentId`, ...) are a durable
//! contract with databases written by earlier releases, so they are spelled
//! exactly as the original app created them even though they clash with Rust
//! naming conventions. `ensure_schema` walks an ordered list of named,
//! individually idempotent steps; calling it on every start is expected and
//! must never lose rows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::{debug, info};
use rusqlite::Connection;

use crate::error::StoreError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".attendance-tracker";
/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "attendance.sqlite";

/// Placeholder written into pre-migration attendance rows that predate the
/// denormalized student columns.
pub const UNKNOWN_STUDENT: &str = "Unknown Student";
/// Sponsor counterpart of [`UNKNOWN_STUDENT`].
pub const UNKNOWN_SPONSOR: &str = "Unknown Sponsor";

/// One named schema step. Each step probes the live schema and no-ops when
/// its work is already done, so the whole table stays safe to re-run and new
/// steps compose by appending to [`MIGRATIONS`].
struct Migration {
    name: &'static str,
    run: fn(&Connection) -> Result<(), rusqlite::Error>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "create-courses",
        run: create_courses,
    },
    Migration {
        name: "create-students",
        run: create_students,
    },
    Migration {
        name: "create-attendance",
        run: create_attendance,
    },
    Migration {
        name: "attendance-denormalized-columns",
        run: backfill_attendance_columns,
    },
];

/// Resolve the default location of the SQLite database inside the user's
/// home directory.
pub fn default_db_path() -> Result<PathBuf, StoreError> {
    let base_dirs = BaseDirs::new().ok_or_else(|| {
        StoreError::DataDir(io::Error::new(
            io::ErrorKind::NotFound,
            "could not locate home directory",
        ))
    })?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

/// Create the data directory if needed and open the database file.
/// `PRAGMA foreign_keys = ON` keeps the informational references in the
/// attendance table checked the same way during tests and production runs.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    Ok(conn)
}

/// Bring the schema up to date by running every migration step in order.
/// Any failure aborts with the step name attached; the caller must treat
/// that as fatal and not hand the connection to the store.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    for migration in MIGRATIONS {
        (migration.run)(conn).map_err(|source| StoreError::Initialization {
            step: migration.name,
            source,
        })?;
        debug!("schema step `{}` applied", migration.name);
    }
    Ok(())
}

fn create_courses(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses (
            courseCode TEXT PRIMARY KEY,
            leaderName TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn create_students(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            studentId TEXT PRIMARY KEY,
            studentName TEXT NOT NULL,
            sponsor TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Create the attendance table with the full current column set, but only
/// when it does not exist at all. Upgrading a table that exists with the old
/// shape is the next step's job.
fn create_attendance(conn: &Connection) -> Result<(), rusqlite::Error> {
    if !attendance_columns(conn)?.is_empty() {
        return Ok(());
    }

    conn.execute(
        "CREATE TABLE attendance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            studentId TEXT NOT NULL,
            studentName TEXT NOT NULL,
            sponsor TEXT NOT NULL,
            datetime TEXT NOT NULL,
            courseCode TEXT NOT NULL,
            leaderName TEXT NOT NULL,
            FOREIGN KEY (courseCode) REFERENCES courses (courseCode),
            FOREIGN KEY (studentId) REFERENCES students (studentId)
        )",
        [],
    )?;
    Ok(())
}

/// Upgrade a legacy attendance table that predates the `studentName` and
/// `sponsor` columns: rebuild with the full schema, copy every row with
/// placeholder values for the new columns, then swap the tables. The whole
/// swap runs in one transaction so a failure part-way leaves the original
/// table untouched.
fn backfill_attendance_columns(conn: &Connection) -> Result<(), rusqlite::Error> {
    let columns = attendance_columns(conn)?;
    let has_student_name = columns.iter().any(|c| c == "studentName");
    let has_sponsor = columns.iter().any(|c| c == "sponsor");
    if has_student_name && has_sponsor {
        return Ok(());
    }

    info!("migrating attendance table to the denormalized schema");
    conn.execute_batch(&format!(
        "BEGIN;
         CREATE TABLE attendance_new (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             studentId TEXT NOT NULL,
             studentName TEXT NOT NULL,
             sponsor TEXT NOT NULL,
             datetime TEXT NOT NULL,
             courseCode TEXT NOT NULL,
             leaderName TEXT NOT NULL,
             FOREIGN KEY (courseCode) REFERENCES courses (courseCode),
             FOREIGN KEY (studentId) REFERENCES students (studentId)
         );
         INSERT INTO attendance_new
             (id, studentId, studentName, sponsor, datetime, courseCode, leaderName)
             SELECT id, studentId, '{UNKNOWN_STUDENT}', '{UNKNOWN_SPONSOR}',
                    datetime, courseCode, leaderName
             FROM attendance;
         DROP TABLE attendance;
         ALTER TABLE attendance_new RENAME TO attendance;
         COMMIT;"
    ))?;
    info!("attendance table migration completed");
    Ok(())
}

/// Column names currently present on the attendance table, empty when the
/// table does not exist. `PRAGMA table_info` reports the name in column 1.
fn attendance_columns(conn: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare("PRAGMA table_info(attendance)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
