//! Async facade over the persistence layer.
//!
//! The store owns one shared SQLite connection behind an explicit
//! initialization lifecycle: construct, `init()` (open + schema migration),
//! then use. Every operation before `init()` completes fails fast with
//! [`StoreError::NotInitialized`]. Statements run on the blocking thread
//! pool so callers never stall an async event loop on disk I/O, and SQLite's
//! own single-statement atomicity is all the locking the single-writer model
//! needs.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use log::info;
use rusqlite::Connection;
use tokio::sync::watch;
use tokio::task;

use crate::db;
use crate::error::StoreError;
use crate::models::{AttendanceEvent, Course, NewAttendanceEvent, Student};

/// Lock a mutex, recovering the guard when a previous holder panicked. The
/// data under the lock is a connection handle, not an invariant-carrying
/// structure, so continuing after a poisoned lock is sound.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared, initialize-once store handle. Cloning is cheap; all clones see
/// the same connection and the same change notifications.
#[derive(Clone)]
pub struct AttendanceStore {
    /// `None` until `init()` succeeds.
    conn: Arc<Mutex<Option<Connection>>>,
    /// Write-generation counter, bumped after every committed write so
    /// subscribers can refresh on change instead of polling.
    generation: Arc<watch::Sender<u64>>,
}

impl Default for AttendanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceStore {
    /// Construct an unopened store. Nothing works until [`Self::init`] runs.
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            conn: Arc::new(Mutex::new(None)),
            generation: Arc::new(generation),
        }
    }

    /// Open the database at `db_path` (creating the parent directory if
    /// needed) and run schema migrations. Any failure is fatal for the
    /// store; the connection slot stays empty and every operation keeps
    /// returning [`StoreError::NotInitialized`].
    pub async fn init(&self, db_path: PathBuf) -> Result<(), StoreError> {
        let slot = Arc::clone(&self.conn);
        task::spawn_blocking(move || -> Result<(), StoreError> {
            let conn = db::open(&db_path)?;
            db::ensure_schema(&conn)?;
            *lock_unpoisoned(&slot) = Some(conn);
            info!("attendance store ready at {}", db_path.display());
            Ok(())
        })
        .await?
    }

    /// Receiver for the write-generation counter. The value only ever
    /// increases; a change means at least one write committed since the
    /// subscriber last looked, so re-reading the relevant queries observes
    /// it. Polling the getters directly remains a valid refresh strategy.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Insert a new course; duplicate codes surface as
    /// [`StoreError::DuplicateCourse`] without touching existing rows.
    pub async fn add_course(&self, course: &Course) -> Result<(), StoreError> {
        let course = course.clone();
        self.with_conn(move |conn| db::add_course(conn, &course))
            .await?;
        self.mark_written();
        Ok(())
    }

    /// Every course, ordered by course code ascending. Empty when none
    /// exist.
    pub async fn courses(&self) -> Result<Vec<Course>, StoreError> {
        self.with_conn(db::fetch_courses).await
    }

    /// Look up one course by exact code.
    pub async fn course(&self, course_code: &str) -> Result<Option<Course>, StoreError> {
        let course_code = course_code.to_string();
        self.with_conn(move |conn| db::fetch_course(conn, &course_code))
            .await
    }

    /// Whether a course with exactly this code exists.
    pub async fn course_exists(&self, course_code: &str) -> Result<bool, StoreError> {
        let course_code = course_code.to_string();
        self.with_conn(move |conn| db::course_exists(conn, &course_code))
            .await
    }

    /// Append one immutable attendance row.
    pub async fn add_attendance(&self, event: &NewAttendanceEvent) -> Result<(), StoreError> {
        let event = event.clone();
        self.with_conn(move |conn| db::insert_attendance(conn, &event))
            .await?;
        self.mark_written();
        Ok(())
    }

    /// All attendance rows for a course, newest `datetime` first.
    pub async fn attendance_for_course(
        &self,
        course_code: &str,
    ) -> Result<Vec<AttendanceEvent>, StoreError> {
        let course_code = course_code.to_string();
        self.with_conn(move |conn| db::fetch_attendance_for_course(conn, &course_code))
            .await
    }

    /// Insert-or-replace a student keyed by id; last write wins for the
    /// name and sponsor.
    pub async fn upsert_student(&self, student: &Student) -> Result<(), StoreError> {
        let student = student.clone();
        self.with_conn(move |conn| db::upsert_student(conn, &student))
            .await?;
        self.mark_written();
        Ok(())
    }

    /// Fetch a student by id; `None` is an expected miss, not an error.
    pub async fn student(&self, student_id: &str) -> Result<Option<Student>, StoreError> {
        let student_id = student_id.to_string();
        self.with_conn(move |conn| db::fetch_student(conn, &student_id))
            .await
    }

    /// Run one synchronous persistence helper on the blocking pool against
    /// the shared connection, failing fast when `init()` has not completed.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let slot = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let guard = lock_unpoisoned(&slot);
            let conn = guard.as_ref().ok_or(StoreError::NotInitialized)?;
            op(conn)
        })
        .await?
    }

    /// Bump the write generation. Called only after the statement committed,
    /// so a subscriber that re-reads on the new value sees the write.
    fn mark_written(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
