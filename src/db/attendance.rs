//! Queries over the `attendance` table. Rows here are append-only facts:
//! nothing in the crate updates or deletes them, and re-scanning the same
//! student simply appends another row.

use log::debug;
use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::models::{AttendanceEvent, NewAttendanceEvent};

/// Append one attendance row. SQLite assigns the id; it is deliberately not
/// returned, since no caller acts on it synchronously.
pub fn insert_attendance(conn: &Connection, event: &NewAttendanceEvent) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO attendance
            (studentId, studentName, sponsor, datetime, courseCode, leaderName)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.student_id,
            event.student_name,
            event.sponsor,
            event.datetime,
            event.course_code,
            event.leader_name,
        ],
    )?;

    debug!(
        "recorded attendance for {} on {}",
        event.student_id, event.course_code
    );
    Ok(())
}

/// All attendance rows for a course, newest scan first. The descending
/// `datetime` order is a user-facing contract (latest scan on top), so it
/// lives in the SQL rather than in each caller.
pub fn fetch_attendance_for_course(
    conn: &Connection,
    course_code: &str,
) -> Result<Vec<AttendanceEvent>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, studentId, studentName, sponsor, datetime, courseCode, leaderName
         FROM attendance
         WHERE courseCode = ?1
         ORDER BY datetime DESC",
    )?;

    let events = stmt
        .query_map(params![course_code], |row| {
            Ok(AttendanceEvent {
                id: row.get(0)?,
                student_id: row.get(1)?,
                student_name: row.get(2)?,
                sponsor: row.get(3)?,
                datetime: row.get(4)?,
                course_code: row.get(5)?,
                leader_name: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}
