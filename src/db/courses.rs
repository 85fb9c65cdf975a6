//! Queries over the `courses` table. Courses are created once and then read
//! many times; nothing updates or deletes them.

use log::debug;
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension};

use crate::error::StoreError;
use crate::models::Course;

/// Insert a new course. The primary key on `courseCode` makes a duplicate
/// insert fail rather than overwrite, and that failure is surfaced as
/// [`StoreError::DuplicateCourse`] so front ends can treat it as a
/// validation message.
pub fn add_course(conn: &Connection, course: &Course) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO courses (courseCode, leaderName) VALUES (?1, ?2)",
        params![course.course_code, course.leader_name],
    )
    .map_err(|err| map_duplicate_course(err, &course.course_code))?;

    debug!("added course {}", course.course_code);
    Ok(())
}

/// Retrieve every course ordered by code. The query is the single source of
/// truth for how front ends order the course list.
pub fn fetch_courses(conn: &Connection) -> Result<Vec<Course>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT courseCode, leaderName FROM courses ORDER BY courseCode")?;

    let courses = stmt
        .query_map([], |row| {
            Ok(Course {
                course_code: row.get(0)?,
                leader_name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(courses)
}

/// Look up a single course by exact code, `None` on a miss.
pub fn fetch_course(conn: &Connection, course_code: &str) -> Result<Option<Course>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT courseCode, leaderName FROM courses WHERE courseCode = ?1")?;

    let course = stmt
        .query_row(params![course_code], |row| {
            Ok(Course {
                course_code: row.get(0)?,
                leader_name: row.get(1)?,
            })
        })
        .optional()?;

    Ok(course)
}

/// Existence check on an exact, case-sensitive course code.
pub fn course_exists(conn: &Connection, course_code: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare("SELECT 1 FROM courses WHERE courseCode = ?1")?;
    Ok(stmt.exists(params![course_code])?)
}

/// Coerce SQLite constraint errors into the typed duplicate-course variant.
/// The uniqueness of course codes is the only constraint writes can trip in
/// this schema.
fn map_duplicate_course(err: SqlError, course_code: &str) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::DuplicateCourse(course_code.to_string())
    } else {
        StoreError::Storage(err)
    }
}
