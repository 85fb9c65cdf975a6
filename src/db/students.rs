//! Queries over the `students` table. Students are keyed by their scanned
//! id; writing an id that already exists replaces the name and sponsor
//! (last-write-wins, one row per id at all times).

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::models::Student;

/// Insert or replace the student row for this id. `INSERT OR REPLACE` keeps
/// the operation a single atomic statement, which is what gives the upsert
/// its last-write-wins semantics without an explicit read-modify-write.
pub fn upsert_student(conn: &Connection, student: &Student) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO students (studentId, studentName, sponsor) VALUES (?1, ?2, ?3)",
        params![student.student_id, student.student_name, student.sponsor],
    )?;

    debug!("upserted student {}", student.student_id);
    Ok(())
}

/// Fetch a student by id. A miss is an expected outcome (the first scan of a
/// new student), so it comes back as `None` rather than an error.
pub fn fetch_student(conn: &Connection, student_id: &str) -> Result<Option<Student>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT studentId, studentName, sponsor FROM students WHERE studentId = ?1")?;

    let student = stmt
        .query_row(params![student_id], |row| {
            Ok(Student {
                student_id: row.get(0)?,
                student_name: row.get(1)?,
                sponsor: row.get(2)?,
            })
        })
        .optional()?;

    Ok(student)
}
