//! Domain models that mirror the SQLite schema and get passed between the
//! store, the report builder, and whatever front end drives them. These types
//! stay light-weight data holders so other layers can focus on persistence
//! and presentation logic.

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A tracked course. The user-supplied `course_code` is the primary key and
/// is matched case-sensitively everywhere; `leader_name` is denormalized into
/// attendance rows at recording time, so editing it later (which the current
/// flows never do) would not rewrite history.
pub struct Course {
    /// Unique, user-supplied identifier such as `CS101`.
    pub course_code: String,
    /// Display name of the person responsible for the course.
    pub leader_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A student known to the store. The id carries the scanned barcode format
/// (`S` followed by exactly eight digits); name and sponsor are mutable
/// display fields with last-write-wins semantics.
pub struct Student {
    /// Primary key in the `students` table, e.g. `S00000001`.
    pub student_id: String,
    /// Display name, replaced wholesale on every upsert.
    pub student_name: String,
    /// Sponsoring person or organization, replaced alongside the name.
    pub sponsor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One immutable record of a student being marked present at a course. The
/// student's name/sponsor and the course leader are copied in at recording
/// time rather than joined, so the row stays historically accurate even if
/// the `students` row is later upserted with different values.
pub struct AttendanceEvent {
    /// Autoincrement primary key assigned by SQLite.
    pub id: i64,
    pub student_id: String,
    pub student_name: String,
    pub sponsor: String,
    /// RFC 3339 timestamp of the scan, stored as text.
    pub datetime: String,
    pub course_code: String,
    pub leader_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An attendance row before insertion, i.e. [`AttendanceEvent`] without the
/// store-assigned id. The store does not echo the generated id back; callers
/// that need it re-query the course.
pub struct NewAttendanceEvent {
    pub student_id: String,
    pub student_name: String,
    pub sponsor: String,
    pub datetime: String,
    pub course_code: String,
    pub leader_name: String,
}

impl NewAttendanceEvent {
    /// Build the row for one scan-confirm action, denormalizing the current
    /// student and course display fields and stamping the given instant.
    /// Millisecond precision with a trailing `Z` keeps every stored timestamp
    /// the same width, so the lexicographic `ORDER BY datetime` in the store
    /// agrees with chronological order.
    pub fn record(student: &Student, course: &Course, when: DateTime<Utc>) -> Self {
        Self {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            sponsor: student.sponsor.clone(),
            datetime: when.to_rfc3339_opts(SecondsFormat::Millis, true),
            course_code: course.course_code.clone(),
            leader_name: course.leader_name.clone(),
        }
    }
}
