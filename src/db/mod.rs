//! Persistence module split across logical submodules: connection/schema
//! bootstrap plus one file of query helpers per table. Everything here is
//! synchronous over a borrowed [`rusqlite::Connection`]; the async facade in
//! [`crate::store`] owns the connection and dispatches onto blocking threads.

mod attendance;
mod connection;
mod courses;
mod students;

pub use attendance::{fetch_attendance_for_course, insert_attendance};
pub use connection::{
    default_db_path, ensure_schema, open, DB_FILE_NAME, UNKNOWN_SPONSOR, UNKNOWN_STUDENT,
};
pub use courses::{add_course, course_exists, fetch_course, fetch_courses};
pub use students::{fetch_student, upsert_student};
