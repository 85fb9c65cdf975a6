use super::*;
use rusqlite::params;

fn open_temp(dir: &tempfile::TempDir) -> Connection {
    open(&dir.path().join("test.sqlite")).unwrap()
}

/// Shape of the attendance table as the original app created it before the
/// denormalized student columns existed.
fn create_legacy_attendance(conn: &Connection) {
    conn.execute(
        "CREATE TABLE attendance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            studentId TEXT NOT NULL,
            datetime TEXT NOT NULL,
            courseCode TEXT NOT NULL,
            leaderName TEXT NOT NULL
        )",
        [],
    )
    .unwrap();
}

fn attendance_rows(conn: &Connection) -> Vec<(i64, String, String, String, String)> {
    let mut stmt = conn
        .prepare(
            "SELECT id, studentId, studentName, sponsor, datetime
             FROM attendance ORDER BY id",
        )
        .unwrap();
    stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

#[test]
fn fresh_schema_has_all_tables_and_columns() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_temp(&dir);
    ensure_schema(&conn).unwrap();

    for table in ["courses", "students", "attendance"] {
        let exists: bool = conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .unwrap()
            .exists(params![table])
            .unwrap();
        assert!(exists, "missing table {table}");
    }

    let columns = attendance_columns(&conn).unwrap();
    for column in [
        "id",
        "studentId",
        "studentName",
        "sponsor",
        "datetime",
        "courseCode",
        "leaderName",
    ] {
        assert!(columns.iter().any(|c| c == column), "missing {column}");
    }
}

#[test]
fn migration_backfills_legacy_rows_with_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_temp(&dir);
    create_legacy_attendance(&conn);
    conn.execute(
        "INSERT INTO attendance (studentId, datetime, courseCode, leaderName)
         VALUES ('S00000001', '2023-01-01T09:00:00.000Z', 'CS101', 'Jane Doe')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO attendance (studentId, datetime, courseCode, leaderName)
         VALUES ('S00000002', '2023-01-02T09:00:00.000Z', 'CS101', 'Jane Doe')",
        [],
    )
    .unwrap();

    ensure_schema(&conn).unwrap();

    let rows = attendance_rows(&conn);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        (
            1,
            "S00000001".to_string(),
            UNKNOWN_STUDENT.to_string(),
            UNKNOWN_SPONSOR.to_string(),
            "2023-01-01T09:00:00.000Z".to_string(),
        )
    );
    assert_eq!(rows[1].1, "S00000002");
    assert_eq!(rows[1].2, UNKNOWN_STUDENT);
}

#[test]
fn ensure_schema_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_temp(&dir);
    create_legacy_attendance(&conn);
    conn.execute(
        "INSERT INTO attendance (studentId, datetime, courseCode, leaderName)
         VALUES ('S00000001', '2023-01-01T09:00:00.000Z', 'CS101', 'Jane Doe')",
        [],
    )
    .unwrap();

    ensure_schema(&conn).unwrap();
    let after_first = attendance_rows(&conn);

    // Second run must be observably a no-op: same rows, same ids.
    ensure_schema(&conn).unwrap();
    assert_eq!(attendance_rows(&conn), after_first);
}

#[test]
fn ensure_schema_preserves_rows_written_under_current_schema() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_temp(&dir);
    ensure_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO attendance
            (studentId, studentName, sponsor, datetime, courseCode, leaderName)
         VALUES ('S00000003', 'Alice', 'Bob', '2024-05-05T10:00:00.000Z', 'CS101', 'Jane Doe')",
        [],
    )
    .unwrap();

    ensure_schema(&conn).unwrap();

    let rows = attendance_rows(&conn);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].2, "Alice");
    assert_eq!(rows[0].3, "Bob");
}
