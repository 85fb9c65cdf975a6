use super::*;
use chrono::FixedOffset;
use std::cell::Cell;

fn sample_event(datetime: &str) -> AttendanceEvent {
    AttendanceEvent {
        id: 1,
        student_id: "S00000001".to_string(),
        student_name: "Alice".to_string(),
        sponsor: "Bob".to_string(),
        datetime: datetime.to_string(),
        course_code: "CS101".to_string(),
        leader_name: "Jane Doe".to_string(),
    }
}

/// Share collaborator that records whether it was invoked and can be told
/// to fail.
struct ProbeShare {
    called: Cell<bool>,
    fail: bool,
}

impl ProbeShare {
    fn ok() -> Self {
        Self {
            called: Cell::new(false),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            called: Cell::new(false),
            fail: true,
        }
    }
}

impl ShareTarget for ProbeShare {
    fn share(&self, _path: &Path, mime: &str) -> io::Result<()> {
        assert_eq!(mime, XLSX_MIME);
        self.called.set(true);
        if self.fail {
            Err(io::Error::other("share sheet dismissed"))
        } else {
            Ok(())
        }
    }
}

#[test]
fn filename_collapses_whitespace_runs_to_hyphens() {
    assert_eq!(export_filename("CS101", "Jane Doe"), "CS101-Jane-Doe.xlsx");
    assert_eq!(
        export_filename("CS101", "Jane  \t Van  Doe"),
        "CS101-Jane-Van-Doe.xlsx"
    );
    assert_eq!(export_filename("BI200", "Cher"), "BI200-Cher.xlsx");
}

#[test]
fn build_report_produces_an_xlsx_container() {
    let bytes = build_report(&[sample_event("2024-03-05T14:07:09.123Z")]).unwrap();
    // xlsx is a zip archive; the local-file-header magic is enough to know
    // the workbook serialized.
    assert!(bytes.starts_with(b"PK\x03\x04"));

    // An empty course still exports a sheet with just the header row.
    assert!(build_report(&[]).unwrap().starts_with(b"PK\x03\x04"));
}

#[test]
fn datetime_renders_in_the_target_timezone() {
    let utc = FixedOffset::east_opt(0).unwrap();
    assert_eq!(
        split_datetime_in("2024-03-05T14:07:09.123Z", &utc),
        ("3/5/2024".to_string(), "2:07:09 PM".to_string())
    );

    // Conversion can move the calendar date: 02:07 UTC is the previous
    // evening three hours west.
    let minus_three = FixedOffset::west_opt(3 * 3600).unwrap();
    assert_eq!(
        split_datetime_in("2024-03-05T02:07:09.123Z", &minus_three),
        ("3/4/2024".to_string(), "11:07:09 PM".to_string())
    );

    let plus_ten = FixedOffset::east_opt(10 * 3600).unwrap();
    assert_eq!(
        split_datetime_in("2024-12-31T20:30:00.000Z", &plus_ten),
        ("1/1/2025".to_string(), "6:30:00 AM".to_string())
    );
}

#[test]
fn unparseable_datetime_falls_back_to_the_raw_string() {
    assert_eq!(
        split_datetime("yesterday-ish"),
        ("yesterday-ish".to_string(), String::new())
    );
}

#[test]
fn export_writes_file_then_shares() {
    let dir = tempfile::tempdir().unwrap();
    let share = ProbeShare::ok();

    let path = export_attendance(
        &[sample_event("2024-03-05T14:07:09.123Z")],
        "CS101",
        "Jane Doe",
        dir.path(),
        &share,
    )
    .unwrap();

    assert_eq!(path, dir.path().join("CS101-Jane-Doe.xlsx"));
    assert!(path.exists());
    assert!(share.called.get());
}

#[test]
fn share_failure_is_surfaced_but_file_remains() {
    let dir = tempfile::tempdir().unwrap();
    let share = ProbeShare::failing();

    let err = export_attendance(
        &[sample_event("2024-03-05T14:07:09.123Z")],
        "CS101",
        "Jane Doe",
        dir.path(),
        &share,
    );

    assert!(matches!(err, Err(ExportError::Share(_))));
    assert!(dir.path().join("CS101-Jane-Doe.xlsx").exists());
}

#[test]
fn write_failure_never_reaches_the_share_step() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let share = ProbeShare::ok();

    let err = export_attendance(
        &[sample_event("2024-03-05T14:07:09.123Z")],
        "CS101",
        "Jane Doe",
        &missing,
        &share,
    );

    assert!(matches!(err, Err(ExportError::Write(_))));
    assert!(!share.called.get());
}
