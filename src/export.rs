//! Attendance report export: build a single-sheet xlsx workbook from
//! attendance rows, write it to disk, then hand it to a sharing
//! collaborator. The write always happens before the share so a failed
//! write never exposes a broken file to the share step.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone};
use log::info;
use regex::Regex;
use rust_xlsxwriter::Workbook;

use crate::error::ExportError;
use crate::models::AttendanceEvent;

/// Sheet name inside the exported workbook.
pub const SHEET_NAME: &str = "Attendance";
/// MIME type handed to the sharing collaborator.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header row of the exported sheet, in column order.
const HEADERS: [&str; 7] = [
    "Student ID",
    "Student Name",
    "Sponsor",
    "Date",
    "Time",
    "Course Code",
    "Leader Name",
];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid literal"));

/// External file-sharing facility (the platform share sheet on mobile, a
/// print-the-path stand-in on the desktop CLI). Implementations receive an
/// already-written file.
pub trait ShareTarget {
    /// Offer the file at `path` to the user. Errors are surfaced to the
    /// caller as [`ExportError::Share`]; nothing retries automatically.
    fn share(&self, path: &Path, mime: &str) -> io::Result<()>;
}

/// Deterministic export filename: course code, hyphen, leader name with
/// every whitespace run collapsed to a single hyphen.
pub fn export_filename(course_code: &str, leader_name: &str) -> String {
    let leader = WHITESPACE_RUN.replace_all(leader_name, "-");
    format!("{course_code}-{leader}.xlsx")
}

/// Serialize the events into a workbook: one `Attendance` sheet, the header
/// row, then one row per event in exactly the supplied order (the caller
/// controls ordering, typically newest first straight from the store).
pub fn build_report(events: &[AttendanceEvent]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (index, event) in events.iter().enumerate() {
        let row = (index + 1) as u32;
        let (date, time) = split_datetime(&event.datetime);
        sheet.write_string(row, 0, &event.student_id)?;
        sheet.write_string(row, 1, &event.student_name)?;
        sheet.write_string(row, 2, &event.sponsor)?;
        sheet.write_string(row, 3, date)?;
        sheet.write_string(row, 4, time)?;
        sheet.write_string(row, 5, &event.course_code)?;
        sheet.write_string(row, 6, &event.leader_name)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Build the workbook, write it under `out_dir`, then invoke the share
/// collaborator. Returns the path of the written file. A build or write
/// failure aborts before the share step runs.
pub fn export_attendance(
    events: &[AttendanceEvent],
    course_code: &str,
    leader_name: &str,
    out_dir: &Path,
    target: &dyn ShareTarget,
) -> Result<PathBuf, ExportError> {
    let bytes = build_report(events)?;
    let path = out_dir.join(export_filename(course_code, leader_name));
    fs::write(&path, bytes)?;
    info!(
        "wrote {} attendance rows to {}",
        events.len(),
        path.display()
    );

    target.share(&path, XLSX_MIME).map_err(ExportError::Share)?;
    Ok(path)
}

/// Split a stored RFC 3339 timestamp into human-readable date and time
/// cells, rendered in the device's local timezone — the store stamps UTC,
/// but an evening scan must read as evening in the export, and the
/// conversion can move the calendar date as well. Rows written before
/// timestamps were standardized may not parse; those fall back to the raw
/// string in the Date cell so an export never fails on legacy data.
fn split_datetime(datetime: &str) -> (String, String) {
    split_datetime_in(datetime, &Local)
}

/// Timezone-parameterized body of [`split_datetime`], so tests can pin a
/// fixed offset instead of inheriting the host timezone.
fn split_datetime_in<Tz: TimeZone>(datetime: &str, tz: &Tz) -> (String, String)
where
    Tz::Offset: fmt::Display,
{
    match DateTime::parse_from_rfc3339(datetime) {
        Ok(parsed) => {
            let localized = parsed.with_timezone(tz);
            (
                localized.format("%-m/%-d/%Y").to_string(),
                localized.format("%-I:%M:%S %p").to_string(),
            )
        }
        Err(_) => (datetime.to_string(), String::new()),
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
