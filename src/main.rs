//! Command-line front end for the attendance tracker. This binary is one of
//! the "UI collaborators" the core is written for: it initializes the store,
//! drives the public operations, and prints results. All attendance logic
//! lives in the library.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use env_logger::Env;

use attendance_tracker::{
    default_db_path, export_attendance, AttendanceStore, Course, NewAttendanceEvent, ScanSession,
    ShareTarget, Student, DB_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "attendance-tracker", about = "Course attendance tracking and export")]
struct Cli {
    /// Directory holding the SQLite database (defaults to ~/.attendance-tracker)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Validate a scanned code and record attendance for it
    Record {
        /// Course code the scan belongs to
        course: String,
        /// Raw text from the barcode decoder
        scanned: String,
        /// Student display name to save with the scan
        #[arg(long)]
        name: String,
        /// Sponsor to save with the scan
        #[arg(long)]
        sponsor: String,
    },
    /// List attendance for a course, newest scan first
    Attendance {
        course: String,
    },
    /// Export a course's attendance log as an xlsx file
    Export {
        course: String,
        /// Output directory (defaults to the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CourseAction {
    /// Create a course
    Add { code: String, leader: String },
    /// List all courses
    List,
}

/// Desktop stand-in for the mobile share sheet: the file is already on
/// disk, so "sharing" is telling the user where it landed.
struct PrintShare;

impl ShareTarget for PrintShare {
    fn share(&self, path: &Path, _mime: &str) -> io::Result<()> {
        println!("exported {}", path.display());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let db_path = match &cli.data_dir {
        Some(dir) => dir.join(DB_FILE_NAME),
        None => default_db_path()?,
    };

    let store = AttendanceStore::new();
    store
        .init(db_path.clone())
        .await
        .context("failed to initialize attendance store")?;

    match cli.command {
        Command::Course { action } => match action {
            CourseAction::Add { code, leader } => {
                store
                    .add_course(&Course {
                        course_code: code.clone(),
                        leader_name: leader,
                    })
                    .await?;
                println!("created course {code}");
            }
            CourseAction::List => {
                for course in store.courses().await? {
                    println!("{}\t{}", course.course_code, course.leader_name);
                }
            }
        },

        Command::Record {
            course,
            scanned,
            name,
            sponsor,
        } => {
            // Malformed codes are scanner noise, not errors: drop them
            // silently, exactly like the scan screen keeps listening.
            let mut session = ScanSession::new();
            let Some(student_id) = session.submit(&scanned) else {
                return Ok(());
            };

            let Some(course) = store.course(&course).await? else {
                bail!("no course with code `{course}`");
            };

            let student = Student {
                student_id,
                student_name: name,
                sponsor,
            };
            store.upsert_student(&student).await?;

            let event = NewAttendanceEvent::record(&student, &course, Utc::now());
            store.add_attendance(&event).await?;
            println!(
                "recorded {} for {}",
                student.student_id, course.course_code
            );
        }

        Command::Attendance { course } => {
            for event in store.attendance_for_course(&course).await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    event.datetime, event.student_id, event.student_name, event.sponsor
                );
            }
        }

        Command::Export { course, out } => {
            let Some(course) = store.course(&course).await? else {
                bail!("no course with code `{course}`");
            };
            let events = store.attendance_for_course(&course.course_code).await?;

            let out_dir = match out {
                Some(dir) => dir,
                None => db_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            };
            export_attendance(
                &events,
                &course.course_code,
                &course.leader_name,
                &out_dir,
                &PrintShare,
            )?;
        }
    }

    Ok(())
}
