//! Core library for the attendance tracker.
//!
//! The public surface is deliberately small: an async [`AttendanceStore`]
//! over a local SQLite file, the scan validator that gates barcode input,
//! and the xlsx report exporter. Front ends (the bundled CLI, or the mobile
//! shell this core was designed for) call these four pieces and own all
//! presentation and navigation themselves.

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod scan;
pub mod store;

/// Persistence entry points used by binaries to locate the database.
pub use db::{default_db_path, DB_FILE_NAME};

/// The error taxonomies callers match on.
pub use error::{ExportError, StoreError};

/// Report building and the file-sharing seam.
pub use export::{build_report, export_attendance, export_filename, ShareTarget, XLSX_MIME};

/// Domain types shared by every layer.
pub use models::{AttendanceEvent, Course, NewAttendanceEvent, Student};

/// Barcode input validation and per-visit debouncing.
pub use scan::{validate_scan, ScanSession};

/// The async record store.
pub use store::AttendanceStore;
