//! Error taxonomy for the store and the export pipeline. Callers need to
//! tell these cases apart (a duplicate course code is a form-validation
//! message, a failed disk write is not), so each gets its own variant rather
//! than an opaque string.

use thiserror::Error;

/// Errors surfaced by [`crate::store::AttendanceStore`] and the persistence
/// helpers underneath it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A schema bootstrap/migration step failed. Fatal: the store must not
    /// be used afterwards.
    #[error("schema initialization failed during `{step}`: {source}")]
    Initialization {
        /// Name of the migration step that failed.
        step: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The data directory could not be resolved or created.
    #[error("data directory is not usable: {0}")]
    DataDir(#[from] std::io::Error),

    /// A store operation ran before `init()` completed. This is a contract
    /// violation in the caller, not a recoverable runtime condition.
    #[error("store is not initialized; call init() before use")]
    NotInitialized,

    /// Insert rejected because the course code is already taken. Recoverable;
    /// front ends surface it as a validation message.
    #[error("course `{0}` already exists")]
    DuplicateCourse(String),

    /// Anything else the storage engine reports (I/O failures included).
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The blocking worker running the statement panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors from building, writing, or sharing an attendance report. A failed
/// export is never retried automatically; the user retries by exporting
/// again.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The workbook could not be assembled or serialized.
    #[error("failed to build workbook: {0}")]
    Build(#[from] rust_xlsxwriter::XlsxError),

    /// Writing the finished document to disk failed. The share step is not
    /// attempted when this happens.
    #[error("failed to write export file: {0}")]
    Write(#[from] std::io::Error),

    /// The file was written but the sharing collaborator rejected it.
    #[error("failed to share export file: {0}")]
    Share(#[source] std::io::Error),
}
