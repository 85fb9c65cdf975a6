//! Validation of raw barcode-decoder output.
//!
//! Decoders emit plenty of noise: partial reads, unrelated barcodes, the
//! same frame decoded several times in a row. Policy here is that malformed
//! input is silently dropped (the scanning loop just keeps listening) and
//! that one physical scan produces exactly one accepted id per session.

use std::sync::LazyLock;

use regex::Regex;

/// A student id is a literal `S` followed by exactly eight ASCII digits,
/// anchored at both ends. `s12345678` or `S123456789` are not ids, and
/// neither is anything using non-ASCII digit shapes — `[0-9]` rather than
/// the Unicode-aware `\d` keeps the accepted set exactly `0`..`9`.
static STUDENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^S[0-9]{8}$").expect("student id pattern is a valid literal"));

/// Return the input as a validated student id, or `None` with no side
/// effects when it does not match the expected format.
pub fn validate_scan(raw: &str) -> Option<&str> {
    STUDENT_ID.is_match(raw).then_some(raw)
}

/// Debounce state for one visit to the scan screen. The first valid scan is
/// accepted; everything after that, valid or not, is ignored until the
/// session resets (navigating away and back in the original flow). Invalid
/// input never latches the session.
#[derive(Debug, Default)]
pub struct ScanSession {
    accepted: bool,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoder result through validation. Returns the accepted id
    /// exactly once per session.
    pub fn submit(&mut self, raw: &str) -> Option<String> {
        if self.accepted {
            return None;
        }
        let id = validate_scan(raw)?;
        self.accepted = true;
        Some(id.to_string())
    }

    /// Whether this session has already accepted a scan.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Arm the session for the next physical scan.
    pub fn reset(&mut self) {
        self.accepted = false;
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
