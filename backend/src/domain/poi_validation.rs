//! Record validation for candidate POIs.
//!
//! Validation partitions an upload into accepted candidates and per-row
//! diagnostics. Every applicable reason is collected for a rejected row,
//! not only the first.

use std::fmt;

use super::poi::{CandidatePoi, TITLE_MAX_CHARS};

/// Why a candidate row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RejectionReason {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Title is longer than the store column allows.
    TitleTooLong,
    /// Latitude is exactly zero (usually a missing or non-numeric cell).
    LatitudeInvalid,
    /// Longitude is exactly zero (usually a missing or non-numeric cell).
    LongitudeInvalid,
    /// Latitude lies outside `[-90, 90]`.
    LatitudeOutOfRange,
    /// Longitude lies outside `[-180, 180]`.
    LongitudeOutOfRange,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("title is empty"),
            Self::TitleTooLong => write!(f, "title exceeds {TITLE_MAX_CHARS} characters"),
            Self::LatitudeInvalid => f.write_str("latitude is invalid"),
            Self::LongitudeInvalid => f.write_str("longitude is invalid"),
            Self::LatitudeOutOfRange => f.write_str("latitude is out of range"),
            Self::LongitudeOutOfRange => f.write_str("longitude is out of range"),
        }
    }
}

/// Rejection details for one row of the upload.
///
/// # Examples
/// ```
/// use poi_backend::domain::{RejectionReason, RowDiagnostic};
///
/// let diagnostic = RowDiagnostic::new(
///     3,
///     vec![RejectionReason::EmptyTitle, RejectionReason::LatitudeInvalid],
/// );
/// assert_eq!(diagnostic.to_string(), "Row 3: title is empty, latitude is invalid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    row: usize,
    reasons: Vec<RejectionReason>,
}

impl RowDiagnostic {
    /// Build a diagnostic for the given 1-based row number.
    pub fn new(row: usize, reasons: Vec<RejectionReason>) -> Self {
        Self { row, reasons }
    }

    /// 1-based position of the row in upload order.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Reasons the row was rejected, in check order.
    #[must_use]
    pub fn reasons(&self) -> &[RejectionReason] {
        &self.reasons
    }
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: ", self.row)?;
        for (index, reason) in self.reasons.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

/// Outcome of validating one upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Accepted candidates in upload order.
    pub accepted: Vec<CandidatePoi>,
    /// Diagnostics for rejected rows in upload order.
    pub diagnostics: Vec<RowDiagnostic>,
}

impl ValidationReport {
    /// True when rows were rejected and none survived.
    #[must_use]
    pub fn all_rejected(&self) -> bool {
        self.accepted.is_empty() && !self.diagnostics.is_empty()
    }

    /// Diagnostics rendered as user-facing lines.
    #[must_use]
    pub fn diagnostic_lines(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

/// Reasons a single candidate fails validation; empty when it passes.
#[must_use]
pub fn rejection_reasons(candidate: &CandidatePoi) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();
    if candidate.title.trim().is_empty() {
        reasons.push(RejectionReason::EmptyTitle);
    } else if candidate.title.chars().count() > TITLE_MAX_CHARS {
        reasons.push(RejectionReason::TitleTooLong);
    }
    if candidate.latitude == 0.0 {
        reasons.push(RejectionReason::LatitudeInvalid);
    }
    if candidate.longitude == 0.0 {
        reasons.push(RejectionReason::LongitudeInvalid);
    }
    if !valid_latitude(candidate.latitude) {
        reasons.push(RejectionReason::LatitudeOutOfRange);
    }
    if !valid_longitude(candidate.longitude) {
        reasons.push(RejectionReason::LongitudeOutOfRange);
    }
    reasons
}

/// Partition candidates into accepted records and row diagnostics.
///
/// `accepted.len() + diagnostics.len()` always equals the input length.
///
/// # Examples
/// ```
/// use poi_backend::domain::{CandidatePoi, validate_candidates};
///
/// let report = validate_candidates(vec![
///     CandidatePoi::new("Changdeokgung", 37.5794, 126.9910),
///     CandidatePoi::new("", 0.0, 126.9910),
/// ]);
/// assert_eq!(report.accepted.len(), 1);
/// assert_eq!(
///     report.diagnostic_lines(),
///     vec!["Row 2: title is empty, latitude is invalid".to_owned()],
/// );
/// ```
#[must_use]
pub fn validate_candidates(candidates: Vec<CandidatePoi>) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let reasons = rejection_reasons(&candidate);
        if reasons.is_empty() {
            report.accepted.push(candidate);
        } else {
            report.diagnostics.push(RowDiagnostic::new(index + 1, reasons));
        }
    }
    report
}

#[rustfmt::skip]
fn valid_latitude(value: f64) -> bool { value.is_finite() && (-90.0..=90.0).contains(&value) }

#[rustfmt::skip]
fn valid_longitude(value: f64) -> bool { value.is_finite() && (-180.0..=180.0).contains(&value) }
