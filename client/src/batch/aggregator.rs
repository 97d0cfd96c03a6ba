//! Result aggregation for batch runs.
//!
//! Folds per-chunk outcomes into a [`BatchReport`] and normalizes the many
//! shapes a chunk failure can take into a flat list of [`SubError`]s.

use super::types::SubError;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::time::Duration;

/// A failure returned by a chunk send operation.
///
/// Implementors that carry a structured list of per-record errors expose it
/// through [`ChunkFailure::sub_errors`]; everything else is reported as a
/// single opaque entry built from [`ChunkFailure::describe`].
pub trait ChunkFailure {
    /// Structured sub-errors carried by this failure, if it has a list.
    fn sub_errors(&self) -> Option<&[SubError]> {
        None
    }

    /// Text used when the failure is recorded as one opaque entry.
    fn describe(&self) -> String;
}

impl ChunkFailure for String {
    fn describe(&self) -> String {
        self.clone()
    }
}

impl ChunkFailure for str {
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl ChunkFailure for SubError {
    fn describe(&self) -> String {
        self.message.clone()
    }
}

impl ChunkFailure for Vec<SubError> {
    fn sub_errors(&self) -> Option<&[SubError]> {
        Some(self)
    }

    fn describe(&self) -> String {
        self.iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl ChunkFailure for Box<dyn Error + Send + Sync> {
    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Normalizes a chunk failure into report entries.
///
/// A failure exposing a sub-error list contributes that list, in order;
/// any other failure contributes exactly one entry.
pub fn collect_errors<E: ChunkFailure + ?Sized>(failure: &E) -> Vec<SubError> {
    match failure.sub_errors() {
        Some(errors) => errors.to_vec(),
        None => vec![SubError::new(failure.describe())],
    }
}

/// Aggregate outcome of one batch run.
///
/// Counts always satisfy `successful + failed == total`, both at the batch
/// (chunk) and the record level. A run whose chunks all failed is still a
/// report, not an error: callers detect partial failure by inspecting the
/// failed counts and `errors`.
///
/// # Examples
///
/// ```no_run
/// use bizops::batch::{BatchReport, SubError};
///
/// let mut report = BatchReport::new();
/// report.add_success(3);
/// report.add_failure(3, &vec![SubError::new("Oh no!")]);
///
/// if report.is_complete_success() {
///     println!("All records written");
/// } else {
///     println!("{} of {} records failed",
///              report.failed_record_count, report.total_record_count);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Number of chunks sent
    pub total_batch_count: usize,
    /// Number of chunks accepted by the API
    pub successful_batch_count: usize,
    /// Number of chunks rejected or failed in transit
    pub failed_batch_count: usize,
    /// Number of records across all chunks
    pub total_record_count: usize,
    /// Number of records in accepted chunks
    pub successful_record_count: usize,
    /// Number of records in failed chunks
    pub failed_record_count: usize,
    /// Errors collected from failed chunks, in chunk order
    pub errors: Vec<SubError>,
    /// Wall-clock time of the whole run, including rate-limit waits
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self, record_count: usize) {
        self.total_batch_count += 1;
        self.successful_batch_count += 1;
        self.total_record_count += record_count;
        self.successful_record_count += record_count;
    }

    pub fn add_failure<E: ChunkFailure + ?Sized>(&mut self, record_count: usize, failure: &E) {
        self.total_batch_count += 1;
        self.failed_batch_count += 1;
        self.total_record_count += record_count;
        self.failed_record_count += record_count;
        self.errors.extend(collect_errors(failure));
    }

    /// `true` when every chunk was accepted
    pub fn is_complete_success(&self) -> bool {
        self.failed_batch_count == 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed_batch_count > 0
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
