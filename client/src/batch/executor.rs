use super::aggregator::{BatchReport, ChunkFailure};
use super::chunker::chunk;
use super::types::{BatchConfig, BatchError};
use std::future::Future;
use tokio::time::Instant;

/// Sends each batch through `send_chunk`, one at a time and in order, and
/// records the outcomes.
///
/// A failed batch never stops the run: its records are counted as failed,
/// its errors are collected and the next batch is sent. Batches are awaited
/// sequentially so the counters need no synchronization; concurrency and
/// rate limits belong to whatever `send_chunk` sends through.
pub async fn process_batches<'a, T, R, E, F, Fut>(
    record_type: &'a str,
    batches: Vec<Vec<T>>,
    mut send_chunk: F,
) -> BatchReport
where
    F: FnMut(&'a str, Vec<T>) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: ChunkFailure,
{
    let mut report = BatchReport::new();
    let total = batches.len();

    for (index, batch) in batches.into_iter().enumerate() {
        let record_count = batch.len();
        log::debug!(
            "Sending {} batch {}/{} ({} records)",
            record_type,
            index + 1,
            total,
            record_count
        );

        match send_chunk(record_type, batch).await {
            Ok(_) => report.add_success(record_count),
            Err(failure) => {
                log::warn!(
                    "{} batch {}/{} failed: {}",
                    record_type,
                    index + 1,
                    total,
                    failure.describe()
                );
                report.add_failure(record_count, &failure);
            }
        }
    }

    report
}

/// Chunks `items` and processes the chunks with [`process_batches`].
///
/// The report's `duration` covers chunking and every send, including time
/// spent waiting on rate limits inside `send_chunk`.
///
/// # Errors
///
/// Only [`BatchError::InvalidChunkSize`] escapes, before any chunk is sent.
/// Per-chunk failures are recorded in the returned report.
///
/// # Examples
///
/// ```no_run
/// use bizops::batch::{SubError, process_records};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let codes: Vec<String> = (0..2500).map(|i| format!("code-{i}")).collect();
///
/// let report = process_records("Team", codes, |_record_type, chunk| async move {
///     println!("sending {} codes", chunk.len());
///     Ok::<_, Vec<SubError>>(())
/// }, 1000).await?;
///
/// assert_eq!(report.total_batch_count, 3);
/// # Ok(())
/// # }
/// ```
pub async fn process_records<'a, T, R, E, F, Fut>(
    record_type: &'a str,
    items: Vec<T>,
    send_chunk: F,
    chunk_size: usize,
) -> Result<BatchReport, BatchError>
where
    F: FnMut(&'a str, Vec<T>) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: ChunkFailure,
{
    let start = Instant::now();
    let batches = chunk(items, chunk_size)?;
    let mut report = process_batches(record_type, batches, send_chunk).await;
    report.duration = start.elapsed();

    log::info!(
        "Processed {} {} records in {} batches ({} successful, {} failed) in {:?}",
        report.total_record_count,
        record_type,
        report.total_batch_count,
        report.successful_batch_count,
        report.failed_batch_count,
        report.duration
    );

    Ok(report)
}

/// Batch executor bound to a [`BatchConfig`].
#[derive(Debug, Clone, Default)]
pub struct BatchExecutor {
    config: BatchConfig,
}

impl BatchExecutor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Execute [`process_records`] with the configured chunk size
    pub async fn process_records<'a, T, R, E, F, Fut>(
        &self,
        record_type: &'a str,
        items: Vec<T>,
        send_chunk: F,
    ) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&'a str, Vec<T>) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: ChunkFailure,
    {
        process_records(record_type, items, send_chunk, self.config.chunk_size()).await
    }
}
