//! Batch module for chunked, rate-limited record processing
//!
//! This module turns one large list of records into a sequence of bounded
//! requests and reports how each of them fared. It is split into several
//! specialized components:
//!
//! - `types`: Common types and configuration
//! - `chunker`: Splitting item lists into ordered chunks
//! - `aggregator`: Failure normalization and the final report
//! - `executor`: Sequential chunk dispatch and bookkeeping

pub mod aggregator;
pub mod chunker;
pub mod executor;
pub mod types;

pub use aggregator::{BatchReport, ChunkFailure, collect_errors};
pub use chunker::{chunk, chunk_slice};
pub use executor::{BatchExecutor, process_batches, process_records};
pub use types::{BatchConfig, BatchError, DEFAULT_CHUNK_SIZE, SubError};
