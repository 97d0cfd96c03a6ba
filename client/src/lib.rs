//! # Biz Ops Client Library
//!
//! Client library for the Biz Ops record-management API. Its core is a
//! chunked batch-dispatch engine: large record collections are split into
//! bounded chunks, each chunk is sent through a shared rate-limited
//! dispatcher, and the per-chunk outcomes are folded into one report.
//!
//! ## Modules
//!
//! - [`batch`] - Chunking, sequential batch execution and result aggregation
//! - [`common`] - Rate limiting, admission control and error types
//! - [`transport`] - HTTP transport with default headers and rate limiting
//! - [`api`] - Batch, node and GraphQL endpoints
//! - [`client`] - The [`BizOpsClient`] entry point and its options
//! - [`importer`] - Helpers for diffing source records against Biz Ops
//! - [`utils`] - Utility functions and helpers

pub mod api;
pub mod batch;
pub mod client;
pub mod common;
pub mod importer;
pub mod transport;
pub mod utils;

pub use api::{BatchParams, NodeParams, RelationshipAction};
pub use batch::{BatchConfig, BatchError, BatchReport, SubError, chunk, process_records};
pub use client::{BizOpsClient, ClientOptions};
pub use common::{ApiError, ConfigurationError, Dispatcher, RateLimiterConfig, Schedule};
pub use importer::{HasCode, RecordActions, compare_records_by_code};
