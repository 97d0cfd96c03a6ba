//! # Client Utilities Module
//!
//! Helpers shared by the transport and the API surfaces.
//!
//! ## Available Utilities
//!
//! - [`env`] - Validated access to environment variables, used to build
//!   client options from `BIZ_OPS_*` variables
//! - [`url`] - URL joining and query string rendering
//!
//! ```no_run
//! use bizops::utils::url::{join_url, query_string};
//!
//! let qs = query_string([("dryRun", Some("true".to_string())), ("upsert", None)]);
//! assert_eq!(qs, "dryRun=true");
//! assert_eq!(join_url("https://api.example.com/", "/v1/batch"), "https://api.example.com/v1/batch");
//! ```

pub mod env;
pub mod url;
