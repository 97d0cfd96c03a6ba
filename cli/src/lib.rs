//! # Biz Ops CLI
//!
//! Command line front end for the Biz Ops client: loads layered
//! configuration, installs logging and runs batch imports, diffs and
//! GraphQL queries.

pub mod commands;
pub mod config;
pub mod logger;
