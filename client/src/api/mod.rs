//! Biz Ops API surfaces.
//!
//! Each surface borrows the client's [`Transport`](crate::transport::Transport)
//! and maps its operations onto endpoint paths:
//!
//! - [`BatchApi`] - Bulk create/update and delete of records of one type
//! - [`NodeApi`] - Single record operations on `/v2/node`
//! - [`GraphQlApi`] - Read queries against the GraphQL endpoint

pub mod batch;
pub mod graphql;
pub mod node;

pub use batch::{BatchApi, BatchParams, DEFAULT_BATCH_ENDPOINT};
pub use graphql::{DEFAULT_GRAPHQL_ENDPOINT, GraphQlApi, handle_result};
pub use node::{NodeApi, NodeParams, RelationshipAction};
