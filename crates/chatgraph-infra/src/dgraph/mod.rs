//! Dgraph integration.
//!
//! [`client::DgraphClient`] implements `GraphStore` over Dgraph's HTTP API;
//! everything else is written against the trait.

pub mod client;
pub mod history;
pub mod probe;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;
