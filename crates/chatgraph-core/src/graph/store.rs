//! GraphStore trait definition.
//!
//! The narrow surface chatgraph needs from a Dgraph-style database: read
//! queries returning JSON, committed mutations, and schema alteration.

use std::sync::Arc;

use chatgraph_types::graph::{GraphError, GraphQuery, Mutation, MutationResponse};

/// Trait for graph database backends.
///
/// Implementations live in chatgraph-infra (e.g., `DgraphClient`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait GraphStore: Send + Sync {
    /// Run a read-only query and return the `data` object of the response.
    fn query(
        &self,
        query: &GraphQuery,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, GraphError>> + Send;

    /// Apply a mutation and commit it immediately.
    fn mutate(
        &self,
        mutation: &Mutation,
    ) -> impl std::future::Future<Output = Result<MutationResponse, GraphError>> + Send;

    /// Apply a schema definition. Re-applying the same schema is a no-op.
    fn alter_schema(
        &self,
        schema: &str,
    ) -> impl std::future::Future<Output = Result<(), GraphError>> + Send;
}

impl<G: GraphStore> GraphStore for Arc<G> {
    fn query(
        &self,
        query: &GraphQuery,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, GraphError>> + Send {
        (**self).query(query)
    }

    fn mutate(
        &self,
        mutation: &Mutation,
    ) -> impl std::future::Future<Output = Result<MutationResponse, GraphError>> + Send {
        (**self).mutate(mutation)
    }

    fn alter_schema(
        &self,
        schema: &str,
    ) -> impl std::future::Future<Output = Result<(), GraphError>> + Send {
        (**self).alter_schema(schema)
    }
}
