//! Graph store abstraction.

pub mod store;
