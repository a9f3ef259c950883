//! Shared contracts for the cacheaside data-access layer.
//!
//! This crate defines the boundaries the cache-aside repositories are built
//! against: the [`cache::Cache`] service contract with key derivation and
//! glob matching, and the [`store::Store`] contract with predicates and
//! transaction handles. Concrete backends and the repositories themselves
//! live in the `cacheaside` crate.

pub mod cache;
pub mod store;
