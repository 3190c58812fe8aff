//! Outbound adapters implementing domain ports for infrastructure.
//!
//! Adapters are thin translators between domain types and storage
//! representations; they contain no business logic. The store is the
//! single serialization point for all request handling.

pub mod persistence;
