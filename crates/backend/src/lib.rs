//! `glowdesk-backend` — ports for the opaque external collaborators.
//!
//! The dashboard core never owns business rules: bookings, commission math,
//! tenant provisioning and the rest live behind a remote relational backend.
//! This crate defines the seams the core talks through (identity provider,
//! tabular data store, remote-procedure surface, durable key/value storage)
//! together with in-memory implementations for tests/dev and a REST
//! implementation for production.

pub mod error;
pub mod identity;
pub mod rest;
pub mod rpc;
pub mod storage;
pub mod store;

pub use error::BackendError;
pub use identity::{
    AuthEvent, AuthEvents, IdentityProvider, InMemoryIdentityProvider, ProviderSession,
    SessionFetch,
};
pub use rest::RestBackend;
pub use rpc::{InMemoryRpcSurface, RpcReply, RpcSurface};
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage};
pub use store::{DataStore, Filter, InMemoryDataStore, Query};
