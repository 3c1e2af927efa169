//! # Rosterhub Core
//!
//! Domain types, traits, and error definitions for the rosterhub student
//! record service. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external seams of the system are defined as traits here:
//! [`Provider`] (the LLM backend) and [`RecordPersistence`] (the durable
//! mirror of the record snapshot). Implementations live in their respective
//! crates, which keeps the dependency graph pointing inward and lets tests
//! substitute stubs at either seam.

pub mod error;
pub mod message;
pub mod persist;
pub mod provider;
pub mod record;
pub mod result;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, StoreError};
pub use message::{ChatTurn, Role};
pub use persist::RecordPersistence;
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use record::StudentRecord;
pub use result::{FailureKind, ProviderResult};
