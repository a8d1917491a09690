//! Core types for kubetemplate.
//!
//! This crate contains:
//! - The error taxonomy shared by every stage of a launch run
//! - Kind descriptors (group/version/kind)
//! - The multi-document manifest splitter
//! - The `Launch` trait and the transactional create/rollback engine

pub mod error;
pub mod kind;
pub mod launch;
pub mod manifest;
pub mod transaction;

pub use error::{Action, BoxError, Error, Result};
pub use kind::KindDescriptor;
pub use launch::Launch;
pub use manifest::split_documents;
pub use transaction::{ApplyFailure, RollbackOrder, RunState, Transaction, TransactionLog};
