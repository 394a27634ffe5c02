//! Error types for Rebound
//!
//! Two families of errors live in this crate:
//! - [`ReboundError`]: the ambient error for configuration loading and
//!   other plumbing around the resilience layer
//! - [`crate::recovery::RecoveryError`]: the failure of a guarded call,
//!   generic over the operation's own error type

mod constructors;
mod types;

pub use types::{ReboundError, ReboundResult};
