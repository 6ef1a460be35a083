//! Core library components.
//!
//! Schema validation, the descriptor codec, deployment keys, the secret
//! vault and the change-impact classifier. Everything here is synchronous
//! and free of process-wide mutable state.

pub mod codec;
pub mod config;
pub mod constants;
pub mod deployment_key;
pub mod diff;
pub mod domain;
pub mod keystore;
pub mod report;
pub mod rules;
pub mod schema;
pub mod validation;
pub mod vault;
