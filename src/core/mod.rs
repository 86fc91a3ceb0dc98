//! Core business logic
//!
//! This module contains the sync pipeline:
//! - [`payload`]: record to API payload, omit-if-empty policy
//! - [`classify`]: create / update / inactivate decision
//! - [`submit`]: HTTP submission with retry and failure ledger
//! - [`outcome`]: response to outcome category
//! - [`sync`]: batch orchestration and run summary

pub mod classify;
pub mod outcome;
pub mod payload;
pub mod submit;
pub mod sync;
