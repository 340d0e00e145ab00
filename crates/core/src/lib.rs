//! Stocklist Core - Shared types library.
//!
//! This crate provides common types used across all Stocklist components:
//! - `server` - The catalog web application
//! - `integration-tests` - End-to-end request tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
