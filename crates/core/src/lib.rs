//! BrewDesk Core - Shared types library.
//!
//! This crate provides common types used across all BrewDesk components:
//! - `dashboard` - Client-side catalog library (sync repository, view binder)
//! - `server` - REST API server backed by a JSON data file
//! - `cli` - Command-line tools for seeding and backup
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no storage access. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and roles
//! - [`product`] - Product record and its input/patch shapes
//! - [`user`] - User record and session state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod product;
pub mod types;
pub mod user;

pub use product::*;
pub use types::*;
pub use user::*;
