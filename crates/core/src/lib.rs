//! Basket Core - Shared cart domain types.
//!
//! This crate provides the cart domain types used by:
//! - `store` - The cart state container and its persistence adapters
//! - `cli` - Command-line front end over a directory-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, catalog products and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
