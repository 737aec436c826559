//! Core types for Basket.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod id;
pub mod item;
pub mod price;

pub use id::ProductId;
pub use item::{CartItem, Fields, Product};
pub use price::{Price, PriceError};
