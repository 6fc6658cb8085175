//! Boardhouse Core - Shared types and cart logic.
//!
//! This crate provides the types and components used across all Boardhouse
//! components:
//! - `storefront` - Public-facing shop site
//! - `integration-tests` - End-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types, traits, and pure logic - no file or
//! network I/O. The cart store is generic over the [`kv::KeyValueStore`]
//! trait; durable implementations live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails,
//!   plus the product model served by the shop API
//! - [`kv`] - The durable key-value slot contract and an in-memory store
//! - [`cart`] - Cart data model and the write-through cart store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod kv;
pub mod types;

pub use cart::{CART_KEY, Cart, CartItem, CartStore};
pub use kv::{KeyValueStore, MemoryStore};
pub use types::*;
