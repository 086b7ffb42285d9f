//! Carrito Core - Shared types and cart state.
//!
//! This crate provides the types used by the Carrito storefront:
//! - [`types`] - Newtype wrappers for IDs, prices, quantities, roles and products
//! - [`cart`] - The per-session cart state manager
//! - [`sales`] - The sales series shown on the sales report
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no sessions. Everything here can be exercised directly in
//! unit tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod sales;
pub mod types;

pub use cart::{Cart, CartEntry, CartState, DrawerVisibility, ReduceOutcome};
pub use types::*;
