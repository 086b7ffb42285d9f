//! Core types for Carrito.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod payment;
pub mod price;
pub mod product;
pub mod quantity;
pub mod role;

pub use id::*;
pub use payment::PaymentInfo;
pub use price::{Price, PriceError};
pub use product::Product;
pub use quantity::{Quantity, QuantityError};
pub use role::{Capability, Role};
