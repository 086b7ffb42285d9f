//! Role-gated management screens.
//!
//! Every handler here takes [`RequireAdmin`](crate::middleware::RequireAdmin),
//! so visitors without the `admin` role get the access-denied page before any
//! API call is made.

pub mod orders;
pub mod products;
