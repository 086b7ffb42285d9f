//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Session layer (tower-sessions, in-memory store)
//!
//! The role gate is an extractor ([`RequireAdmin`]) rather than a layer so
//! that it only applies to the handlers that ask for it.

pub mod access;
pub mod request_id;
pub mod session;

pub use access::{AccessContext, AccessDenied, RequireAdmin, clear_identity, set_identity};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
