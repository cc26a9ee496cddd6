//! Request handler module
//!
//! Routes incoming requests to the health check and the calculation tools.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
