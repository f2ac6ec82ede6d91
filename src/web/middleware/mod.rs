//! Middleware for the HTTP surface.

pub mod auth;
pub mod panic;

pub use auth::basic_auth;
pub use panic::handle_panic;
