//! HTTP API: routes, handlers and error responses.

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{create_router, route_path};
