//! Presentation Layer
//!
//! HTTP handlers, DTOs, middleware, and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::{AuthMiddlewareState, ClientIp, CurrentUser};
pub use router::{auth_router, auth_router_generic};
