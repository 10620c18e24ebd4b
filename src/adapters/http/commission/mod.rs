//! HTTP adapter for the commission engine.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AdminUser, AuthenticatedProvider, CommissionApiError, CommissionAppState};
pub use routes::{commission_router, commission_routes, webhook_routes};
