// HTTP surface for the three service roles.

pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod wiring;

pub use routes::{backend_router, gateway_router, monolith_router};
pub use server::serve;
pub use wiring::{build_gateway, build_resolution_service};
