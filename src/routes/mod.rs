pub mod auth_routes;
pub mod payment_routes;
pub mod reservation_routes;
