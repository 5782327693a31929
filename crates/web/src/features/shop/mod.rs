pub mod gateway;
pub mod handlers;
pub mod routes;
pub mod services;
