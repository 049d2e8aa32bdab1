pub mod action;
pub mod context;
pub mod controller;
pub mod error;
pub mod payload;
pub mod routes;

pub use routes::api_routes;
