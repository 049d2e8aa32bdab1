pub mod controller;
pub mod crud;
pub mod schema;
