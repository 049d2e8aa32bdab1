pub mod activity;
pub mod api;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod files;
pub mod inquiries;
pub mod metrics;
pub mod products;
pub mod settings;
pub mod users;
