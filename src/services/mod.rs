pub mod data_url;
pub mod google;
pub mod hashing;
pub mod jwt;
pub mod metrics;
pub mod rate_limit;
pub mod security;
