// Library surface for the collect/tui bins and integration tests

pub mod collector;
pub mod config;
pub mod dashboard;
pub mod hosts_repo;
pub mod inventory;
pub mod models;
pub mod scheduler;
pub mod version;
