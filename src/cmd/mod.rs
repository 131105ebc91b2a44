pub mod assist;
pub mod config;
pub mod models;
pub mod session;
