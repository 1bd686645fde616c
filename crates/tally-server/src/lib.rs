pub mod app;
pub mod client_ip;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
