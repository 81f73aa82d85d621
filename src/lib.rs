pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod ports;
