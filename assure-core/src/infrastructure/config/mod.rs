// assure-core/src/infrastructure/config/mod.rs

pub mod client;

pub use client::{
    ApiConfig, ClientConfig, PollingConfig, SessionConfig, load_client_config,
    load_client_config_with,
};
