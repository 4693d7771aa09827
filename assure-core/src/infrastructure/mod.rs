// assure-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod session;

pub use adapters::HttpApiClient;
pub use session::{Session, SessionHandle, TokenStore};
