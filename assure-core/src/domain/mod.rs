pub mod assessment;
pub mod compliance;
pub mod document;
pub mod error;
pub mod selection;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
pub use selection::select_current_assessment;
