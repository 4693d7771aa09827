// assure-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssureError {
    // --- ERREURS DU DOMAINE (Vocabulaire, Revue, Job) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (HTTP, IO, Config) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl AssureError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Infrastructure(e) if e.is_transient())
    }

    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::Infrastructure(e) if e.is_shape_error())
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Infrastructure(e) if e.is_rejection())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Infrastructure(InfrastructureError::Unauthorized))
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for AssureError {
    fn from(err: std::io::Error) -> Self {
        AssureError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<reqwest::Error> for AssureError {
    fn from(err: reqwest::Error) -> Self {
        AssureError::Infrastructure(InfrastructureError::Http(err))
    }
}
