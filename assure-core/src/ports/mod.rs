// assure-core/src/ports/mod.rs

pub mod assessment;
pub mod document;

pub use assessment::AssessmentService;
pub use document::DocumentService;
