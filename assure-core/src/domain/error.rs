// assure-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Response '{0}' is not part of this assessment")]
    #[diagnostic(
        code(assure::domain::response_not_found),
        help("Reload the report; the response set may have been superseded by a re-run.")
    )]
    ResponseNotFound(String),

    #[error("Unknown {kind} value: '{value}'")]
    #[diagnostic(code(assure::domain::vocabulary))]
    UnknownVocabulary { kind: &'static str, value: String },

    #[error("Assessment '{assessment_id}' failed: {reason}")]
    #[diagnostic(
        code(assure::domain::job_failed),
        help("Start a new analysis once the document has been checked.")
    )]
    JobFailed {
        assessment_id: String,
        reason: String,
    },
}
