// assure-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contracts of the platform services (assessments, documents).
pub mod ports;

// 2. Domain (Cœur du métier)
// Response records, status vocabularies, aggregation, selection, review transforms.
// Depends on nothing else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// HTTP client, session/token store, config files.
// Depends on Domain and Ports.
pub mod infrastructure;

// 4. Application (Use Cases)
// Job poller, list reconciliation, consultant review overlay.
// Depends on Domain and Ports only.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use assure_core::AssureError;
pub use error::AssureError;
