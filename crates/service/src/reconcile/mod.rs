//! Account-to-role reconciliation.
//!
//! Runs at login time and guarantees that every authenticated identity
//! has exactly one profile row and, for providers, exactly one listing
//! row, before the caller is allowed to navigate anywhere. Every step is
//! idempotent and tolerant of the same identity racing itself from a
//! second session.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;

pub mod repo {
    pub mod seaorm;
}
