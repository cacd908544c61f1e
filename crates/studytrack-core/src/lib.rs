//! Mock-test scoring, test sessions and study analytics.
//!
//! This crate defines the record types exchanged with the persistence layer,
//! the scoring rules for a submitted mock test, and the aggregation rules that
//! turn a learner's history into dashboard and analytics figures.

pub mod analytics;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
