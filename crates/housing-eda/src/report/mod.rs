//! Profiling report schema.
//!
//! The typed shape of the EDA artifact: dataset table summary, per-variable
//! statistics, histograms, correlation matrices, missing-data visuals,
//! scatter relationships, alerts and row snapshots.
//!
//! Variables are a tagged sum type ([`Variable`]) so every consumer matches
//! exhaustively on `Numeric`, `Categorical` and `Unknown` instead of probing
//! optional fields.
//!
//! Column order, type order and correlation row order travel as JSON object
//! key order, so every keyed section is an [`indexmap::IndexMap`] and keeps document
//! order through a parse and serialize cycle.

mod types;

pub use types::{
    Analysis, CategoricalVariable, CommonStats, CorrelationMatrix, Histogram,
    MissingDataArtifact, NumericStats, NumericVariable, ProfilingReport, Table, UnknownVariable,
    Variable,
};
