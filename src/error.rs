//! Error type shared by the search engine and its I/O collaborators.

use thiserror::Error;

/// Errors raised before a search starts or while moving catalogs and
/// manifests in and out of the engine.
///
/// An overloaded truck is never an error: it is scored as an infeasible
/// assignment and competes in the population like any other genome.
#[derive(Debug, Error)]
pub enum FleetpackError {
    /// A [`SearchConfig`](crate::ga::SearchConfig) parameter is out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    /// The catalog holds no items.
    #[error("catalog must contain at least one item")]
    EmptyCatalog,

    /// The fleet holds no carriers.
    #[error("fleet must contain at least one carrier")]
    EmptyFleet,

    /// More carriers than a gene can address.
    #[error("fleet has {count} carriers, at most {max} are supported")]
    TooManyCarriers { count: usize, max: usize },

    /// An item with a non-positive weight or a non-finite value.
    #[error("item {id} is invalid: {reason}")]
    InvalidItem { id: u64, reason: String },

    /// A carrier with a non-positive or non-finite capacity.
    #[error("carrier {index} has invalid capacity {capacity}")]
    InvalidCapacity { index: usize, capacity: f64 },

    /// A genome whose length or carrier indices do not match the problem.
    #[error("invalid genome: {0}")]
    InvalidGenome(String),

    /// A seeder request outside the supported item count.
    #[error("cannot generate {0} items: count must be in 1..9000000000")]
    InvalidSeedCount(u64),

    /// A catalog row that cannot be turned into an item.
    #[error("catalog line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// Malformed CSV input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure while reading a catalog or writing manifests.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FleetpackError>;
