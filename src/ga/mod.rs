//! Genetic search over truck assignments.
//!
//! A genome assigns each catalog item to a truck `1..=K` or to the reserve
//! (`0`). Each generation keeps the best tenth, adds a tenth of random
//! immigrants and breeds the rest from the better half. Mutation pressure
//! rises as the best score stagnates and resets when it improves.
//!
//! # Key Types
//!
//! - [`SearchConfig`]: population size, stop conditions, scoring policies
//! - [`FitnessEvaluator`]: memoized scoring and feasibility
//! - [`GenomeFactory`]: random genomes and crossover/mutation
//! - [`Population`]: elitism, immigration and breeding
//! - [`SearchRunner`] / [`RunState`]: the loop and its stop conditions
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Martello & Toth (1990), *Knapsack Problems: Algorithms and Computer
//!   Implementations*, ch. 6 (multiple knapsack)

mod config;
mod fitness;
mod operators;
mod population;
mod runner;
mod types;

pub use config::{SearchConfig, MIN_POPULATION_SIZE};
pub use fitness::{
    CacheStats, FitnessEvaluator, InfeasibilityPolicy, OverduePolicy, INFEASIBLE_PENALTY_FACTOR,
};
pub use operators::{FillProbability, GenomeFactory};
pub use population::{donor_count, elite_count, immigrant_count, Member, Population};
pub use runner::{RunState, SearchResult, SearchRunner, SearchState, StopReason};
pub use types::Score;
