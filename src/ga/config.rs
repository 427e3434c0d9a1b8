//! Search configuration.
//!
//! [`SearchConfig`] holds every parameter that controls the evolutionary
//! loop: population sizing, the three stop conditions, scoring policies
//! and reproducibility.

use super::fitness::{InfeasibilityPolicy, OverduePolicy};
use super::operators::FillProbability;
use crate::error::{FleetpackError, Result};
use std::time::Duration;

/// Smallest population that still keeps one elite per generation.
pub const MIN_POPULATION_SIZE: usize = 10;

/// Configuration for one search run.
///
/// # Defaults
///
/// ```
/// use u_fleetpack::ga::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.repetition_limit, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use std::time::Duration;
/// use u_fleetpack::ga::{OverduePolicy, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_population_size(200)
///     .with_repetition_limit(500)
///     .with_minimum_growth(0.1)
///     .with_max_time(Duration::from_secs(30))
///     .with_overdue_policy(OverduePolicy::AllOverdue)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Genomes per generation (`P`). Must be at least 10 so that
    /// `P / 10` elites survive each generation.
    pub population_size: usize,

    /// Consecutive generations without improvement before stopping.
    ///
    /// Also scales stability: after `s` stagnant generations the mutation
    /// share per gene is `s / repetition_limit`.
    pub repetition_limit: usize,

    /// Minimum improvement per stagnant generation spent.
    ///
    /// When the best score improves after `s > 0` stagnant generations by
    /// `growth`, the search stops if `growth / s < minimum_growth`.
    pub minimum_growth: f64,

    /// Wall-clock budget. The loop stops when elapsed time plus the mean
    /// generation time would exceed it.
    pub max_time: Duration,

    /// Emit progress every `max(1, repetition_limit / 20)` generations.
    pub verbose: bool,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Which overdue items are penalized.
    pub overdue_policy: OverduePolicy,

    /// How overloaded assignments are scored.
    pub infeasibility_policy: InfeasibilityPolicy,

    /// Probability of a random gene naming a real carrier.
    pub fill_probability: FillProbability,

    /// Maximum number of memoized scores (LRU eviction).
    pub cache_capacity: usize,

    /// Score new genomes on the rayon pool (requires the `parallel` feature).
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            repetition_limit: 1000,
            minimum_growth: 0.01,
            max_time: Duration::from_secs(60 * 60),
            verbose: true,
            seed: None,
            overdue_policy: OverduePolicy::default(),
            infeasibility_policy: InfeasibilityPolicy::default(),
            fill_probability: FillProbability::default(),
            cache_capacity: 100_000,
            parallel: false,
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the stagnation cutoff.
    pub fn with_repetition_limit(mut self, n: usize) -> Self {
        self.repetition_limit = n;
        self
    }

    /// Sets the minimum growth rate.
    pub fn with_minimum_growth(mut self, growth: f64) -> Self {
        self.minimum_growth = growth;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = max_time;
        self
    }

    /// Sets the wall-clock budget in whole minutes.
    pub fn with_max_minutes(self, minutes: u64) -> Self {
        self.with_max_time(Duration::from_secs(minutes * 60))
    }

    /// Enables or disables progress reporting.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the overdue penalty policy.
    pub fn with_overdue_policy(mut self, policy: OverduePolicy) -> Self {
        self.overdue_policy = policy;
        self
    }

    /// Sets the infeasibility policy.
    pub fn with_infeasibility_policy(mut self, policy: InfeasibilityPolicy) -> Self {
        self.infeasibility_policy = policy;
        self
    }

    /// Sets the gene fill probability.
    pub fn with_fill_probability(mut self, fill: FillProbability) -> Self {
        self.fill_probability = fill;
        self
    }

    /// Sets the memo cache bound.
    pub fn with_cache_capacity(mut self, entries: usize) -> Self {
        self.cache_capacity = entries;
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset for quick answers on small catalogs.
    ///
    /// - Population: 50, Repetition limit: 200, Minimum growth: 0.1
    /// - Time limit: 10s
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            repetition_limit: 200,
            minimum_growth: 0.1,
            max_time: Duration::from_secs(10),
            ..Self::default()
        }
    }

    /// Preset for day-to-day warehouse planning.
    ///
    /// - Population: 100, Repetition limit: 500, Minimum growth: 0.1
    /// - Time limit: 5 min
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            repetition_limit: 500,
            minimum_growth: 0.1,
            max_time: Duration::from_secs(5 * 60),
            ..Self::default()
        }
    }

    /// Preset for long overnight planning runs.
    ///
    /// - Population: 150, Repetition limit: 5000, Minimum growth: 0.01
    /// - Time limit: 60 min
    pub fn thorough() -> Self {
        Self {
            population_size: 150,
            repetition_limit: 5000,
            minimum_growth: 0.01,
            max_time: Duration::from_secs(60 * 60),
            ..Self::default()
        }
    }

    /// Generations between progress reports.
    pub fn report_interval(&self) -> usize {
        (self.repetition_limit / 20).max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(FleetpackError::InvalidConfig(format!(
                "population_size must be at least {}, got {}",
                MIN_POPULATION_SIZE, self.population_size
            )));
        }
        if !self.minimum_growth.is_finite() || self.minimum_growth < 0.0 {
            return Err(FleetpackError::InvalidConfig(
                "minimum_growth must be finite and non-negative".into(),
            ));
        }
        if self.max_time.is_zero() {
            return Err(FleetpackError::InvalidConfig(
                "max_time must be positive".into(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(FleetpackError::InvalidConfig(
                "cache_capacity must be at least 1".into(),
            ));
        }
        if let FillProbability::Fixed(p) = self.fill_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(FleetpackError::InvalidConfig(format!(
                    "fixed fill probability must be in [0, 1], got {}",
                    p
                )));
            }
        }
        Ok(())
    }
}
