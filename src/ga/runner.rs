//! The evolutionary loop and its termination state machine.
//!
//! [`SearchRunner`] owns one run from start to finish: it seeds the RNG,
//! builds the evaluator and factory, draws the initial population and
//! then advances one generation at a time until [`RunState::advance`]
//! reports a [`StopReason`].

use super::config::SearchConfig;
use super::fitness::{CacheStats, FitnessEvaluator};
use super::operators::GenomeFactory;
use super::population::Population;
use super::types::Score;
use crate::error::Result;
use crate::model::{Catalog, Fleet, Genome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The best score did not improve for `repetition_limit` generations.
    RepetitionLimit,
    /// An improvement arrived too slowly relative to the stagnation it ended.
    SlowGrowth,
    /// Another generation would exceed the time budget.
    TimeLimit,
    /// The external cancel flag was raised.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::RepetitionLimit => "repetition limit",
            StopReason::SlowGrowth => "slow growth",
            StopReason::TimeLimit => "time limit",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Loop state after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Keep going.
    Running,
    /// Terminal.
    Stopped(StopReason),
}

/// Mutable bookkeeping of one run.
#[derive(Debug, Clone)]
pub struct RunState {
    generation: usize,
    best_score: Score,
    stagnant_generations: usize,
    stability: f64,
    elapsed: Duration,
    generation_time: Duration,
}

impl RunState {
    /// Fresh state at generation 0 with `initial` as the reference score.
    pub fn new(initial: Score) -> Self {
        Self {
            generation: 0,
            best_score: initial,
            stagnant_generations: 0,
            stability: 1.0,
            elapsed: Duration::ZERO,
            generation_time: Duration::ZERO,
        }
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best accepted score.
    pub fn best_score(&self) -> Score {
        self.best_score
    }

    /// Generations since the last accepted improvement.
    pub fn stagnant_generations(&self) -> usize {
        self.stagnant_generations
    }

    /// Current crossover/mutation balance in `[0, 1]`.
    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Wall-clock time measured at the last transition.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mean duration of the generations so far.
    pub fn mean_generation_time(&self) -> Duration {
        if self.generation == 0 {
            Duration::ZERO
        } else {
            self.generation_time / self.generation as u32
        }
    }

    /// Records one finished generation and decides whether to continue.
    ///
    /// `new_best` is the top score of the freshly sorted population,
    /// `cycle` the time the generation took and `elapsed` the time since
    /// the run started.
    pub fn advance(
        &mut self,
        new_best: Score,
        cycle: Duration,
        elapsed: Duration,
        config: &SearchConfig,
    ) -> SearchState {
        self.generation += 1;
        self.generation_time += cycle;
        self.elapsed = elapsed;

        if new_best > self.best_score {
            // Reaching feasibility is always accepted; the growth rate only
            // compares scores of the same kind.
            let same_kind = new_best.is_feasible() == self.best_score.is_feasible();
            let growth = new_best.value() - self.best_score.value();
            if same_kind
                && self.stagnant_generations > 0
                && growth / (self.stagnant_generations as f64) < config.minimum_growth
            {
                return SearchState::Stopped(StopReason::SlowGrowth);
            }
            self.best_score = new_best;
            self.stagnant_generations = 0;
            self.stability = 1.0;
        } else {
            self.stagnant_generations += 1;
            self.stability = if config.repetition_limit == 0 {
                0.0
            } else {
                (1.0 - self.stagnant_generations as f64 / config.repetition_limit as f64)
                    .clamp(0.0, 1.0)
            };
        }

        if self.stagnant_generations >= config.repetition_limit {
            return SearchState::Stopped(StopReason::RepetitionLimit);
        }

        if self.elapsed + self.mean_generation_time() > config.max_time {
            return SearchState::Stopped(StopReason::TimeLimit);
        }

        SearchState::Running
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Top genome of the final population.
    pub best: Genome,

    /// Its score. Check [`Score::is_usable`] before shipping the plan.
    pub best_score: Score,

    /// Generations executed.
    pub generations: usize,

    /// Why the loop ended.
    pub stop_reason: StopReason,

    /// Top score of the initial population followed by the top score after
    /// each generation.
    pub score_history: Vec<Score>,

    /// Memo cache counters at the end of the run.
    pub cache_stats: CacheStats,

    /// Total wall-clock time.
    pub elapsed: Duration,
}

/// Executes the search.
///
/// # Usage
///
/// ```
/// use u_fleetpack::ga::{SearchConfig, SearchRunner};
/// use u_fleetpack::model::{Catalog, Fleet, Item};
///
/// let catalog = Catalog::new(vec![
///     Item::new(1, 100.0, 10.0, -2),
///     Item::new(2, 100.0, 5.0, 1),
///     Item::new(3, 900.0, 50.0, -1),
/// ]).unwrap();
/// let fleet = Fleet::uniform(1, 800.0).unwrap();
/// let config = SearchConfig::default()
///     .with_population_size(20)
///     .with_repetition_limit(100)
///     .with_minimum_growth(0.0)
///     .with_verbose(false)
///     .with_seed(42);
///
/// let result = SearchRunner::run(&catalog, &fleet, &config).unwrap();
/// assert_eq!(result.best.genes(), &[1, 1, 0]);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs a search to completion.
    pub fn run(catalog: &Catalog, fleet: &Fleet, config: &SearchConfig) -> Result<SearchResult> {
        Self::run_with_cancel(catalog, fleet, config, None)
    }

    /// Runs a search with an optional cancellation flag.
    ///
    /// The flag is checked at generation boundaries only; when it is set
    /// the current best is returned with [`StopReason::Cancelled`].
    pub fn run_with_cancel(
        catalog: &Catalog,
        fleet: &Fleet,
        config: &SearchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult> {
        config.validate()?;

        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        let evaluator = FitnessEvaluator::new(catalog, fleet, config.cache_capacity)?
            .with_overdue_policy(config.overdue_policy)
            .with_infeasibility_policy(config.infeasibility_policy);
        let factory = GenomeFactory::new(catalog, fleet, config.fill_probability);

        debug!(
            items = catalog.len(),
            carriers = fleet.len(),
            population = config.population_size,
            p_fill = factory.p_fill(),
            overdue_policy = ?config.overdue_policy,
            infeasibility_policy = ?config.infeasibility_policy,
            "starting search"
        );

        let genomes: Vec<Genome> = (0..config.population_size)
            .map(|_| factory.random_genome(&mut rng))
            .collect();
        let initial_score = evaluator.score(&genomes[0]);
        let mut population = Population::from_genomes(genomes, &evaluator, config.parallel);

        let mut state = RunState::new(initial_score);
        let mut score_history = vec![population.best().score];
        let report_interval = config.report_interval();

        let stop_reason = loop {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }

            let cycle_start = Instant::now();
            population = population.next_generation(
                &factory,
                &evaluator,
                state.stability(),
                &mut rng,
                config.parallel,
            );
            let best = population.best().score;
            score_history.push(best);

            let transition = state.advance(best, cycle_start.elapsed(), start.elapsed(), config);
            if let SearchState::Stopped(reason) = transition {
                break reason;
            }

            if config.verbose && state.generation() % report_interval == 0 {
                info!(
                    generation = state.generation(),
                    best_score = %state.best_score(),
                    stability = (state.stability() * 100.0).round() / 100.0,
                    "search progress"
                );
            }
        };

        let cache_stats = evaluator.cache_stats();
        trace!(
            hits = cache_stats.hits,
            misses = cache_stats.misses,
            entries = cache_stats.entries,
            "fitness cache"
        );

        let generations = state.generation();
        let best = population.into_best();
        info!(
            generation = generations,
            best_score = %best.score,
            reason = %stop_reason,
            "search stopped"
        );

        Ok(SearchResult {
            best: best.genome,
            best_score: best.score,
            generations,
            stop_reason,
            score_history,
            cache_stats,
            elapsed: start.elapsed(),
        })
    }
}
