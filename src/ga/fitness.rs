//! Fitness evaluation with a bounded, per-run memo cache.
//!
//! [`FitnessEvaluator`] is built once per search and borrowed by every
//! component that needs a score. Scoring is a pure function of the
//! catalog, the fleet, the two policies and the genome value, so results
//! are cached by genome content. The cache sits behind a mutex and can be
//! shared by parallel scoring workers.

use super::types::Score;
use crate::error::{FleetpackError, Result};
use crate::model::{Catalog, Fleet, Genome, RESERVE};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Multiplier applied to the raw score of an overloaded assignment under
/// [`InfeasibilityPolicy::Penalize`].
pub const INFEASIBLE_PENALTY_FACTOR: f64 = 10_000.0;

/// Which overdue items pay the `deadline_offset²` penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverduePolicy {
    /// Only overdue items that are loaded. Items left in reserve are free.
    #[default]
    AssignedOnly,

    /// Every overdue item, loaded or left in reserve.
    AllOverdue,
}

/// What an overloaded carrier does to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfeasibilityPolicy {
    /// Value becomes `-|raw| × 10000`, keeping the relative order among
    /// infeasible genomes so selection can repair them gradually.
    #[default]
    Penalize,

    /// Value becomes `0`.
    Reject,
}

/// Counters describing memo cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that required a catalog scan.
    pub misses: u64,
    /// Entries currently cached.
    pub entries: usize,
}

/// Scores genomes against one catalog and fleet.
pub struct FitnessEvaluator<'a> {
    catalog: &'a Catalog,
    fleet: &'a Fleet,
    overdue_policy: OverduePolicy,
    infeasibility_policy: InfeasibilityPolicy,
    cache: Mutex<LruCache<Genome, Score>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator with default policies.
    pub fn new(catalog: &'a Catalog, fleet: &'a Fleet, cache_capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(cache_capacity).ok_or_else(|| {
            FleetpackError::InvalidConfig("cache_capacity must be at least 1".into())
        })?;
        Ok(Self {
            catalog,
            fleet,
            overdue_policy: OverduePolicy::default(),
            infeasibility_policy: InfeasibilityPolicy::default(),
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
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

    /// Returns the (cached) score of `genome`.
    ///
    /// # Panics
    /// Panics if `genome` was built for a different catalog or fleet: its
    /// length differs from the catalog or a gene names a missing carrier.
    pub fn score(&self, genome: &Genome) -> Score {
        if let Some(score) = self.lock_cache().get(genome).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return score;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let score = self.evaluate(genome);
        self.lock_cache().put(genome.clone(), score);
        score
    }

    /// Whether no carrier is loaded beyond its capacity.
    ///
    /// # Panics
    /// Same conditions as [`score`](Self::score).
    pub fn is_feasible(&self, genome: &Genome) -> bool {
        self.score(genome).is_feasible()
    }

    /// Cache counters so far.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock_cache().len(),
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<Genome, Score>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Uncached scoring: one pass over the catalog accumulating per-carrier
    /// loads, profit and penalty, then a capacity check per carrier.
    fn evaluate(&self, genome: &Genome) -> Score {
        assert_eq!(
            genome.len(),
            self.catalog.len(),
            "genome length must match the catalog"
        );

        let mut loads = vec![0.0; self.fleet.len() + 1];
        let mut profit = 0.0;
        let mut penalty = 0.0;

        for (item, &gene) in self.catalog.iter().zip(genome.genes()) {
            let assigned = gene != RESERVE;
            match loads.get_mut(usize::from(gene)) {
                Some(load) => *load += item.weight,
                None => panic!("gene {gene} names no carrier in the fleet"),
            }
            if assigned {
                profit += item.profit;
            }
            if assigned || self.overdue_policy == OverduePolicy::AllOverdue {
                penalty += item.overdue_penalty();
            }
        }

        let raw = profit - penalty;
        let feasible = self
            .fleet
            .carriers()
            .all(|carrier| loads[carrier.index as usize] <= carrier.capacity);

        if feasible {
            Score::feasible(raw)
        } else {
            match self.infeasibility_policy {
                InfeasibilityPolicy::Penalize => {
                    Score::infeasible(-raw.abs() * INFEASIBLE_PENALTY_FACTOR)
                }
                InfeasibilityPolicy::Reject => Score::infeasible(0.0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use proptest::prelude::*;

    fn scenario() -> (Catalog, Fleet) {
        let catalog = Catalog::new(vec![
            Item::new(1, 100.0, 10.0, -2),
            Item::new(2, 100.0, 5.0, 1),
            Item::new(3, 900.0, 50.0, -1),
        ])
        .unwrap();
        (catalog, Fleet::uniform(1, 800.0).unwrap())
    }

    #[test]
    fn test_assigned_overdue_penalty() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16).unwrap();

        let score = eval.score(&Genome::from_genes(vec![1, 1, 0]));
        assert!(score.is_feasible());
        assert!((score.value() - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_unassigned_overdue_is_free_by_default() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16).unwrap();

        let score = eval.score(&Genome::from_genes(vec![0, 1, 0]));
        assert!((score.value() - 5.0).abs() < 1e-10);

        let empty = eval.score(&Genome::from_genes(vec![0, 0, 0]));
        assert!((empty.value() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_all_overdue_policy_charges_reserve() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16)
            .unwrap()
            .with_overdue_policy(OverduePolicy::AllOverdue);

        // Reserve still pays for item 1 (4) and item 3 (1).
        let score = eval.score(&Genome::from_genes(vec![0, 1, 0]));
        assert!((score.value() - 0.0).abs() < 1e-10);

        let best = eval.score(&Genome::from_genes(vec![1, 1, 0]));
        assert!((best.value() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_overload_is_penalized() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16).unwrap();

        // Item 3 alone weighs 900 > 800: raw = 50 - 1 = 49.
        let genome = Genome::from_genes(vec![0, 0, 1]);
        let score = eval.score(&genome);
        assert!(!score.is_feasible());
        assert!(!eval.is_feasible(&genome));
        assert!((score.value() + 49.0 * INFEASIBLE_PENALTY_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_reject_policy_zeroes_overload() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16)
            .unwrap()
            .with_infeasibility_policy(InfeasibilityPolicy::Reject);

        let score = eval.score(&Genome::from_genes(vec![1, 1, 1]));
        assert!(!score.is_feasible());
        assert_eq!(score.value(), 0.0);
        assert!(Score::feasible(-3.0) > score);
    }

    #[test]
    fn test_reserve_is_never_capacity_checked() {
        let catalog = Catalog::new(vec![Item::new(1, 5000.0, 1.0, 0)]).unwrap();
        let fleet = Fleet::uniform(1, 10.0).unwrap();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 4).unwrap();
        assert!(eval.is_feasible(&Genome::from_genes(vec![0])));
    }

    #[test]
    fn test_per_carrier_capacity() {
        let catalog = Catalog::new(vec![
            Item::new(1, 150.0, 1.0, 0),
            Item::new(2, 150.0, 1.0, 0),
        ])
        .unwrap();
        let fleet = Fleet::new(vec![100.0, 200.0]).unwrap();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 4).unwrap();

        assert!(eval.is_feasible(&Genome::from_genes(vec![2, 0])));
        assert!(!eval.is_feasible(&Genome::from_genes(vec![1, 0])));
        assert!(!eval.is_feasible(&Genome::from_genes(vec![2, 2])));
    }

    #[test]
    fn test_memoization_hits() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16).unwrap();

        let first = eval.score(&Genome::from_genes(vec![1, 0, 0]));
        let second = eval.score(&Genome::from_genes(vec![1, 0, 0]));

        assert_eq!(first, second);
        assert_eq!(first.value().to_bits(), second.value().to_bits());
        let stats = eval.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_cache_is_bounded() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 2).unwrap();

        for genes in [vec![0, 0, 0], vec![1, 0, 0], vec![0, 1, 0], vec![1, 1, 0]] {
            eval.score(&Genome::from_genes(genes));
        }
        assert_eq!(eval.cache_stats().entries, 2);
    }

    #[test]
    #[should_panic(expected = "names no carrier")]
    fn test_gene_beyond_fleet_panics() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16).unwrap();
        eval.score(&Genome::from_genes(vec![0, 2, 0]));
    }

    #[test]
    #[should_panic(expected = "must match the catalog")]
    fn test_short_genome_panics() {
        let (catalog, fleet) = scenario();
        let eval = FitnessEvaluator::new(&catalog, &fleet, 16).unwrap();
        eval.is_feasible(&Genome::from_genes(vec![1, 0]));
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let (catalog, fleet) = scenario();
        assert!(matches!(
            FitnessEvaluator::new(&catalog, &fleet, 0),
            Err(FleetpackError::InvalidConfig(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_feasible_always_outranks_infeasible(
            weights in prop::collection::vec(1.0f64..300.0, 6),
            profits in prop::collection::vec(-20.0f64..50.0, 6),
            deadlines in prop::collection::vec(-5i64..6, 6),
            a in prop::collection::vec(0u16..=2, 6),
            b in prop::collection::vec(0u16..=2, 6),
        ) {
            let items = (0..6)
                .map(|i| Item::new(i as u64, weights[i], profits[i], deadlines[i]))
                .collect();
            let catalog = Catalog::new(items).unwrap();
            let fleet = Fleet::uniform(2, 400.0).unwrap();
            let eval = FitnessEvaluator::new(&catalog, &fleet, 64).unwrap();

            let sa = eval.score(&Genome::from_genes(a));
            let sb = eval.score(&Genome::from_genes(b));
            if sa.is_feasible() && !sb.is_feasible() {
                prop_assert!(sa > sb);
            }
            if sb.is_feasible() && !sa.is_feasible() {
                prop_assert!(sb > sa);
            }
        }
    }
}
