//! Generation replacement: elitism, immigration and breeding.
//!
//! Every generation of size `P` is rebuilt from the previous one, sorted
//! best first:
//!
//! 1. the top `P / 10` members are carried over verbatim,
//! 2. `P / 10` random immigrants are added,
//! 3. the rest are children of two distinct parents drawn uniformly from
//!    the top `P / 2`.
//!
//! The three groups always sum to exactly `P`.

use super::fitness::FitnessEvaluator;
use super::operators::GenomeFactory;
use super::types::Score;
use crate::model::Genome;
use rand::Rng;

/// A genome together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The assignment.
    pub genome: Genome,
    /// Its fitness.
    pub score: Score,
}

/// A population kept sorted by descending score.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Member>,
}

impl Population {
    /// Scores `genomes` and sorts them best first.
    ///
    /// # Panics
    /// Panics if `genomes` is empty.
    pub fn from_genomes(
        genomes: Vec<Genome>,
        evaluator: &FitnessEvaluator<'_>,
        parallel: bool,
    ) -> Self {
        assert!(!genomes.is_empty(), "population must not be empty");
        let mut members = score_genomes(genomes, evaluator, parallel);
        sort_best_first(&mut members);
        Self { members }
    }

    /// Members, best first.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Population size.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for a constructed population.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The highest-ranked member.
    pub fn best(&self) -> &Member {
        &self.members[0]
    }

    /// Consumes the population, returning the best member.
    pub fn into_best(mut self) -> Member {
        self.members.swap_remove(0)
    }

    /// Builds the next generation at the given stability.
    pub fn next_generation<R: Rng>(
        &self,
        factory: &GenomeFactory,
        evaluator: &FitnessEvaluator<'_>,
        stability: f64,
        rng: &mut R,
        parallel: bool,
    ) -> Population {
        let size = self.members.len();
        let elites = elite_count(size);
        let immigrants = immigrant_count(size);
        let donors = donor_count(size);

        let mut fresh: Vec<Genome> = Vec::with_capacity(size - elites);
        fresh.extend((0..immigrants).map(|_| factory.random_genome(rng)));

        while elites + fresh.len() < size {
            let (a, b) = pick_parents(donors, rng);
            let child = factory.crossover_and_mutate(
                &self.members[a].genome,
                &self.members[b].genome,
                stability,
                rng,
            );
            fresh.push(child);
        }

        let mut members = self.members[..elites].to_vec();
        members.extend(score_genomes(fresh, evaluator, parallel));
        sort_best_first(&mut members);

        debug_assert_eq!(members.len(), size);
        Population { members }
    }
}

/// Members carried over unchanged.
pub fn elite_count(size: usize) -> usize {
    size / 10
}

/// Random newcomers per generation.
pub fn immigrant_count(size: usize) -> usize {
    size / 10
}

/// Size of the parent pool at the top of the ranking.
pub fn donor_count(size: usize) -> usize {
    (size / 2).max(1)
}

/// Two distinct indices in `0..pool`, or `(0, 0)` when the pool has one member.
fn pick_parents<R: Rng>(pool: usize, rng: &mut R) -> (usize, usize) {
    if pool < 2 {
        return (0, 0);
    }
    let a = rng.random_range(0..pool);
    let mut b = rng.random_range(0..pool - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

/// Stable descending sort; ties keep insertion order, which keeps seeded
/// runs reproducible.
fn sort_best_first(members: &mut [Member]) {
    members.sort_by(|a, b| b.score.cmp(&a.score));
}

fn score_genomes(
    genomes: Vec<Genome>,
    evaluator: &FitnessEvaluator<'_>,
    parallel: bool,
) -> Vec<Member> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return genomes
                .into_par_iter()
                .map(|genome| {
                    let score = evaluator.score(&genome);
                    Member { genome, score }
                })
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    genomes
        .into_iter()
        .map(|genome| {
            let score = evaluator.score(&genome);
            Member { genome, score }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::operators::FillProbability;
    use crate::model::{Catalog, Fleet, Item};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem() -> (Catalog, Fleet) {
        let items = (0..30)
            .map(|i| Item::new(i as u64, 10.0 + i as f64, (i % 7) as f64 + 1.0, (i % 5) as i64 - 2))
            .collect();
        (Catalog::new(items).unwrap(), Fleet::uniform(3, 120.0).unwrap())
    }

    fn initial(
        size: usize,
        factory: &GenomeFactory,
        evaluator: &FitnessEvaluator<'_>,
        rng: &mut StdRng,
    ) -> Population {
        let genomes = (0..size).map(|_| factory.random_genome(rng)).collect();
        Population::from_genomes(genomes, evaluator, false)
    }

    #[test]
    fn test_slice_sizes() {
        assert_eq!(elite_count(100), 10);
        assert_eq!(immigrant_count(100), 10);
        assert_eq!(donor_count(100), 50);
        assert_eq!(elite_count(19), 1);
        assert_eq!(donor_count(1), 1);
    }

    #[test]
    fn test_sorted_best_first() {
        let (catalog, fleet) = problem();
        let evaluator = FitnessEvaluator::new(&catalog, &fleet, 1000).unwrap();
        let factory = GenomeFactory::new(&catalog, &fleet, FillProbability::CapacityRatio);
        let mut rng = StdRng::seed_from_u64(3);

        let population = initial(40, &factory, &evaluator, &mut rng);
        for pair in population.members().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_size_is_constant() {
        let (catalog, fleet) = problem();
        let evaluator = FitnessEvaluator::new(&catalog, &fleet, 1000).unwrap();
        let factory = GenomeFactory::new(&catalog, &fleet, FillProbability::CapacityRatio);
        let mut rng = StdRng::seed_from_u64(5);

        for size in [10, 17, 33, 100] {
            let mut population = initial(size, &factory, &evaluator, &mut rng);
            for _ in 0..5 {
                population = population.next_generation(&factory, &evaluator, 0.8, &mut rng, false);
                assert_eq!(population.len(), size);
            }
        }
    }

    #[test]
    fn test_elites_survive() {
        let (catalog, fleet) = problem();
        let evaluator = FitnessEvaluator::new(&catalog, &fleet, 1000).unwrap();
        let factory = GenomeFactory::new(&catalog, &fleet, FillProbability::CapacityRatio);
        let mut rng = StdRng::seed_from_u64(11);

        let population = initial(50, &factory, &evaluator, &mut rng);
        let next = population.next_generation(&factory, &evaluator, 0.0, &mut rng, false);

        for elite in &population.members()[..elite_count(50)] {
            assert!(next.members().iter().any(|m| m.genome == elite.genome));
        }
        assert!(next.best().score >= population.best().score);
    }

    #[test]
    fn test_best_never_regresses() {
        let (catalog, fleet) = problem();
        let evaluator = FitnessEvaluator::new(&catalog, &fleet, 10_000).unwrap();
        let factory = GenomeFactory::new(&catalog, &fleet, FillProbability::CapacityRatio);
        let mut rng = StdRng::seed_from_u64(17);

        let mut population = initial(30, &factory, &evaluator, &mut rng);
        for generation in 0..40 {
            let stability = 1.0 - (generation % 10) as f64 / 10.0;
            let next = population.next_generation(&factory, &evaluator, stability, &mut rng, false);
            assert!(next.best().score >= population.best().score);
            population = next;
        }
    }

    #[test]
    fn test_pick_parents_distinct() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..200 {
            let (a, b) = pick_parents(5, &mut rng);
            assert_ne!(a, b);
            assert!(a < 5 && b < 5);
        }
        assert_eq!(pick_parents(1, &mut rng), (0, 0));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_scoring_matches_sequential() {
        let (catalog, fleet) = problem();
        let evaluator = FitnessEvaluator::new(&catalog, &fleet, 1000).unwrap();
        let factory = GenomeFactory::new(&catalog, &fleet, FillProbability::CapacityRatio);
        let mut rng = StdRng::seed_from_u64(23);

        let genomes: Vec<Genome> = (0..40).map(|_| factory.random_genome(&mut rng)).collect();
        let sequential = Population::from_genomes(genomes.clone(), &evaluator, false);
        let parallel = Population::from_genomes(genomes, &evaluator, true);
        assert_eq!(sequential.members(), parallel.members());
    }
}
