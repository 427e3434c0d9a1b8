//! Genome construction and variation.
//!
//! [`GenomeFactory`] draws random genes and genomes and implements the
//! combined crossover/mutation operator. All randomness is supplied by the
//! caller's RNG so a seeded run is reproducible.
//!
//! # Crossover and mutation
//!
//! For every position an independent `r ∈ [0, 1)` is drawn:
//!
//! - `r < s/2`: take the gene of parent A
//! - `s/2 ≤ r < s`: take the gene of parent B
//! - `r ≥ s`: draw a fresh random gene
//!
//! where `s` is the stability. At `s = 1` this is uniform crossover; as
//! `s → 0` the child approaches a random genome.

use crate::model::{Catalog, Fleet, Genome, RESERVE};
use rand::Rng;

/// How likely a random gene is to name a real carrier instead of the reserve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillProbability {
    /// `min(1, total capacity / total weight)`: the expected share of the
    /// catalog that fits in the fleet.
    #[default]
    CapacityRatio,

    /// A fixed probability in `[0, 1]`.
    Fixed(f64),
}

impl FillProbability {
    /// Resolves the probability for a concrete catalog and fleet.
    pub fn resolve(self, catalog: &Catalog, fleet: &Fleet) -> f64 {
        match self {
            FillProbability::CapacityRatio => {
                (fleet.total_capacity() / catalog.total_weight()).min(1.0)
            }
            FillProbability::Fixed(p) => p.clamp(0.0, 1.0),
        }
    }
}

/// Produces random genomes and offspring for one catalog/fleet pair.
#[derive(Debug, Clone)]
pub struct GenomeFactory {
    genome_len: usize,
    carriers: u16,
    p_fill: f64,
}

impl GenomeFactory {
    /// Creates a factory for `catalog.len()` genes over `fleet.len()` carriers.
    pub fn new(catalog: &Catalog, fleet: &Fleet, fill: FillProbability) -> Self {
        Self {
            genome_len: catalog.len(),
            carriers: fleet.len() as u16,
            p_fill: fill.resolve(catalog, fleet),
        }
    }

    /// The resolved probability of a non-reserve gene.
    pub fn p_fill(&self) -> f64 {
        self.p_fill
    }

    /// Genome length produced by this factory.
    pub fn genome_len(&self) -> usize {
        self.genome_len
    }

    /// A carrier in `1..=K` with probability `p_fill`, otherwise the reserve.
    pub fn random_gene<R: Rng>(&self, rng: &mut R) -> u16 {
        if rng.random::<f64>() < self.p_fill {
            rng.random_range(1..=self.carriers)
        } else {
            RESERVE
        }
    }

    /// A genome of independent random genes.
    pub fn random_genome<R: Rng>(&self, rng: &mut R) -> Genome {
        let genes = (0..self.genome_len)
            .map(|_| self.random_gene(rng))
            .collect();
        Genome::from_genes(genes)
    }

    /// Combines two parents gene by gene, mutating with probability
    /// `1 - stability` per position.
    ///
    /// `stability` is clamped to `[0, 1]`.
    ///
    /// # Panics
    /// Panics if the parents differ in length.
    pub fn crossover_and_mutate<R: Rng>(
        &self,
        parent_a: &Genome,
        parent_b: &Genome,
        stability: f64,
        rng: &mut R,
    ) -> Genome {
        assert_eq!(
            parent_a.len(),
            parent_b.len(),
            "parents must have equal length"
        );
        let stability = stability.clamp(0.0, 1.0);
        let half = stability / 2.0;

        let genes = parent_a
            .genes()
            .iter()
            .zip(parent_b.genes())
            .map(|(&a, &b)| {
                let r: f64 = rng.random();
                if r < half {
                    a
                } else if r < stability {
                    b
                } else {
                    self.random_gene(rng)
                }
            })
            .collect();
        Genome::from_genes(genes)
    }
}
