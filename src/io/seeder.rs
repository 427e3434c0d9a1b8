//! Synthetic warehouse inventories for experiments and benchmarks.
//!
//! Distributions follow the sums-of-two-uniforms shape used by the
//! warehouse team's test data: weights cluster around 6 kg, profits
//! around 5, and most deadlines lie a day or two ahead with a thin
//! overdue tail.

use crate::error::{FleetpackError, Result};
use crate::model::{Catalog, Item};
use rand::Rng;

/// Exclusive upper bound on the number of generated items; ids are
/// 10-digit and must not overflow.
pub const MAX_SEED_COUNT: u64 = 9_000_000_000;

const ID_FLOOR: u64 = 1_000_000_000;
const ID_CEILING: u64 = 9_999_999_999;

/// Generates `count` items with consecutive 10-digit ids.
pub fn generate_catalog<R: Rng>(count: u64, rng: &mut R) -> Result<Catalog> {
    if count == 0 || count >= MAX_SEED_COUNT {
        return Err(FleetpackError::InvalidSeedCount(count));
    }

    let base = rng.random_range(ID_FLOOR..=ID_CEILING - count);
    let items = (1..=count).map(|offset| random_item(base + offset, rng)).collect();
    Catalog::new(items)
}

fn random_item<R: Rng>(id: u64, rng: &mut R) -> Item {
    let weight_sum = rng.random_range(10..=150) + rng.random_range(10..=80);
    let weight = (weight_sum as f64 / 20.0 * 10.0).round() / 10.0;

    let profit = (rng.random_range(1..=10) + rng.random_range(1..=10)) / 2;

    // Integer division truncates toward zero, matching the reference data.
    let deadline = (rng.random_range(-1i64..=7) + rng.random_range(-3i64..=3)) / 2;

    Item::new(id, weight, profit as f64, deadline)
}
