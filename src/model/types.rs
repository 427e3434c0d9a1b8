//! Items, carriers and the genome encoding shared by every component.
//!
//! A [`Catalog`] fixes the index space: gene `i` of a [`Genome`] is the
//! carrier that item `i` of the catalog rides on. Carrier `0` is the
//! reserve sentinel and is never capacity-checked.

use crate::error::{FleetpackError, Result};
use std::fmt;
use std::sync::Arc;

/// Carrier index meaning "left in the warehouse".
pub const RESERVE: u16 = 0;

/// Largest fleet a [`Genome`] can address.
pub const MAX_CARRIERS: usize = u16::MAX as usize;

/// A package waiting to be shipped.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// External package identifier.
    pub id: u64,
    /// Weight in the same unit as carrier capacity. Always positive.
    pub weight: f64,
    /// Profit earned when the item is loaded today.
    pub profit: f64,
    /// Days until the deadline. Negative means already overdue.
    pub deadline_offset: i64,
}

impl Item {
    /// Creates an item.
    pub fn new(id: u64, weight: f64, profit: f64, deadline_offset: i64) -> Self {
        Self {
            id,
            weight,
            profit,
            deadline_offset,
        }
    }

    /// Whether the deadline has already passed.
    pub fn is_overdue(&self) -> bool {
        self.deadline_offset < 0
    }

    /// Quadratic lateness penalty: `deadline_offset²` for overdue items, else 0.
    pub fn overdue_penalty(&self) -> f64 {
        if self.is_overdue() {
            let d = self.deadline_offset as f64;
            d * d
        } else {
            0.0
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(FleetpackError::InvalidItem {
                id: self.id,
                reason: format!("weight must be positive, got {}", self.weight),
            });
        }
        if !self.profit.is_finite() {
            return Err(FleetpackError::InvalidItem {
                id: self.id,
                reason: format!("profit must be finite, got {}", self.profit),
            });
        }
        Ok(())
    }
}

/// Immutable, ordered collection of items.
///
/// The order is significant: it defines which gene refers to which item.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
    total_weight: f64,
}

impl Catalog {
    /// Builds a catalog, rejecting empty input and invalid items.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(FleetpackError::EmptyCatalog);
        }
        for item in &items {
            item.validate()?;
        }
        let total_weight = items.iter().map(|item| item.weight).sum();
        Ok(Self {
            items,
            total_weight,
        })
    }

    /// Number of items (the genome length).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; a catalog cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in index order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item at gene position `index`.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Iterates over items in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Sum of all item weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One truck of the fleet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carrier {
    /// 1-based carrier index as it appears in genomes.
    pub index: u16,
    /// Maximum total weight.
    pub capacity: f64,
}

/// The carriers available for one search, indexed `1..=K`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    capacities: Vec<f64>,
}

impl Fleet {
    /// Builds a fleet from per-carrier capacities; `capacities[0]` belongs
    /// to carrier 1.
    pub fn new(capacities: Vec<f64>) -> Result<Self> {
        if capacities.is_empty() {
            return Err(FleetpackError::EmptyFleet);
        }
        if capacities.len() > MAX_CARRIERS {
            return Err(FleetpackError::TooManyCarriers {
                count: capacities.len(),
                max: MAX_CARRIERS,
            });
        }
        for (offset, &capacity) in capacities.iter().enumerate() {
            if !capacity.is_finite() || capacity <= 0.0 {
                return Err(FleetpackError::InvalidCapacity {
                    index: offset + 1,
                    capacity,
                });
            }
        }
        Ok(Self { capacities })
    }

    /// `count` carriers sharing one capacity.
    pub fn uniform(count: usize, capacity: f64) -> Result<Self> {
        Self::new(vec![capacity; count])
    }

    /// Number of real carriers, `K`.
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    /// Always `false`; a fleet cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Capacity of carrier `index` (1-based). `None` for the reserve or
    /// an index beyond the fleet.
    pub fn capacity(&self, index: u16) -> Option<f64> {
        if index == RESERVE {
            return None;
        }
        self.capacities.get(index as usize - 1).copied()
    }

    /// Sum of every carrier's capacity.
    pub fn total_capacity(&self) -> f64 {
        self.capacities.iter().sum()
    }

    /// Iterates over the carriers in index order.
    pub fn carriers(&self) -> impl Iterator<Item = Carrier> + '_ {
        self.capacities
            .iter()
            .enumerate()
            .map(|(offset, &capacity)| Carrier {
                index: (offset + 1) as u16,
                capacity,
            })
    }
}

/// An assignment of every catalog item to a carrier or to the reserve.
///
/// Genomes are immutable values; cloning shares the underlying buffer.
/// Equality and hashing use the full gene sequence, which is what the
/// fitness cache keys on.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Genome(Arc<[u16]>);

impl Genome {
    /// Builds a genome and checks it against the catalog and fleet sizes.
    pub fn try_new(genes: Vec<u16>, catalog: &Catalog, fleet: &Fleet) -> Result<Self> {
        if genes.len() != catalog.len() {
            return Err(FleetpackError::InvalidGenome(format!(
                "expected {} genes, got {}",
                catalog.len(),
                genes.len()
            )));
        }
        if let Some(&gene) = genes.iter().find(|&&g| g as usize > fleet.len()) {
            return Err(FleetpackError::InvalidGenome(format!(
                "carrier {} does not exist in a fleet of {}",
                gene,
                fleet.len()
            )));
        }
        Ok(Self(genes.into()))
    }

    /// Wraps genes produced internally, which are valid by construction.
    pub(crate) fn from_genes(genes: Vec<u16>) -> Self {
        Self(genes.into())
    }

    /// The carrier index per item.
    pub fn genes(&self) -> &[u16] {
        &self.0
    }

    /// Genome length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of items placed on a real carrier.
    pub fn assigned_count(&self) -> usize {
        self.0.iter().filter(|&&g| g != RESERVE).count()
    }
}

impl fmt::Debug for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Genome").field(&&*self.0).finish()
    }
}
