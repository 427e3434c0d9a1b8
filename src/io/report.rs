//! Per-truck manifests and the daily load summary for a finished search.

use crate::error::Result;
use crate::model::{Catalog, Fleet, Genome, RESERVE};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What one truck carries.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckLoad {
    /// 1-based truck index.
    pub index: u16,
    /// Truck capacity.
    pub capacity: f64,
    /// Total loaded weight.
    pub weight: f64,
    /// Ids of the loaded packages, in catalog order.
    pub item_ids: Vec<u64>,
}

impl TruckLoad {
    /// Whether the load exceeds the capacity.
    pub fn is_overloaded(&self) -> bool {
        self.weight > self.capacity
    }
}

/// Totals over the whole assignment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadSummary {
    /// Profit of loaded packages minus the lateness penalty of loaded
    /// overdue packages.
    pub profit_today: f64,
    /// Packages on a truck.
    pub items_loaded: usize,
    /// Packages left in the warehouse.
    pub items_remaining: usize,
    /// Profit still sitting in the warehouse.
    pub profit_remaining: f64,
    /// Overdue packages left in the warehouse.
    pub overdue_remaining: usize,
    /// Lateness penalty of the overdue packages left behind.
    pub penalty_remaining: f64,
}

/// A genome decoded into truck loads.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadPlan {
    trucks: Vec<TruckLoad>,
    summary: LoadSummary,
}

impl LoadPlan {
    /// Decodes `genome` against the catalog and fleet it was searched on.
    ///
    /// # Panics
    /// Panics if the genome length differs from the catalog or a gene names
    /// a carrier the fleet does not have.
    pub fn new(catalog: &Catalog, fleet: &Fleet, genome: &Genome) -> Self {
        let mut trucks: Vec<TruckLoad> = fleet
            .carriers()
            .map(|carrier| TruckLoad {
                index: carrier.index,
                capacity: carrier.capacity,
                weight: 0.0,
                item_ids: Vec::new(),
            })
            .collect();
        let mut summary = LoadSummary::default();
        assert_eq!(
            genome.len(),
            catalog.len(),
            "genome length must match the catalog"
        );

        for (item, &gene) in catalog.iter().zip(genome.genes()) {
            if gene == RESERVE {
                summary.items_remaining += 1;
                summary.profit_remaining += item.profit;
                if item.is_overdue() {
                    summary.overdue_remaining += 1;
                    summary.penalty_remaining += item.overdue_penalty();
                }
                continue;
            }
            let Some(truck) = trucks.get_mut(usize::from(gene) - 1) else {
                panic!("gene {gene} names no truck in the fleet");
            };
            truck.weight += item.weight;
            truck.item_ids.push(item.id);
            summary.items_loaded += 1;
            summary.profit_today += item.profit - item.overdue_penalty();
        }

        Self { trucks, summary }
    }

    /// Loads per truck, in index order.
    pub fn trucks(&self) -> &[TruckLoad] {
        &self.trucks
    }

    /// Totals.
    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    /// Writes `delivery_{k}.txt` for every truck into `dir`, one package
    /// id per line, creating the directory if needed. Returns the paths.
    pub fn write_manifests<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut paths = Vec::with_capacity(self.trucks.len());
        for truck in &self.trucks {
            let path = dir.join(format!("delivery_{}.txt", truck.index));
            let mut file = fs::File::create(&path)?;
            for id in &truck.item_ids {
                writeln!(file, "{}", id)?;
            }
            paths.push(path);
        }
        debug!(dir = %dir.display(), trucks = paths.len(), "wrote manifests");
        Ok(paths)
    }
}

impl fmt::Display for LoadPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for truck in &self.trucks {
            writeln!(
                f,
                "Truck #{}: {:.2}/{} kgs loaded, {} packages.",
                truck.index,
                truck.weight,
                truck.capacity,
                truck.item_ids.len()
            )?;
        }
        let s = &self.summary;
        writeln!(f, "{} packages loaded.", s.items_loaded)?;
        writeln!(f, "{:.2} total daily profit.", s.profit_today)?;
        writeln!(
            f,
            "{} packages remaining ({:.2} profit).",
            s.items_remaining, s.profit_remaining
        )?;
        write!(
            f,
            "{} overdue packages remaining ({:.2} penalty).",
            s.overdue_remaining, s.penalty_remaining
        )
    }
}
