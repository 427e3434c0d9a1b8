//! Catalog files, synthetic inventories and load reports.
//!
//! These sit around the search engine: nothing in [`crate::ga`] touches
//! the filesystem.

pub mod catalog;
pub mod report;
pub mod seeder;

pub use catalog::{load_catalog, read_catalog, save_catalog, write_catalog};
pub use report::{LoadPlan, LoadSummary, TruckLoad};
pub use seeder::generate_catalog;
