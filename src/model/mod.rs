//! Problem data: the item catalog, the fleet and the genome encoding.

mod types;

pub use types::{Carrier, Catalog, Fleet, Genome, Item, MAX_CARRIERS, RESERVE};
