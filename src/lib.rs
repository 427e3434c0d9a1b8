//! Genetic load planning for a fleet of capacity-limited trucks.
//!
//! Given a catalog of packages (weight, profit, deadline) and a fleet of
//! trucks, the search picks which packages ride on which truck today so
//! that loaded profit minus lateness penalties is as high as possible,
//! without overloading any truck.
//!
//! - **Model** ([`model`]): items, catalog, fleet and the genome encoding.
//! - **Search** ([`ga`]): memoized fitness, genome operators, the
//!   population manager and the convergence state machine.
//! - **I/O** ([`io`]): CSV catalogs, synthetic inventories, manifests and
//!   the load summary.
//!
//! # Example
//!
//! ```
//! use u_fleetpack::ga::{SearchConfig, SearchRunner};
//! use u_fleetpack::io::LoadPlan;
//! use u_fleetpack::model::{Catalog, Fleet, Item};
//!
//! let catalog = Catalog::new(vec![
//!     Item::new(1, 4.0, 6.0, 1),
//!     Item::new(2, 3.0, 4.0, -1),
//!     Item::new(3, 5.0, 7.0, 0),
//! ]).unwrap();
//! let fleet = Fleet::uniform(2, 8.0).unwrap();
//! let config = SearchConfig::fast().with_seed(7).with_verbose(false);
//!
//! let result = SearchRunner::run(&catalog, &fleet, &config).unwrap();
//! let plan = LoadPlan::new(&catalog, &fleet, &result.best);
//! assert!(result.best_score.is_feasible());
//! assert_eq!(plan.trucks().len(), 2);
//! ```

pub mod error;
pub mod ga;
pub mod io;
pub mod model;

pub use error::{FleetpackError, Result};
