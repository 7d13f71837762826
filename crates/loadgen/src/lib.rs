//! crudload - Load generation
//!
//! Virtual user scheduling for a [`Scenario`].
//!
//! # Overview
//!
//! - [`Scenario`]: the iteration body, implemented by the scenario crate
//! - [`VirtualUser`]: per-VU state handed to each iteration (id, iteration
//!   counter, RNG, check and request recording, cancellable pause)
//! - [`LoadEngine`]: runs `vus` concurrent virtual users for a duration or an
//!   iteration budget, with a graceful stop window before aborting
//!
//! # Example
//!
//! ```ignore
//! let metrics = MetricsCollector::new();
//! let engine = LoadEngine::new(LoadOptions::from(&config.load), metrics);
//! let summary = engine.run(Arc::new(scenario), shutdown).await;
//! println!("stopped: {}", summary.reason);
//! ```

mod engine;
mod scenario;
mod vu;

pub use engine::{LoadEngine, LoadOptions, RunSummary, StopReason};
pub use scenario::{IterationOutcome, Scenario};
pub use vu::VirtualUser;
