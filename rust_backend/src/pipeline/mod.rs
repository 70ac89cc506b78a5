//! Epoch pipeline and batch driver.
//!
//! [`EpochPipeline`] runs sample → bin → store for a single epoch and skips
//! epochs whose key is already stored. The batch functions lay out a series of
//! Metonic-aligned epochs ([`BatchPlan`]), run them, and combine the stored
//! results.

pub mod batch;
pub mod epoch;

pub use batch::{aggregate_plan, mean_elongations, run_batch, BatchPlan, BatchReport, EpochMean};
pub use epoch::{EpochOutcome, EpochPipeline, EpochRequest};
