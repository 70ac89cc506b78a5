//! Core domain models for elongation analysis.
//!
//! This module defines the epoch key used to address cached results and the
//! 360-bucket frequency distribution produced by the aggregator.

pub mod domain;
