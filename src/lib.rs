//! Chronotree - temporal-cluster concept hierarchies
//!
//! Given identifiers with timestamps and co-occurrence counts for itemsets of
//! identifiers, this library groups each line of identifiers into temporal
//! clusters, folds every cluster's association counts into its representative,
//! and grows a greedy "most associated parent" tree over the representatives.

pub mod association;
pub mod cli;
pub mod components;
pub mod config;
pub mod counting;
pub mod error;
pub mod hierarchy;
pub mod input;
pub mod itemset;
pub mod json_output;
pub mod lifetime;
pub mod pipeline;
pub mod temporal;
pub mod timesplit;

pub use error::{ChronoTreeError, Result};
