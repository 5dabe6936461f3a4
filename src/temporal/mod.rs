// Temporal clustering of one line's events
//
// Events are resolved to timestamps, sorted chronologically (stable), and
// partitioned by a suffix dynamic program that maximizes the number of
// clusters. A gap larger than 2·ALPHA hours always separates clusters. When
// both choices give the same count, event i ends up in the cluster of i + 1.

mod clustering;
mod dp;
mod event;

pub use clustering::{Cluster, Clustering};
pub use dp::{assign_clusters, DEFAULT_ALPHA_HOURS};
pub use event::{resolve_events, Event, TimestampLookup};
