// Association statistics and per-line compression
//
// The base table maps canonical itemset keys to co-occurrence counts and keeps
// a reverse index (identifier -> keys containing it) so that every key touching
// an identifier can be enumerated in O(degree) instead of scanning the table.
//
// Ownership model: the base table is built once per run and only ever shared
// by `&` reference. Each line gets its own copy-on-write `WorkingTable` that
// records overrides and deletions on top of the base.

mod compress;
mod table;

pub use compress::{compress, WorkingTable};
pub use table::{AssociationLookup, AssociationTable};

#[cfg(test)]
mod tests;
