// Compression tests: merge arithmetic, conservation, idempotence and
// isolation of the shared base table.

use super::*;
use crate::itemset::ItemsetKey;
use crate::temporal::Cluster;

fn key(ids: &[&str]) -> ItemsetKey {
    ItemsetKey::new(ids.iter().copied()).unwrap()
}

fn table(entries: &[(&[&str], u64)]) -> AssociationTable {
    entries
        .iter()
        .map(|(ids, count)| (key(ids), *count))
        .collect()
}

fn cluster(id: u32, members: &[&str]) -> Cluster {
    Cluster::new(id, members.iter().copied()).unwrap()
}

#[test]
fn test_pairwise_merge_arithmetic() {
    let base = table(&[(&["A"], 5), (&["B"], 3), (&["A", "B"], 7)]);
    let working = compress(&base, &[cluster(1, &["A", "B"])]);

    // B:3 folds onto A:5, then A,B:7 collapses onto A as well
    let compressed = working.to_table();
    assert_eq!(compressed, table(&[(&["A"], 15)]));
}

#[test]
fn test_base_table_is_never_mutated() {
    let base = table(&[(&["A"], 5), (&["B"], 3), (&["A", "B"], 7)]);
    let before = base.clone();
    let _working = compress(&base, &[cluster(1, &["A", "B"])]);
    assert_eq!(base, before);
}

#[test]
fn test_rewrites_larger_itemsets() {
    let base = table(&[(&["a", "b", "c"], 2), (&["a", "c"], 4), (&["c", "d"], 1)]);
    let working = compress(&base, &[cluster(1, &["a", "c"])]);

    assert_eq!(working.count(&key(&["a", "b"])), 2);
    assert_eq!(working.count(&key(&["a"])), 4);
    assert_eq!(working.count(&key(&["a", "d"])), 1);
    assert!(working.keys_containing("c").is_empty());
}

#[test]
fn test_three_member_cluster_folds_created_keys() {
    // b,c -> a,c (created) -> a
    let base = table(&[(&["b", "c"], 6), (&["c"], 1)]);
    let working = compress(&base, &[cluster(1, &["c", "b", "a"])]);

    assert_eq!(working.to_table(), table(&[(&["a"], 7)]));
}

#[test]
fn test_keys_spanning_two_clusters() {
    // b,d touches the non-representative of both clusters
    let base = table(&[(&["b", "d"], 3), (&["a", "c"], 2)]);
    let clusters = [cluster(2, &["a", "b"]), cluster(1, &["c", "d"])];
    let working = compress(&base, &clusters);

    assert_eq!(working.to_table(), table(&[(&["a", "c"], 5)]));
}

#[test]
fn test_cluster_order_does_not_matter() {
    let base = table(&[
        (&["b", "d"], 3),
        (&["a", "c"], 2),
        (&["b"], 9),
        (&["d", "e"], 4),
    ]);
    let forward = [cluster(2, &["a", "b"]), cluster(1, &["c", "d"])];
    let backward = [cluster(1, &["c", "d"]), cluster(2, &["a", "b"])];

    assert_eq!(
        compress(&base, &forward).to_table(),
        compress(&base, &backward).to_table()
    );
}

#[test]
fn test_conservation_per_cluster() {
    let base = table(&[
        (&["a"], 5),
        (&["b"], 3),
        (&["a", "b"], 7),
        (&["b", "x"], 2),
        (&["x"], 11),
    ]);
    let working = compress(&base, &[cluster(1, &["a", "b"])]);

    assert_eq!(base.mass_touching(&["a", "b"]), working.mass_touching(&["a"]));
    assert_eq!(base.total(), working.to_table().total());
}

#[test]
fn test_idempotent_on_own_output() {
    let base = table(&[(&["a"], 5), (&["b"], 3), (&["a", "b"], 7), (&["b", "c"], 1)]);
    let clusters = [cluster(1, &["a", "b"])];

    let once = compress(&base, &clusters).to_table();
    let twice = compress(&once, &clusters);

    assert_eq!(twice.touched(), 0);
    assert_eq!(twice.to_table(), once);
}

#[test]
fn test_member_without_associations_is_not_an_error() {
    let base = table(&[(&["a"], 1)]);
    let working = compress(&base, &[cluster(1, &["a", "unseen"])]);
    assert_eq!(working.to_table(), base);
}

#[test]
fn test_singleton_cluster_is_noop() {
    let base = table(&[(&["a"], 1), (&["a", "b"], 2)]);
    let working = compress(&base, &[cluster(1, &["a"])]);
    assert_eq!(working.touched(), 0);
}

#[test]
fn test_fold_member_into_itself_is_noop() {
    let base = table(&[(&["a"], 1)]);
    let mut working = WorkingTable::new(&base);
    assert_eq!(working.fold_member("a", "a"), 0);
    assert_eq!(working.count(&key(&["a"])), 1);
}
