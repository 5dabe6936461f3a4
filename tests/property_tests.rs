//! Property-based tests for the core algorithms
//!
//! Covered:
//! 1. Temporal clustering id layout
//! 2. Association compression (mass conservation, idempotence, purity)
//! 3. Hierarchy construction (placement, levels, parent scores)
//! 4. Association record parsing never panics

use chrono::{Duration, NaiveDate, NaiveDateTime};
use chronotree::association::{compress, AssociationLookup, AssociationTable};
use chronotree::hierarchy::build_hierarchy;
use chronotree::input::parse_association_record;
use chronotree::itemset::ItemsetKey;
use chronotree::temporal::{assign_clusters, Cluster, Clustering, Event};
use proptest::prelude::*;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2012, 10, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// Sorted events from minute offsets
fn events_from_minutes(mut minutes: Vec<i64>) -> Vec<Event> {
    minutes.sort_unstable();
    minutes
        .into_iter()
        .enumerate()
        .map(|(i, m)| Event::new(format!("id{i:03}"), epoch() + Duration::minutes(m)))
        .collect()
}

const IDS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn association_table() -> impl Strategy<Value = AssociationTable> {
    prop::collection::vec(
        (prop::sample::subsequence(IDS.to_vec(), 1..=3), 0u64..1000),
        0..24,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(ids, count)| (ItemsetKey::new(ids).unwrap(), count))
            .collect()
    })
}

/// Disjoint clusters: each id is assigned a group number, 0 meaning unclustered
fn disjoint_clusters() -> impl Strategy<Value = Vec<Cluster>> {
    prop::collection::vec(0u32..4, IDS.len()).prop_map(|groups| {
        (1..4u32)
            .filter_map(|group| {
                let members: Vec<&str> = IDS
                    .iter()
                    .zip(&groups)
                    .filter(|(_, g)| **g == group)
                    .map(|(id, _)| *id)
                    .collect();
                Cluster::new(group, members).ok()
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_cluster_ids_contiguous_and_non_increasing(
        minutes in prop::collection::vec(0i64..2_000, 1..40),
        alpha_hours in prop::sample::select(vec![0.0, 0.5, 1.0, 2.0, 3.25]),
    ) {
        let mut events = events_from_minutes(minutes);
        let k = assign_clusters(&mut events, alpha_hours);

        prop_assert_eq!(events.last().unwrap().cluster_id, 1);
        prop_assert_eq!(events[0].cluster_id as usize, k);
        for pair in events.windows(2) {
            let (earlier, later) = (pair[0].cluster_id, pair[1].cluster_id);
            prop_assert!(earlier >= later);
            prop_assert!(earlier - later <= 1);
        }
    }

    #[test]
    fn prop_wide_gap_always_splits(
        minutes in prop::collection::vec(0i64..2_000, 2..30),
        alpha_hours in prop::sample::select(vec![0.5, 1.0, 2.0]),
    ) {
        let mut events = events_from_minutes(minutes);
        assign_clusters(&mut events, alpha_hours);

        let window = Duration::milliseconds((2.0 * alpha_hours * 3_600_000.0) as i64);
        for pair in events.windows(2) {
            if pair[1].timestamp - pair[0].timestamp > window {
                prop_assert_ne!(pair[0].cluster_id, pair[1].cluster_id);
            }
        }
    }

    #[test]
    fn prop_clustering_partitions_events(
        minutes in prop::collection::vec(0i64..2_000, 0..40),
    ) {
        let events = events_from_minutes(minutes);
        let n = events.len();
        let clustering = Clustering::from_sorted_events(events, 2.0);

        let members: usize = clustering.clusters().iter().map(Cluster::len).sum();
        prop_assert_eq!(members, n);
        for cluster in clustering.clusters() {
            prop_assert_eq!(cluster.representative(), cluster.members()[0].as_str());
        }
    }

    #[test]
    fn prop_compression_conserves_mass(
        base in association_table(),
        clusters in disjoint_clusters(),
    ) {
        let compressed = compress(&base, &clusters).to_table();
        prop_assert_eq!(compressed.total(), base.total());
    }

    #[test]
    fn prop_compression_removes_folded_members(
        base in association_table(),
        clusters in disjoint_clusters(),
    ) {
        let working = compress(&base, &clusters);
        for cluster in &clusters {
            for member in cluster.members().iter().skip(1) {
                prop_assert!(working.keys_containing(member).is_empty());
            }
        }
    }

    #[test]
    fn prop_compression_idempotent(
        base in association_table(),
        clusters in disjoint_clusters(),
    ) {
        let once = compress(&base, &clusters).to_table();
        let again = compress(&once, &clusters);
        prop_assert_eq!(again.touched(), 0);
        prop_assert_eq!(again.to_table(), once);
    }

    #[test]
    fn prop_compression_order_independent(
        base in association_table(),
        clusters in disjoint_clusters(),
    ) {
        let forward = compress(&base, &clusters).to_table();
        let reversed: Vec<Cluster> = clusters.iter().rev().cloned().collect();
        let backward = compress(&base, &reversed).to_table();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_hierarchy_places_each_representative_once(
        base in association_table(),
        reps in prop::sample::subsequence(IDS.to_vec(), 0..=IDS.len()),
    ) {
        let tree = build_hierarchy(&base, &reps, "root");
        prop_assert_eq!(tree.len(), reps.len() + 1);
        for rep in &reps {
            let node = tree.find(rep).unwrap();
            let parent = tree.node(node).parent.unwrap();
            prop_assert_eq!(tree.node(node).level, tree.node(parent).level + 1);
            prop_assert_eq!(tree.node(node).frequency, 0);
        }
    }

    #[test]
    fn prop_parent_score_beats_singleton(
        base in association_table(),
        reps in prop::sample::subsequence(IDS.to_vec(), 1..=IDS.len()),
    ) {
        let tree = build_hierarchy(&base, &reps, "root");
        for rep in &reps {
            let node = tree.find(rep).unwrap();
            let parent = tree.node(tree.node(node).parent.unwrap());
            if parent.level > 1 {
                let pair = base.count(&ItemsetKey::pair(rep, &parent.name));
                prop_assert!(pair > base.count(&ItemsetKey::singleton(rep)));
            }
        }
    }

    #[test]
    fn prop_parse_association_record_never_panics(line in "\\PC{0,40}") {
        let _ = parse_association_record(&line);
    }
}
