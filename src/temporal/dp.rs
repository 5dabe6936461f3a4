use super::event::Event;
use chrono::NaiveDateTime;

/// Default cluster half-window in hours
pub const DEFAULT_ALPHA_HOURS: f64 = 2.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Smallest `j >= i` whose timestamp lies more than `window` hours after `i`'s
fn jump_target(events: &[Event], i: usize, window: f64) -> Option<usize> {
    let origin = events[i].timestamp;
    let offset = events[i..].partition_point(|e| hours_between(origin, e.timestamp) <= window);
    let j = i + offset;
    (j < events.len()).then_some(j)
}

/// Assign cluster ids to chronologically sorted events
///
/// Suffix dynamic program over `i` from last to first:
///
/// - `extend` = 1 + count(jump target), or 1 when no event lies beyond the
///   `2·alpha_hours` window
/// - `keep` = count(i + 1), or 0 when there is no jump target
/// - `keep > extend` merges `i` into the cluster of `i + 1`; otherwise `i`
///   opens a cluster numbered one above its jump target's (or 1)
///
/// On equal counts `i` still ends up in the cluster of `i + 1`: ids track
/// counts, so the id derived from the jump target equals `i + 1`'s id. Ids
/// come out as `1..=k`, non-increasing in time order, with the last event
/// always in cluster 1. Returns `k`, the cluster count.
///
/// # Example
/// ```
/// use chrono::NaiveDateTime;
/// use chronotree::temporal::{assign_clusters, Event};
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let mut events = vec![
///     Event::new("a", at("2012-10-01 10:00:00")),
///     Event::new("b", at("2012-10-01 11:00:00")),
///     Event::new("c", at("2012-10-01 15:30:00")),
/// ];
///
/// assert_eq!(assign_clusters(&mut events, 2.0), 2);
/// assert_eq!(events[0].cluster_id, events[1].cluster_id);
/// assert_ne!(events[1].cluster_id, events[2].cluster_id);
/// ```
pub fn assign_clusters(events: &mut [Event], alpha_hours: f64) -> usize {
    debug_assert!(
        events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "events must be sorted chronologically"
    );

    let n = events.len();
    if n == 0 {
        return 0;
    }

    // Clamped so the jump target of `i` is always strictly after `i`.
    let window = (2.0 * alpha_hours).max(0.0);
    let mut counts = vec![0usize; n];

    for i in (0..n).rev() {
        let jump = jump_target(events, i, window);
        let extend = jump.map_or(1, |j| 1 + counts[j]);
        // A jump target implies i + 1 exists.
        let keep = jump.map_or(0, |_| counts[i + 1]);

        if keep > extend {
            counts[i] = counts[i + 1];
            events[i].cluster_id = events[i + 1].cluster_id;
        } else {
            counts[i] = extend;
            events[i].cluster_id = jump.map_or(1, |j| events[j].cluster_id + 1);
        }
    }

    counts[0]
}
