use super::dp::assign_clusters;
use super::event::Event;
use crate::error::{ChronoTreeError, Result};
use serde::Serialize;

/// Members of one temporal cluster, sorted and deduplicated
///
/// The representative is the lexicographically smallest member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    id: u32,
    members: Vec<String>,
}

impl Cluster {
    /// # Errors
    /// [`ChronoTreeError::EmptyItemset`] when `members` is empty.
    pub fn new<I, S>(id: u32, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(ChronoTreeError::EmptyItemset);
        }
        members.sort();
        members.dedup();
        Ok(Self { id, members })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn representative(&self) -> &str {
        &self.members[0]
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of clustering one line
#[derive(Debug, Clone, Default, Serialize)]
pub struct Clustering {
    /// Events in chronological order with cluster ids assigned
    events: Vec<Event>,

    /// Clusters in chronological order of their earliest event
    clusters: Vec<Cluster>,
}

impl Clustering {
    /// Run the DP over chronologically sorted events and group the result
    pub fn from_sorted_events(mut events: Vec<Event>, alpha_hours: f64) -> Self {
        assign_clusters(&mut events, alpha_hours);

        // Ids are contiguous in time order, so each run of equal ids is one cluster.
        let mut clusters: Vec<Cluster> = Vec::new();
        for run in events.chunk_by(|a, b| a.cluster_id == b.cluster_id) {
            let id = run[0].cluster_id;
            let members = run.iter().map(|event| event.identifier.clone());
            if let Ok(cluster) = Cluster::new(id, members) {
                clusters.push(cluster);
            }
        }

        Self { events, clusters }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster representatives in chronological order of first occurrence
    pub fn representatives(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.clusters
            .iter()
            .map(Cluster::representative)
            .filter(|rep| seen.insert(*rep))
            .collect()
    }

    /// Cluster id of `identifier` on this line
    pub fn cluster_of(&self, identifier: &str) -> Option<u32> {
        self.events
            .iter()
            .find(|event| event.identifier == identifier)
            .map(|event| event.cluster_id)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
