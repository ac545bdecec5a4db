// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Each node is uniquely identified by its NodeId in the committee.
/// NodeId is between 1 (inclusive) and the committee size (inclusive).
/// Id 0 is reserved as the broadcast destination on the wire.
pub type NodeId = u64;

/// Committee is the fixed set of nodes participating in consensus on one
/// decision slot. Its composition is agreed out of band and does not change
/// for the lifetime of the decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Committee {
    /// Number of nodes in the committee.
    size: u64,
    /// The quorum threshold (simple majority).
    quorum_threshold: u64,
}

impl Committee {
    pub fn new(size: u64) -> Self {
        assert_ne!(size, 0, "Committee size cannot be zero!");
        let quorum_threshold = size / 2 + 1;
        Self {
            size,
            quorum_threshold,
        }
    }

    /// Returns the number of nodes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn quorum_threshold(&self) -> u64 {
        self.quorum_threshold
    }

    /// Whether `node` is a valid id in this committee.
    pub fn contains(&self, node: NodeId) -> bool {
        (1..=self.size).contains(&node)
    }

    /// The node entitled to propose in `round`. The round space is partitioned
    /// by residue: node `n` owns rounds n, n + size, n + 2 * size, and so on,
    /// so no two nodes ever propose in the same round.
    pub fn round_owner(&self, round: u64) -> NodeId {
        debug_assert!(round > 0, "Rounds are numbered from 1");
        (round - 1) % self.size + 1
    }
}

#[cfg(test)]
mod tests {
    use crate::Committee;

    #[test]
    fn quorum_thresholds() {
        // GIVEN committees of various sizes
        // THEN the quorum is a simple majority.
        assert_eq!(Committee::new(1).quorum_threshold(), 1);
        assert_eq!(Committee::new(2).quorum_threshold(), 2);
        assert_eq!(Committee::new(4).quorum_threshold(), 3);
        assert_eq!(Committee::new(5).quorum_threshold(), 3);
        assert_eq!(Committee::new(10).quorum_threshold(), 6);
    }

    #[test]
    fn membership_bounds() {
        let committee = Committee::new(10);
        assert!(!committee.contains(0));
        assert!(committee.contains(1));
        assert!(committee.contains(10));
        assert!(!committee.contains(11));
    }

    #[test]
    fn round_ownership_partitions_the_round_space() {
        let committee = Committee::new(10);
        assert_eq!(committee.round_owner(1), 1);
        assert_eq!(committee.round_owner(10), 10);
        assert_eq!(committee.round_owner(11), 1);
        assert_eq!(committee.round_owner(21), 1);
        assert_eq!(committee.round_owner(25), 5);

        // Each node keeps its residue class as rounds grow.
        for node in 1..=10 {
            for lap in 0..5 {
                assert_eq!(committee.round_owner(node + lap * 10), node);
            }
        }
    }
}
