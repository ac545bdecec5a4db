// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use coordination_config::{Committee, NodeId, Parameters};

#[cfg(test)]
use crate::metrics::test_metrics;
use crate::metrics::Metrics;

/// Context contains the fixed configuration and metrics shared by all components
/// of this node.
#[derive(Clone)]
pub struct Context {
    /// Id of this node in the committee.
    pub own_id: NodeId,
    /// Committee participating in the decision.
    pub committee: Committee,
    /// Operational parameters of this node.
    pub parameters: Parameters,
    /// The value this node proposes when no acceptor has voted before.
    pub target: String,
    /// Metrics of this node.
    pub metrics: Arc<Metrics>,
}

impl Context {
    pub fn new(
        own_id: NodeId,
        committee: Committee,
        parameters: Parameters,
        target: String,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            own_id,
            committee,
            parameters,
            target,
            metrics,
        }
    }

    /// Create a test context as node 1 of a committee of the given size.
    #[cfg(test)]
    pub(crate) fn new_for_test(committee_size: u64) -> Self {
        Context::new(
            1,
            Committee::new(committee_size),
            Parameters::default(),
            "foo".to_string(),
            test_metrics(),
        )
    }

    #[cfg(test)]
    pub(crate) fn with_own_id(mut self, own_id: NodeId) -> Self {
        self.own_id = own_id;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    #[cfg(test)]
    pub(crate) fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}
