// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Registry,
};

/// Metrics of a coordination node.
pub struct Metrics {
    pub node_metrics: NodeMetrics,
}

pub fn initialise_metrics(registry: Registry) -> Arc<Metrics> {
    let node_metrics = NodeMetrics::new(&registry);
    Arc::new(Metrics { node_metrics })
}

#[cfg(test)]
pub(crate) fn test_metrics() -> Arc<Metrics> {
    initialise_metrics(Registry::new())
}

pub struct NodeMetrics {
    pub rounds_started: IntCounter,
    pub current_round: IntGauge,
    pub rsvps_received: IntCounter,
    pub stale_rsvps_ignored: IntCounter,
    pub nominations_sent: IntCounter,
}

impl NodeMetrics {
    fn new(registry: &Registry) -> Self {
        Self {
            rounds_started: register_int_counter_with_registry!(
                "rounds_started",
                "Number of rounds this coordinator has opened",
                registry,
            )
            .unwrap(),
            current_round: register_int_gauge_with_registry!(
                "current_round",
                "The round this coordinator is currently conducting",
                registry,
            )
            .unwrap(),
            rsvps_received: register_int_counter_with_registry!(
                "rsvps_received",
                "Number of RSVPs counted towards a round",
                registry,
            )
            .unwrap(),
            stale_rsvps_ignored: register_int_counter_with_registry!(
                "stale_rsvps_ignored",
                "Number of RSVPs dropped because they answered an abandoned round",
                registry,
            )
            .unwrap(),
            nominations_sent: register_int_counter_with_registry!(
                "nominations_sent",
                "Number of NOMINATE messages handed to the transport",
                registry,
            )
            .unwrap(),
        }
    }
}
