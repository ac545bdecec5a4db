// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use coordination_config::{Committee, NodeId, Parameters};
use prometheus::Registry;
use tokio::sync::mpsc;
use tracing::info;

use crate::context::Context;
use crate::coordinator::{Coordinator, CoordinatorHandle};
use crate::error::CoordinationResult;
use crate::message::Message;
use crate::metrics::initialise_metrics;
use crate::round_timeout::{RoundTimeoutTask, RoundTimeoutTaskHandle};

/// A coordination node wires the coordinator to the transport's streams and
/// owns the clock that abandons stalled rounds.
pub struct CoordinatorNode {
    context: Arc<Context>,
    start_time: Instant,
    round_timeout_handle: RoundTimeoutTaskHandle,
    coordinator_handle: CoordinatorHandle,
}

impl CoordinatorNode {
    /// Starts the coordinator for `own_id`, reading protocol messages from
    /// `inbound` and emitting INVITE and NOMINATE messages on `outbound`. The
    /// node shuts down once the transport closes the inbound stream.
    pub fn start(
        own_id: NodeId,
        committee: Committee,
        parameters: Parameters,
        target: String,
        registry: Registry,
        inbound: mpsc::Receiver<Message>,
        outbound: mpsc::Sender<Message>,
    ) -> CoordinationResult<Self> {
        info!("Starting coordination node {own_id}");
        let context = Arc::new(Context::new(
            own_id,
            committee,
            parameters,
            target,
            initialise_metrics(registry),
        ));
        let start_time = Instant::now();

        let (round_timeout_handle, ticks) = RoundTimeoutTask::start(context.clone());
        let coordinator_handle = Coordinator::start(context.clone(), inbound, outbound, ticks)?;

        Ok(Self {
            context,
            start_time,
            round_timeout_handle,
            coordinator_handle,
        })
    }

    /// Stops the clock and waits for the coordinator to terminate. The caller
    /// is expected to have closed the inbound stream first.
    pub async fn stop(self) {
        self.round_timeout_handle.stop().await;
        self.coordinator_handle.join().await;
        info!(
            "Coordination node {} stopped. Total run time: {:?}",
            self.context.own_id,
            self.start_time.elapsed()
        );
    }
}

#[cfg(test)]
mod test {
    use coordination_config::{Committee, Parameters};
    use prometheus::Registry;
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn start_and_stop() {
        let (ins, inbound) = mpsc::channel(8);
        let (outbound, mut outs) = mpsc::channel(8);
        let node = CoordinatorNode::start(
            1,
            Committee::new(4),
            Parameters::default(),
            "value".to_string(),
            Registry::new(),
            inbound,
            outbound,
        )
        .unwrap();

        assert_eq!(outs.recv().await.unwrap().to_string(), "1:*:INVITE:1");
        // With the clock running, stalled rounds keep getting re-opened.
        assert_eq!(outs.recv().await.unwrap().to_string(), "1:*:INVITE:5");

        drop(ins);
        node.stop().await;
        assert_eq!(outs.recv().await, None);
    }
}
