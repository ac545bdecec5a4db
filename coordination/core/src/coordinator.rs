// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::{
    context::Context,
    error::{CoordinationError, CoordinationResult},
    message::{Command, Message, Round, RsvpBody},
};

/// The coordinator drives the committee towards choosing a value: it owns one
/// residue class of the round space, conducts the two-phase vote and re-arms
/// itself with a higher round whenever the clock declares the current round
/// stale.
///
/// All mutable state is owned by the single coordinator task, so no locking is
/// needed; the only suspension points are the two stream receives in the main
/// loop. Nominations are handed to detached sender tasks so that a slow
/// outbound stream can never starve the inbound and tick streams.
pub struct Coordinator {
    context: Arc<Context>,
    /// The round this coordinator is currently conducting. Always congruent to
    /// the node's own id modulo the committee size.
    crnd: Round,
    /// Number of RSVPs collected for the current round. Deduplication by
    /// sender is the transport's contract, not enforced here.
    rsvps: u64,
    /// Highest prior-vote round reported across the collected RSVPs, 0 when no
    /// acceptor has ever voted.
    vr: Round,
    /// The value paired with `vr`.
    vv: String,
    /// Set once the current round's NOMINATE has been handed to a sender task.
    nominated: bool,
    inbound: mpsc::Receiver<Message>,
    outbound: mpsc::Sender<Message>,
    ticks: mpsc::Receiver<()>,
}

impl Coordinator {
    /// Validates the configuration and spawns the coordinator task. The task
    /// opens the initial round immediately and runs until the transport closes
    /// the inbound stream, at which point it closes the outbound stream and
    /// terminates.
    pub fn start(
        context: Arc<Context>,
        inbound: mpsc::Receiver<Message>,
        outbound: mpsc::Sender<Message>,
        ticks: mpsc::Receiver<()>,
    ) -> CoordinationResult<CoordinatorHandle> {
        if !context.committee.contains(context.own_id) {
            return Err(CoordinationError::IdOutOfRange(
                context.own_id,
                context.committee.size(),
            ));
        }
        if context.target.contains(':') {
            return Err(CoordinationError::ValueContainsDelimiter);
        }

        let coordinator = Self {
            crnd: context.own_id,
            context,
            rsvps: 0,
            vr: 0,
            vv: String::new(),
            nominated: false,
            inbound,
            outbound,
            ticks,
        };
        let handle = tokio::spawn(coordinator.run());
        Ok(CoordinatorHandle { handle })
    }

    async fn run(mut self) {
        debug!("Coordinator started, opening round {}", self.crnd);
        self.context.metrics.node_metrics.rounds_started.inc();
        self.context
            .metrics
            .node_metrics
            .current_round
            .set(self.crnd as i64);
        if !self.send_invite().await {
            return;
        }

        let mut ticks_open = true;
        loop {
            tokio::select! {
                message = self.inbound.recv() => {
                    let Some(message) = message else {
                        debug!("Inbound stream closed, shutting down");
                        break;
                    };
                    if let Err(e) = self.handle_message(message) {
                        error!("Corrupt message from the transport, aborting coordinator: {e}");
                        return;
                    }
                }
                tick = self.ticks.recv(), if ticks_open => {
                    match tick {
                        Some(()) => {
                            if !self.start_new_round().await {
                                return;
                            }
                        }
                        // A dead clock stops round turnover but is not a
                        // shutdown signal; only inbound closure is.
                        None => ticks_open = false,
                    }
                }
            }
        }
        // Dropping self closes the outbound stream. A nomination still held by
        // a sender task may or may not land before the transport observes the
        // closure; both outcomes are allowed.
    }

    fn handle_message(&mut self, message: Message) -> CoordinationResult<()> {
        match message.cmd {
            Command::Rsvp => self.handle_rsvp(message),
            // The transport multiplexes all roles over one stream; the
            // coordinator only consumes RSVPs.
            _ => {
                trace!("Ignoring {} message from {}", message.cmd, message.from);
                Ok(())
            }
        }
    }

    fn handle_rsvp(&mut self, message: Message) -> CoordinationResult<()> {
        let rsvp = RsvpBody::parse(&message.body)?;

        // Late replies for an abandoned round. The filter is strictly less
        // than: an RSVP claiming a future round implies the acceptor has seen
        // at least our round and still counts towards it.
        if rsvp.round < self.crnd {
            self.context.metrics.node_metrics.stale_rsvps_ignored.inc();
            trace!(
                "Ignoring RSVP for stale round {} while conducting round {}",
                rsvp.round,
                self.crnd
            );
            return Ok(());
        }

        if rsvp.vrnd > self.vr {
            self.vr = rsvp.vrnd;
            self.vv = rsvp.vval;
        }

        self.rsvps += 1;
        self.context.metrics.node_metrics.rsvps_received.inc();

        if self.rsvps >= self.context.committee.quorum_threshold() && !self.nominated {
            self.nominated = true;
            self.send_nominate();
        }
        Ok(())
    }

    /// Emits the NOMINATE for the current round. If any acceptor has voted
    /// before, safety requires proposing the value of the highest reported
    /// vote instead of our own target.
    fn send_nominate(&self) {
        let value = if self.vr > 0 {
            self.vv.as_str()
        } else {
            self.context.target.as_str()
        };
        debug!("Nominating {value:?} in round {}", self.crnd);
        self.context.metrics.node_metrics.nominations_sent.inc();

        let nominate = Message::nominate(self.context.own_id, self.crnd, value);
        let outbound = self.outbound.clone();
        tokio::spawn(async move {
            if outbound.send(nominate).await.is_err() {
                warn!("Outbound stream closed before the nomination could be sent");
            }
        });
    }

    /// Abandons the current round and opens the next one this node owns. Runs
    /// on every tick, even when the abandoned round already nominated: the
    /// nomination may have been lost, and a fresh round keeps the protocol
    /// live.
    async fn start_new_round(&mut self) -> bool {
        self.crnd += self.context.committee.size();
        debug_assert_eq!(
            self.context.committee.round_owner(self.crnd),
            self.context.own_id
        );
        self.rsvps = 0;
        self.vr = 0;
        self.vv.clear();
        self.nominated = false;

        self.context.metrics.node_metrics.rounds_started.inc();
        self.context
            .metrics
            .node_metrics
            .current_round
            .set(self.crnd as i64);
        debug!("Round timed out, opening round {}", self.crnd);
        self.send_invite().await
    }

    /// Sends the INVITE opening the current round. Returns false when the
    /// outbound stream is gone: callers must not close it while the
    /// coordinator runs, so a failed send means the transport is torn down and
    /// the coordinator stops.
    async fn send_invite(&self) -> bool {
        let invite = Message::invite(self.context.own_id, self.crnd);
        if self.outbound.send(invite).await.is_err() {
            warn!("Outbound stream closed, stopping coordinator");
            return false;
        }
        true
    }
}

/// Wraps the join handle of a started coordinator. The coordinator has no stop
/// control of its own: closing its inbound stream is the shutdown signal.
pub struct CoordinatorHandle {
    handle: JoinHandle<()>,
}

impl CoordinatorHandle {
    /// Waits for the coordinator task to terminate.
    pub async fn join(self) {
        self.handle.await.ok();
    }
}
