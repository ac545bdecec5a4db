// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::context::Context;

/// Size of the tick channel between the clock and the coordinator. Ticks are
/// consumed quickly; the buffer only smooths scheduling jitter.
const TICK_CHANNEL_SIZE: usize = 4;

/// The clock of the coordinator: emits one tick every `round_timeout`,
/// declaring the current round stale. The coordinator reacts by abandoning the
/// round and opening a higher one. Liveness lives entirely here; the
/// coordinator itself never times out.
pub(crate) struct RoundTimeoutTask {
    context: Arc<Context>,
    ticks: mpsc::Sender<()>,
    stop: oneshot::Receiver<()>,
}

impl RoundTimeoutTask {
    pub(crate) fn start(context: Arc<Context>) -> (RoundTimeoutTaskHandle, mpsc::Receiver<()>) {
        let (ticks, ticks_receiver) = mpsc::channel(TICK_CHANNEL_SIZE);
        let (stop_sender, stop) = oneshot::channel();
        let task = Self {
            context,
            ticks,
            stop,
        };
        let handle = tokio::spawn(task.run());
        (
            RoundTimeoutTaskHandle {
                handle,
                stop: stop_sender,
            },
            ticks_receiver,
        )
    }

    async fn run(mut self) {
        let round_timeout = self.context.parameters.round_timeout;
        loop {
            tokio::select! {
                _ = sleep(round_timeout) => {
                    if self.ticks.send(()).await.is_err() {
                        debug!("Tick receiver dropped, stopping round timeout task");
                        return;
                    }
                }
                _ = &mut self.stop => {
                    return;
                }
            }
        }
    }
}

pub(crate) struct RoundTimeoutTaskHandle {
    handle: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl RoundTimeoutTaskHandle {
    pub(crate) async fn stop(self) {
        self.stop.send(()).ok();
        self.handle.await.ok();
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use coordination_config::Parameters;

    use super::*;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn ticks_fire_until_stopped() {
        let context = Arc::new(Context::new_for_test(4).with_parameters(Parameters {
            round_timeout: Duration::from_millis(100),
        }));
        let (handle, mut ticks) = RoundTimeoutTask::start(context);

        for _ in 0..3 {
            assert_eq!(ticks.recv().await, Some(()));
        }

        handle.stop().await;
        assert_eq!(ticks.recv().await, None);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn task_exits_when_tick_receiver_is_dropped() {
        let context = Arc::new(Context::new_for_test(4));
        let (handle, ticks) = RoundTimeoutTask::start(context);

        drop(ticks);
        handle.handle.await.unwrap();
    }
}
