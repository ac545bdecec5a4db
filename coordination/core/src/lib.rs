// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

mod context;
mod coordinator;
mod error;
mod message;
mod metrics;
mod node;
mod round_timeout;

pub use context::Context;
pub use coordinator::{Coordinator, CoordinatorHandle};
pub use error::{CoordinationError, CoordinationResult};
pub use message::{Command, Message, Round, RsvpBody, BROADCAST};
pub use metrics::{initialise_metrics, Metrics, NodeMetrics};
pub use node::CoordinatorNode;

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod coordinator_tests;
