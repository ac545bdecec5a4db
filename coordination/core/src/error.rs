// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use coordination_config::NodeId;
use thiserror::Error;

use crate::message::Command;

/// Errors produced by the coordination crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoordinationError {
    #[error("Node id {0} is out of range for a committee of {1} nodes")]
    IdOutOfRange(NodeId, u64),

    #[error("Proposal values must not contain the wire delimiter ':'")]
    ValueContainsDelimiter,

    #[error("Unknown command token: {0}")]
    UnknownCommand(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Malformed {cmd} body: {body}")]
    MalformedBody { cmd: Command, body: String },
}

pub type CoordinationResult<T> = Result<T, CoordinationError>;
