// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Operational configurations of a coordination node.
///
/// All fields should tolerate inconsistencies among nodes, without affecting safety of the
/// protocol. The round timeout only decides how long a node waits before abandoning a round,
/// never which value may be chosen.
///
/// NOTE: default values should make sense, so most operators should not need to specify any field.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Parameters {
    /// Time to wait for a round to gather a quorum of replies before abandoning it and
    /// starting a new one.
    #[serde(default = "Parameters::default_round_timeout")]
    pub round_timeout: Duration,
}

impl Parameters {
    pub fn default_round_timeout() -> Duration {
        Duration::from_millis(250)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            round_timeout: Parameters::default_round_timeout(),
        }
    }
}
