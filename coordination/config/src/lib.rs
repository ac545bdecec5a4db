// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

mod committee;
mod parameters;

pub use committee::*;
pub use parameters::*;
