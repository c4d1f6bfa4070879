// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrataError {
    #[error("arena allocation failed")]
    OutOfMemory,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("insertion would grow the index past {max_height} levels")]
    HeightLimitExceeded { max_height: usize },
    #[error("structural invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<TryReserveError> for StrataError {
    fn from(_: TryReserveError) -> Self {
        StrataError::OutOfMemory
    }
}
