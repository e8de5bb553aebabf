// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glimmer_data::DataError;
use glimmer_scale::ScaleError;
use thiserror::Error;

/// Errors surfaced by a chart handle.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Loading or joining data failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A scale could not be built from configuration or data.
    #[error(transparent)]
    Scale(#[from] ScaleError),

    /// The load was cancelled by teardown or superseded by a newer load.
    #[error("load aborted")]
    Aborted,
}

impl ChartError {
    /// True for cancelled loads, which are not failures.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// Result alias for chart operations.
pub type Result<T, E = ChartError> = core::result::Result<T, E>;
