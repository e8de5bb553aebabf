// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale construction errors.

use thiserror::Error;

/// Broad classification of a [`ScaleError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The data domain cannot be mapped (for example no categories).
    Domain,
    /// The scale configuration is malformed (programming error).
    Config,
}

/// Errors returned when constructing a scale.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ScaleError {
    /// A band scale was built without any category.
    #[error("band scale needs at least one category")]
    EmptyCategories,

    /// Band padding outside `[0, 1)`.
    #[error("band padding {0} is outside [0, 1)")]
    Padding(f64),

    /// Threshold output count does not match the breakpoint count.
    #[error("threshold scale has {outputs} outputs for {breakpoints} breakpoints; expected {}", breakpoints + 1)]
    ThresholdArity {
        /// Number of breakpoints supplied.
        breakpoints: usize,
        /// Number of outputs supplied.
        outputs: usize,
    },

    /// Threshold breakpoints are not strictly ascending.
    #[error("threshold breakpoint at index {index} is not greater than its predecessor")]
    UnorderedBreakpoints {
        /// Index of the first offending breakpoint.
        index: usize,
    },

    /// A domain or range bound is NaN or infinite.
    #[error("scale bounds must be finite")]
    NonFiniteDomain,
}

impl ScaleError {
    /// Classify the error as a domain or a configuration problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCategories | Self::NonFiniteDomain => ErrorKind::Domain,
            Self::Padding(_) | Self::ThresholdArity { .. } | Self::UnorderedBreakpoints { .. } => {
                ErrorKind::Config
            }
        }
    }
}
