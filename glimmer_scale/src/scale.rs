// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Band, Color, Linear, Threshold};

/// Any of the supported scale families.
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    /// Continuous numeric scale.
    Linear(Linear),
    /// Categorical slot scale.
    Band(Band),
    /// Stepwise color scale.
    Threshold(Threshold<Color>),
}

impl Scale {
    /// Output range for the positional families; `None` for [`Scale::Threshold`].
    pub fn range(&self) -> Option<[f64; 2]> {
        match self {
            Self::Linear(s) => Some(s.range()),
            Self::Band(s) => Some(s.range()),
            Self::Threshold(_) => None,
        }
    }

    /// Same scale over a new output range. Threshold scales are returned unchanged.
    #[must_use]
    pub fn with_range(self, range: [f64; 2]) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(s.with_range(range)),
            Self::Band(s) => Self::Band(s.with_range(range)),
            t @ Self::Threshold(_) => t,
        }
    }

    /// Linear scale, if this is one.
    pub fn as_linear(&self) -> Option<&Linear> {
        match self {
            Self::Linear(s) => Some(s),
            _ => None,
        }
    }

    /// Band scale, if this is one.
    pub fn as_band(&self) -> Option<&Band> {
        match self {
            Self::Band(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Linear> for Scale {
    fn from(s: Linear) -> Self {
        Self::Linear(s)
    }
}

impl From<Band> for Scale {
    fn from(s: Band) -> Self {
        Self::Band(s)
    }
}

impl From<Threshold<Color>> for Scale {
    fn from(s: Threshold<Color>) -> Self {
        Self::Threshold(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_domain() {
        let s = Scale::from(Linear::new([0.0, 10.0], [0.0, 100.0])).with_range([0.0, 50.0]);
        assert_eq!(s.range(), Some([0.0, 50.0]));
        assert_eq!(s.as_linear().unwrap().apply(10.0), 50.0);
    }

    #[test]
    fn threshold_has_no_range() {
        let t = Threshold::new(vec![1.0], vec![Color::BLACK, Color::WHITE]).unwrap();
        let s = Scale::from(t).with_range([0.0, 1.0]);
        assert_eq!(s.range(), None);
        assert!(s.as_band().is_none());
    }
}
