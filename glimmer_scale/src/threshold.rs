// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold scale: stepwise mapping through ascending breakpoints.

use crate::error::ScaleError;

/// Maps a continuous value to one of `breakpoints.len() + 1` outputs.
///
/// The output index is the number of breakpoints `<=` the value, so a value
/// exactly on a breakpoint maps to the output above it.
#[derive(Clone, Debug, PartialEq)]
pub struct Threshold<T> {
    breakpoints: Vec<f64>,
    outputs: Vec<T>,
}

/// One interval of a [`Threshold`] scale with its output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bucket<'a, T> {
    /// Inclusive lower breakpoint; `None` for the first bucket.
    pub lower: Option<f64>,
    /// Exclusive upper breakpoint; `None` for the last bucket.
    pub upper: Option<f64>,
    /// Output for values in this bucket.
    pub output: &'a T,
}

impl<T> Threshold<T> {
    /// Build a threshold scale.
    ///
    /// Fails when `outputs.len() != breakpoints.len() + 1` or when breakpoints
    /// are not strictly ascending finite numbers.
    pub fn new(breakpoints: Vec<f64>, outputs: Vec<T>) -> Result<Self, ScaleError> {
        if outputs.len() != breakpoints.len() + 1 {
            return Err(ScaleError::ThresholdArity {
                breakpoints: breakpoints.len(),
                outputs: outputs.len(),
            });
        }
        if breakpoints.iter().any(|b| !b.is_finite()) {
            return Err(ScaleError::NonFiniteDomain);
        }
        if let Some(i) = breakpoints.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ScaleError::UnorderedBreakpoints { index: i + 1 });
        }
        Ok(Self {
            breakpoints,
            outputs,
        })
    }

    /// Ascending breakpoints.
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Outputs, lowest bucket first.
    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }

    /// Output index for `value`; `None` for NaN.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        Some(self.breakpoints.partition_point(|b| *b <= value))
    }

    /// Output for `value`; `None` for NaN.
    pub fn apply(&self, value: f64) -> Option<&T> {
        self.index_of(value).map(|i| &self.outputs[i])
    }

    /// Iterate buckets from lowest to highest.
    pub fn buckets(&self) -> impl Iterator<Item = Bucket<'_, T>> + '_ {
        self.outputs.iter().enumerate().map(|(i, output)| Bucket {
            lower: i.checked_sub(1).map(|j| self.breakpoints[j]),
            upper: self.breakpoints.get(i).copied(),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn breakpoints() -> Vec<f64> {
        (1..=12).map(|i| f64::from(i) * 5.0).collect()
    }

    #[test]
    fn upper_inclusive_at_breakpoints() {
        let t = Threshold::new(breakpoints(), (0..13).collect()).unwrap();
        assert_eq!(t.apply(3.0), Some(&0));
        assert_eq!(t.apply(5.0), Some(&1));
        assert_eq!(t.apply(4.999), Some(&0));
        assert_eq!(t.apply(60.0), Some(&12));
        assert_eq!(t.apply(-100.0), Some(&0));
    }

    #[test]
    fn eleven_breakpoints_twelve_colors() {
        // [5, 10, ..., 55] with twelve outputs.
        let bps: Vec<f64> = (1..=11).map(|i| f64::from(i) * 5.0).collect();
        let t = Threshold::new(bps, (0..12).collect::<Vec<u32>>()).unwrap();
        assert_eq!(t.apply(3.0), Some(&0));
        assert_eq!(t.apply(5.0), Some(&1));
        assert_eq!(t.apply(61.0), Some(&11));
    }

    #[test]
    fn nan_has_no_output() {
        let t = Threshold::new(vec![1.0], vec!['a', 'b']).unwrap();
        assert_eq!(t.apply(f64::NAN), None);
    }

    #[test]
    fn arity_mismatch_is_a_config_error() {
        let err = Threshold::new(breakpoints(), vec![0; 12]).unwrap_err();
        assert_eq!(
            err,
            ScaleError::ThresholdArity {
                breakpoints: 12,
                outputs: 12
            }
        );
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn breakpoints_must_strictly_ascend() {
        let err = Threshold::new(vec![1.0, 3.0, 3.0], vec![0; 4]).unwrap_err();
        assert_eq!(err, ScaleError::UnorderedBreakpoints { index: 2 });
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn buckets_cover_the_line() {
        let t = Threshold::new(vec![5.0, 10.0], vec!["a", "b", "c"]).unwrap();
        let b: Vec<_> = t.buckets().collect();
        assert_eq!(b.len(), 3);
        assert_eq!((b[0].lower, b[0].upper), (None, Some(5.0)));
        assert_eq!((b[1].lower, b[1].upper), (Some(5.0), Some(10.0)));
        assert_eq!((b[2].lower, b[2].upper), (Some(10.0), None));
        assert_eq!(*b[2].output, "c");
    }
}
