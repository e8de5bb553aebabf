// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear (affine) scale with nice-domain and tick helpers.

use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

// Step factor thresholds: sqrt(50), sqrt(10), sqrt(2).
const E10: f64 = 7.071_067_811_865_475;
const E5: f64 = 3.162_277_660_168_379_5;
const E2: f64 = 1.414_213_562_373_095_1;

/// Affine map from `domain` to `range`.
///
/// Values outside the domain extrapolate linearly. A degenerate domain
/// (`d0 == d1`) maps every input to the midpoint of the range.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    domain: [f64; 2],
    range: [f64; 2],
}

impl Linear {
    /// Create a linear scale. Bounds are taken as given, reversed ranges included.
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Create a linear scale, rejecting NaN or infinite bounds.
    pub fn try_new(domain: [f64; 2], range: [f64; 2]) -> Result<Self, ScaleError> {
        if domain.iter().chain(range.iter()).all(|v| v.is_finite()) {
            Ok(Self::new(domain, range))
        } else {
            Err(ScaleError::NonFiniteDomain)
        }
    }

    /// Domain bounds `[d0, d1]`.
    pub const fn domain(&self) -> [f64; 2] {
        self.domain
    }

    /// Range bounds `[r0, r1]`.
    pub const fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Same domain, new range. Used on resize.
    #[must_use]
    pub const fn with_range(self, range: [f64; 2]) -> Self {
        Self {
            domain: self.domain,
            range,
        }
    }

    /// Map a domain value into the range.
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d0 == d1 {
            return (r0 + r1) * 0.5;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range value back into the domain.
    pub fn invert(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r0 == r1 {
            return (d0 + d1) * 0.5;
        }
        d0 + (value - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward so both ends land on a tick step for `count` ticks.
    ///
    /// For a `[0, max]` value axis only the upper end moves.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let [d0, d1] = self.domain;
        if !(d0.is_finite() && d1.is_finite()) || d0 == d1 {
            return self;
        }
        let reversed = d1 < d0;
        let (mut start, mut stop) = if reversed { (d1, d0) } else { (d0, d1) };
        let mut previous: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        let domain = if reversed { [stop, start] } else { [start, stop] };
        Self {
            domain,
            range: self.range,
        }
    }

    /// Roughly `count` round-valued ticks inside the domain, in domain order.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        if count == 0 || !(d0.is_finite() && d1.is_finite()) {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }
        let reversed = d1 < d0;
        let (start, stop) = if reversed { (d1, d0) } else { (d0, d1) };
        let inc = tick_increment(start, stop, count);
        if inc == 0.0 || !inc.is_finite() {
            return Vec::new();
        }
        let mut out = Vec::new();
        if inc > 0.0 {
            let i0 = (start / inc).ceil();
            let i1 = (stop / inc).floor();
            let mut i = i0;
            while i <= i1 {
                out.push(i * inc);
                i += 1.0;
            }
        } else {
            let k = -inc;
            let i0 = (start * k).ceil();
            let i1 = (stop * k).floor();
            let mut i = i0;
            while i <= i1 {
                out.push(i / k);
                i += 1.0;
            }
        }
        if reversed {
            out.reverse();
        }
        out
    }
}

/// Signed tick increment: a positive step, or the negated reciprocal for sub-unit steps.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Tick counts are small integers."
    )]
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10_f64.powf(power)
    } else {
        -10_f64.powf(-power) / factor
    }
}

/// Distance between round ticks when splitting `[start, stop]` into about `count` steps.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (a, b) = if stop < start {
        (stop, start)
    } else {
        (start, stop)
    };
    let inc = tick_increment(a, b, count);
    let step = if inc >= 0.0 { inc } else { -1.0 / inc };
    if stop < start { -step } else { step }
}

/// Largest non-NaN value, or `None` when there is none.
pub fn max_value<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_endpoints_and_midpoint() {
        let s = Linear::new([0.0, 94.0], [400.0, 0.0]);
        assert_eq!(s.apply(94.0), 0.0);
        assert_eq!(s.apply(0.0), 400.0);
        assert_eq!(s.apply(47.0), 200.0);
    }

    #[test]
    fn extrapolates_outside_domain() {
        let s = Linear::new([0.0, 10.0], [0.0, 100.0]);
        assert_eq!(s.apply(20.0), 200.0);
        assert_eq!(s.apply(-5.0), -50.0);
    }

    #[test]
    fn invert_undoes_apply() {
        let s = Linear::new([0.0, 150.0], [150.0, 0.0]);
        assert_eq!(s.invert(s.apply(60.0)), 60.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_midpoint() {
        let s = Linear::new([3.0, 3.0], [0.0, 10.0]);
        assert_eq!(s.apply(3.0), 5.0);
        assert_eq!(s.apply(100.0), 5.0);
    }

    #[test]
    fn try_new_rejects_nan() {
        assert_eq!(
            Linear::try_new([0.0, f64::NAN], [0.0, 1.0]),
            Err(ScaleError::NonFiniteDomain)
        );
    }

    #[test]
    fn nice_rounds_max_outward() {
        let s = Linear::new([0.0, 25.0], [270.0, 0.0]).nice(10);
        assert_eq!(s.domain(), [0.0, 26.0]);
        let s = Linear::new([0.0, 94.0], [0.0, 1.0]).nice(10);
        assert_eq!(s.domain(), [0.0, 100.0]);
    }

    #[test]
    fn nice_keeps_range() {
        let s = Linear::new([0.0, 93.0], [400.0, 0.0]).nice(10);
        assert_eq!(s.range(), [400.0, 0.0]);
    }

    #[test]
    fn ticks_integer_steps() {
        let s = Linear::new([0.0, 60.0], [0.0, 580.0]);
        assert_eq!(
            s.ticks(6),
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
        );
    }

    #[test]
    fn ticks_fractional_steps_are_exact() {
        let s = Linear::new([0.0, 1.0], [0.0, 1.0]);
        assert_eq!(s.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn ticks_follow_reversed_domain() {
        let s = Linear::new([10.0, 0.0], [0.0, 1.0]);
        let t = s.ticks(5);
        assert_eq!(t.first().copied(), Some(10.0));
        assert_eq!(t.last().copied(), Some(0.0));
    }

    #[test]
    fn tick_step_picks_round_numbers() {
        assert_eq!(tick_step(0.0, 26.0, 10), 2.0);
        assert_eq!(tick_step(0.0, 150.0, 10), 20.0);
        assert_eq!(tick_step(0.0, 1.0, 5), 0.2);
    }

    #[test]
    fn max_value_skips_nan() {
        assert_eq!(max_value([10.0, f64::NAN, 25.0, 18.0]), Some(25.0));
        assert_eq!(max_value(Vec::<f64>::new()), None);
    }
}
