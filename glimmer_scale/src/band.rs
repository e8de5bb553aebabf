// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Band (ordinal) scale: evenly spaced slots for categories.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

/// A category's slot in a [`Band`] scale.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandSlot {
    /// Lower edge of the padded band.
    pub start: f64,
    /// Width of the padded band.
    pub bandwidth: f64,
}

impl BandSlot {
    /// Midpoint of the band.
    pub fn center(&self) -> f64 {
        self.start + self.bandwidth * 0.5
    }
}

/// Divides a range into `|categories|` equal slots.
///
/// `bandwidth = slot * (1 - padding)` and `start = slot_start + slot * padding / 2`,
/// so every band lies inside the range. Slots follow category order from
/// `range[0]` towards `range[1]`; a reversed range lays them out right to left.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    categories: Vec<String>,
    positions: HashMap<String, usize>,
    range: [f64; 2],
    padding: f64,
}

impl Band {
    /// Build a band scale. Duplicate categories keep their first position.
    pub fn new<I, S>(categories: I, range: [f64; 2], padding: f64) -> Result<Self, ScaleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !(0.0..1.0).contains(&padding) {
            return Err(ScaleError::Padding(padding));
        }
        if !(range[0].is_finite() && range[1].is_finite()) {
            return Err(ScaleError::NonFiniteDomain);
        }
        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for c in categories {
            let c = c.into();
            if !positions.contains_key(&c) {
                positions.insert(c.clone(), ordered.len());
                ordered.push(c);
            }
        }
        if ordered.is_empty() {
            return Err(ScaleError::EmptyCategories);
        }
        Ok(Self {
            categories: ordered,
            positions,
            range,
            padding,
        })
    }

    /// Ordered, de-duplicated categories.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Range bounds `[r0, r1]`.
    pub const fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Padding fraction in `[0, 1)`.
    pub const fn padding(&self) -> f64 {
        self.padding
    }

    /// Same categories and padding over a new range. Used on resize.
    #[must_use]
    pub fn with_range(mut self, range: [f64; 2]) -> Self {
        self.range = range;
        self
    }

    /// Width of one unpadded slot.
    pub fn step(&self) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Category counts are far below 2^52."
        )]
        let n = self.categories.len() as f64;
        (self.range[1] - self.range[0]).abs() / n
    }

    /// Width of every padded band.
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Slot for `category`, or `None` if it is not in the domain.
    pub fn slot(&self, category: &str) -> Option<BandSlot> {
        let i = *self.positions.get(category)?;
        self.slot_at(i)
    }

    /// Slot for the category at `index` in domain order, or `None` past the
    /// last category.
    pub fn slot_at(&self, index: usize) -> Option<BandSlot> {
        if index >= self.categories.len() {
            return None;
        }
        let [r0, r1] = self.range;
        let n = self.categories.len();
        let pos = if r1 < r0 { n - 1 - index } else { index };
        let step = self.step();
        #[allow(
            clippy::cast_precision_loss,
            reason = "Category counts are far below 2^52."
        )]
        let slot_start = r0.min(r1) + pos as f64 * step;
        Some(BandSlot {
            start: slot_start + step * self.padding * 0.5,
            bandwidth: step * (1.0 - self.padding),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<&'static str> {
        vec![
            "Category 1",
            "Category 2",
            "Category 3",
            "Category 4",
            "Category 5",
        ]
    }

    #[test]
    fn slot_at_matches_slot_and_rejects_out_of_range() {
        let band = Band::new(labels(), [0.0, 500.0], 0.1).unwrap();
        assert_eq!(band.slot_at(2), band.slot("Category 3"));
        assert!(band.slot_at(5).is_none());
    }

    #[test]
    fn empty_categories_is_a_domain_error() {
        let err = Band::new(Vec::<String>::new(), [0.0, 100.0], 0.1).unwrap_err();
        assert_eq!(err, ScaleError::EmptyCategories);
        assert_eq!(err.kind(), crate::ErrorKind::Domain);
    }

    #[test]
    fn padding_must_be_below_one() {
        assert_eq!(
            Band::new(["a"], [0.0, 1.0], 1.0).unwrap_err(),
            ScaleError::Padding(1.0)
        );
        assert!(Band::new(["a"], [0.0, 1.0], -0.1).is_err());
    }

    #[test]
    fn slots_are_evenly_spaced() {
        let b = Band::new(labels(), [0.0, 500.0], 0.1).unwrap();
        assert_eq!(b.step(), 100.0);
        let s0 = b.slot("Category 1").unwrap();
        let s1 = b.slot("Category 2").unwrap();
        assert!((s0.start - 5.0).abs() < 1e-9);
        assert!((s0.bandwidth - 90.0).abs() < 1e-9);
        assert!((s1.start - s0.start - 100.0).abs() < 1e-9);
    }

    #[test]
    fn every_band_stays_inside_the_range() {
        for &(r0, r1) in &[(0.0, 740.0), (13.0, 97.5), (-50.0, 50.0), (300.0, 0.0)] {
            for &padding in &[0.0, 0.1, 0.5, 0.95] {
                let b = Band::new(labels(), [r0, r1], padding).unwrap();
                let (lo, hi) = (f64::min(r0, r1), f64::max(r0, r1));
                for c in labels() {
                    let s = b.slot(c).unwrap();
                    assert!(s.start >= lo - 1e-9, "start below range");
                    assert!(s.start + s.bandwidth <= hi + 1e-9, "band past range end");
                }
            }
        }
    }

    #[test]
    fn reversed_range_lays_out_backwards() {
        let b = Band::new(["a", "b"], [100.0, 0.0], 0.0).unwrap();
        assert_eq!(b.slot("a").unwrap().start, 50.0);
        assert_eq!(b.slot("b").unwrap().start, 0.0);
    }

    #[test]
    fn unknown_category_has_no_slot() {
        let b = Band::new(["a"], [0.0, 1.0], 0.0).unwrap();
        assert!(b.slot("z").is_none());
    }

    #[test]
    fn duplicates_keep_first_position() {
        let b = Band::new(["a", "b", "a"], [0.0, 100.0], 0.0).unwrap();
        assert_eq!(b.categories(), &["a".to_string(), "b".to_string()]);
        assert_eq!(b.step(), 50.0);
    }
}
