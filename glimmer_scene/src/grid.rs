// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid over surface-space AABBs.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

use kurbo::{Point, Rect};

/// Cell-based spatial index keyed by slot number.
///
/// Entries are conservative AABBs; precise containment is left to the caller.
pub(crate) struct Grid {
    cell: f64,
    entries: Vec<Option<Rect>>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl Grid {
    pub(crate) fn new(cell: f64) -> Self {
        debug_assert!(cell > 0.0, "cell size must be positive");
        Self {
            cell,
            entries: Vec::new(),
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Surface coordinates are far inside the i64 range."
        )]
        let i = v.floor() as i64;
        i
    }

    fn key_for(&self, x: f64, y: f64) -> (i64, i64) {
        (
            Self::floor_to_i64(x / self.cell),
            Self::floor_to_i64(y / self.cell),
        )
    }

    fn cells_for(&self, r: Rect) -> impl Iterator<Item = (i64, i64)> {
        let (minx, miny) = self.key_for(r.x0, r.y0);
        let (maxx, maxy) = self.key_for(r.x1, r.y1);
        (miny..=maxy).flat_map(move |y| (minx..=maxx).map(move |x| (x, y)))
    }

    fn unlink(&mut self, slot: usize) {
        let Some(Some(old)) = self.entries.get(slot).copied() else {
            return;
        };
        let keys: Vec<_> = self.cells_for(old).collect();
        for key in keys {
            if let Some(slots) = self.cells.get_mut(&key) {
                if let Some(pos) = slots.iter().position(|&s| s == slot) {
                    slots.swap_remove(pos);
                }
                if slots.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Insert or move `slot`. Empty or non-finite rects are not indexed.
    pub(crate) fn set(&mut self, slot: usize, aabb: Rect) {
        self.unlink(slot);
        if self.entries.len() <= slot {
            self.entries.resize(slot + 1, None);
        }
        let finite = [aabb.x0, aabb.y0, aabb.x1, aabb.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || aabb.area() <= 0.0 {
            self.entries[slot] = None;
            return;
        }
        self.entries[slot] = Some(aabb);
        let keys: Vec<_> = self.cells_for(aabb).collect();
        for key in keys {
            self.cells.entry(key).or_default().push(slot);
        }
    }

    pub(crate) fn remove(&mut self, slot: usize) {
        self.unlink(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }

    /// Slots whose AABB contains `pt`, ascending.
    pub(crate) fn query_point(&self, pt: Point) -> BTreeSet<usize> {
        let key = self.key_for(pt.x, pt.y);
        self.cells
            .get(&key)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&s| {
                self.entries
                    .get(s)
                    .copied()
                    .flatten()
                    .is_some_and(|r| contains_closed(r, pt))
            })
            .collect()
    }
}

// `Rect::contains` is half-open; picking treats the far edges as inside.
fn contains_closed(r: Rect, pt: Point) -> bool {
    pt.x >= r.x0 && pt.x <= r.x1 && pt.y >= r.y0 && pt.y <= r.y1
}

impl Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("Grid")
            .field("cell", &self.cell)
            .field("total_slots", &self.entries.len())
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_queries_filter_by_aabb() {
        let mut g = Grid::new(32.0);
        g.set(0, Rect::new(0.0, 0.0, 10.0, 10.0));
        g.set(1, Rect::new(5.0, 5.0, 40.0, 40.0));
        assert_eq!(g.query_point(Point::new(7.0, 7.0)).into_iter().collect::<Vec<_>>(), [0, 1]);
        assert_eq!(g.query_point(Point::new(20.0, 20.0)).into_iter().collect::<Vec<_>>(), [1]);
        assert!(g.query_point(Point::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn moving_and_removing_update_cells() {
        let mut g = Grid::new(16.0);
        g.set(3, Rect::new(0.0, 0.0, 8.0, 8.0));
        g.set(3, Rect::new(100.0, 100.0, 108.0, 108.0));
        assert!(g.query_point(Point::new(4.0, 4.0)).is_empty());
        assert!(g.query_point(Point::new(104.0, 104.0)).contains(&3));
        g.remove(3);
        assert!(g.query_point(Point::new(104.0, 104.0)).is_empty());
        assert!(g.cells.is_empty());
    }

    #[test]
    fn negative_coordinates_are_indexed() {
        let mut g = Grid::new(10.0);
        g.set(0, Rect::new(-25.0, -5.0, -15.0, 5.0));
        assert!(g.query_point(Point::new(-20.0, 0.0)).contains(&0));
    }

    #[test]
    fn degenerate_rects_are_skipped() {
        let mut g = Grid::new(10.0);
        g.set(0, Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(g.query_point(Point::new(0.0, 5.0)).is_empty());
    }
}
