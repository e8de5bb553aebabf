// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking over hit-test key paths.
//!
//! ```
//! use glimmer_interact::{HoverEvent, HoverState};
//! let mut h: HoverState<&str> = HoverState::new();
//! assert_eq!(h.update_path(&["marks", "a"]), vec![HoverEvent::Enter("marks"), HoverEvent::Enter("a")]);
//! assert_eq!(h.update_path(&["marks", "b"]), vec![HoverEvent::Leave("a"), HoverEvent::Enter("b")]);
//! ```

/// Tracks the hovered `[layer, element]` path and reports what was left and
/// entered when it changes.
///
/// Leaves are reported innermost first, enters outermost first, so a pointer
/// moving between two elements of the same layer never leaves the layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Clone + Eq> {
    current: Vec<K>,
}

/// One hover transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered this node.
    Enter(K),
    /// The pointer left this node.
    Leave(K),
}

impl<K: Clone + Eq> HoverState<K> {
    /// Nothing hovered.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Hovered path, outermost first.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Innermost hovered node.
    pub fn target(&self) -> Option<&K> {
        self.current.last()
    }

    /// Leave everything.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.current.drain(..).rev().map(HoverEvent::Leave).collect()
    }

    /// Move to `new_path` and return the transitions from the old path.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        let shared = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out: Vec<_> = self.current[shared..]
            .iter()
            .rev()
            .cloned()
            .map(HoverEvent::Leave)
            .collect();
        out.extend(new_path[shared..].iter().cloned().map(HoverEvent::Enter));

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_path_enters_outer_to_inner() {
        let mut h: HoverState<u32> = HoverState::new();
        assert_eq!(
            h.update_path(&[1, 2]),
            vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]
        );
        assert_eq!(h.target(), Some(&2));
    }

    #[test]
    fn sibling_change_keeps_shared_layer() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2]);
        assert_eq!(
            h.update_path(&[1, 3]),
            vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]
        );
    }

    #[test]
    fn disjoint_paths_leave_everything_first() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2]);
        assert_eq!(
            h.update_path(&[4, 5]),
            vec![
                HoverEvent::Leave(2),
                HoverEvent::Leave(1),
                HoverEvent::Enter(4),
                HoverEvent::Enter(5),
            ]
        );
    }

    #[test]
    fn same_path_is_silent() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[7, 8]);
        assert!(h.update_path(&[7, 8]).is_empty());
    }

    #[test]
    fn clear_leaves_inner_to_outer() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2]);
        assert_eq!(h.clear(), vec![HoverEvent::Leave(2), HoverEvent::Leave(1)]);
        assert!(h.current_path().is_empty());
        assert!(h.clear().is_empty());
    }
}
