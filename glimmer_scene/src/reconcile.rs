// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/update/exit reconciliation between rendered and desired element sets.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use glimmer_data::{JoinedEntity, Key};
use tracing::debug;

use crate::element::{Attr, AttrValue, VisualElement};
use crate::target::SceneCommand;

/// Anything identified by a [`Key`].
pub trait Keyed {
    /// Identity.
    fn key(&self) -> &Key;
}

impl Keyed for JoinedEntity {
    fn key(&self) -> &Key {
        &self.key
    }
}

impl Keyed for VisualElement {
    fn key(&self) -> &Key {
        &self.key
    }
}

/// Result of [`reconcile`]: a total, disjoint partition of old and new keys.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition<'a, T> {
    /// New items whose key was not rendered before.
    pub enter: Vec<&'a T>,
    /// New items whose key was already rendered.
    pub update: Vec<&'a T>,
    /// Previously rendered keys absent from the new items.
    pub exit: Vec<Key>,
}

impl<T> Partition<'_, T> {
    /// True if nothing enters or exits.
    pub fn is_stable(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

/// Partition `items` against the `previous` rendered keys.
///
/// `enter` and `update` keep item order and `exit` keeps `previous` order. A
/// key repeated in `items` is only counted once, at its first occurrence.
pub fn reconcile<'a, 'k, T: Keyed>(
    previous: impl IntoIterator<Item = &'k Key>,
    items: &'a [T],
) -> Partition<'a, T> {
    let previous: Vec<&Key> = previous.into_iter().collect();
    let before: HashSet<&Key> = previous.iter().copied().collect();
    let mut seen: HashSet<&Key> = HashSet::with_capacity(items.len());
    let mut enter = Vec::new();
    let mut update = Vec::new();
    for item in items {
        let key = item.key();
        if !seen.insert(key) {
            debug!(%key, "duplicate key in new items; later occurrence ignored");
            continue;
        }
        if before.contains(key) {
            update.push(item);
        } else {
            enter.push(item);
        }
    }
    let mut exited = HashSet::new();
    let exit = previous
        .into_iter()
        .filter(|k| !seen.contains(*k) && exited.insert(*k))
        .cloned()
        .collect();
    Partition {
        enter,
        update,
        exit,
    }
}

/// A desired element state with the state it enters from.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// State to animate towards.
    pub target: VisualElement,
    /// State an entering element is created in.
    pub baseline: VisualElement,
    /// Start delay of this mark's transitions, for staggered reveals.
    pub delay: Duration,
}

impl Mark {
    /// Mark that enters directly at its target.
    pub fn new(target: VisualElement) -> Self {
        Self {
            baseline: target.clone(),
            target,
            delay: Duration::ZERO,
        }
    }

    /// Enter from `baseline` instead of the target.
    #[must_use]
    pub fn entering_from(mut self, baseline: VisualElement) -> Self {
        self.baseline = baseline;
        self
    }

    /// Delay this mark's transitions.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Keyed for Mark {
    fn key(&self) -> &Key {
        &self.target.key
    }
}

/// Durations applied by [`SceneReconciler::plan`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Enter and update transition length.
    pub duration: Duration,
    /// Exit fade length.
    pub exit: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            exit: Duration::from_millis(250),
        }
    }
}

/// A request to animate one attribute of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    /// Element key.
    pub key: Key,
    /// Attribute to animate.
    pub attr: Attr,
    /// Final value.
    pub to: AttrValue,
    /// Start delay.
    pub delay: Duration,
    /// Length.
    pub duration: Duration,
}

/// Output of [`SceneReconciler::plan`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    /// Structural commands to apply before scheduling tweens.
    pub commands: Vec<SceneCommand>,
    /// Attribute animations to hand to the scheduler.
    pub tweens: Vec<Tween>,
    /// Keys created by this plan.
    pub enter: Vec<Key>,
    /// Keys kept and retargeted.
    pub update: Vec<Key>,
    /// Keys now fading out.
    pub exit: Vec<Key>,
}

/// Owns the element set of one layer and diffs it against new marks.
///
/// Exiting elements stay rendered until their opacity transition completes;
/// see [`SceneReconciler::on_transition_complete`].
#[derive(Clone, Debug)]
pub struct SceneReconciler {
    layer: Key,
    order: Vec<Key>,
    elements: HashMap<Key, VisualElement>,
    exiting: HashSet<Key>,
}

impl SceneReconciler {
    /// Reconciler for the elements of `layer`.
    pub fn new(layer: impl Into<Key>) -> Self {
        Self {
            layer: layer.into(),
            order: Vec::new(),
            elements: HashMap::new(),
            exiting: HashSet::new(),
        }
    }

    /// Layer this reconciler writes to.
    pub fn layer(&self) -> &Key {
        &self.layer
    }

    /// Rendered keys in creation order, exiting ones included.
    pub fn keys(&self) -> &[Key] {
        &self.order
    }

    /// Target state of a rendered element.
    pub fn element(&self, key: &Key) -> Option<&VisualElement> {
        self.elements.get(key)
    }

    /// True while `key` is fading out.
    pub fn is_exiting(&self, key: &Key) -> bool {
        self.exiting.contains(key)
    }

    /// Diff `marks` against the rendered set.
    ///
    /// Entering marks are created at their baseline and tweened to their
    /// target. Updated marks are tweened from wherever they are now. Exiting
    /// elements are faded to zero opacity; they are removed once that fade
    /// completes. An exiting element that reappears is treated as an update
    /// and its fade is overridden.
    pub fn plan(&mut self, marks: &[Mark], timing: Timing) -> Plan {
        let partition = reconcile(&self.order, marks);
        let mut plan = Plan::default();

        for mark in &partition.enter {
            let key = mark.target.key.clone();
            plan.commands.push(SceneCommand::Create {
                layer: self.layer.clone(),
                element: mark.baseline.clone(),
            });
            push_tweens(&mut plan, &mark.baseline, &mark.target, mark.delay, timing.duration);
            self.order.push(key.clone());
            self.elements.insert(key.clone(), mark.target.clone());
            plan.enter.push(key);
        }

        for mark in &partition.update {
            let key = mark.target.key.clone();
            let revived = self.exiting.remove(&key);
            let previous = self
                .elements
                .insert(key.clone(), mark.target.clone())
                .unwrap_or_else(|| mark.baseline.clone());
            if previous.shape != mark.target.shape {
                plan.commands.push(SceneCommand::SetShape {
                    key: key.clone(),
                    shape: mark.target.shape.clone(),
                });
            }
            if previous.flags != mark.target.flags {
                // Flags are not animatable; recreate in place.
                plan.commands.push(SceneCommand::Create {
                    layer: self.layer.clone(),
                    element: mark.target.clone(),
                });
            }
            let mut from = previous;
            if revived {
                // Force an opacity tween so the fade-out is interrupted.
                from.opacity = f64::NAN;
            }
            push_tweens(&mut plan, &from, &mark.target, mark.delay, timing.duration);
            plan.update.push(key);
        }

        for key in partition.exit {
            if self.exiting.insert(key.clone()) {
                plan.tweens.push(Tween {
                    key: key.clone(),
                    attr: Attr::Opacity,
                    to: AttrValue::Number(0.0),
                    delay: Duration::ZERO,
                    duration: timing.exit,
                });
            }
            plan.exit.push(key);
        }

        debug!(
            layer = %self.layer,
            enter = plan.enter.len(),
            update = plan.update.len(),
            exit = plan.exit.len(),
            "planned"
        );
        plan
    }

    /// Report a finished transition. Returns the removal command when it ends
    /// an exit fade.
    pub fn on_transition_complete(&mut self, key: &Key, attr: Attr) -> Option<SceneCommand> {
        if attr != Attr::Opacity || !self.exiting.remove(key) {
            return None;
        }
        self.elements.remove(key);
        self.order.retain(|k| k != key);
        Some(SceneCommand::Remove { key: key.clone() })
    }

    /// Forget every element, for example after the layer was cleared.
    pub fn reset(&mut self) {
        self.order.clear();
        self.elements.clear();
        self.exiting.clear();
    }
}

fn push_tweens(
    plan: &mut Plan,
    from: &VisualElement,
    to: &VisualElement,
    delay: Duration,
    duration: Duration,
) {
    for (attr, value) in from.diff(to) {
        plan.tweens.push(Tween {
            key: to.key.clone(),
            attr,
            to: value,
            delay,
            duration,
        });
    }
}
