// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-(element, attribute) transitions driven by explicit ticks.

use std::collections::BTreeMap;
use std::time::Duration;

use glimmer_scene::{Attr, AttrValue, Key, SceneCommand, Tween};
use tracing::{debug, trace};

use crate::easing::Easing;

/// Duration used when none is given.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(250);

/// A request to animate one attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionSpec {
    /// Element key.
    pub key: Key,
    /// Attribute.
    pub attr: Attr,
    /// Explicit start value; defaults to the target's current value.
    pub from: Option<AttrValue>,
    /// End value.
    pub to: AttrValue,
    /// Delay before interpolation starts.
    pub delay: Duration,
    /// Interpolation length.
    pub duration: Duration,
    /// Progress curve.
    pub easing: Easing,
}

impl TransitionSpec {
    /// Animate `attr` of `key` to `to` with default timing.
    pub fn new(key: impl Into<Key>, attr: Attr, to: impl Into<AttrValue>) -> Self {
        Self {
            key: key.into(),
            attr,
            from: None,
            to: to.into(),
            delay: Duration::ZERO,
            duration: DEFAULT_DURATION,
            easing: Easing::default(),
        }
    }

    /// Spec for a reconciler tween.
    pub fn from_tween(tween: &Tween) -> Self {
        Self {
            key: tween.key.clone(),
            attr: tween.attr,
            from: None,
            to: tween.to,
            delay: tween.delay,
            duration: tween.duration,
            easing: Easing::default(),
        }
    }

    /// Start from `from` instead of the current value.
    #[must_use]
    pub fn from(mut self, from: impl Into<AttrValue>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the start delay.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the length.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// How [`TransitionScheduler::animate`] resolved a request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scheduled {
    /// Nothing owned the pair; the transition starts after its delay.
    Fresh,
    /// A running transition was interrupted at `captured`; the new one starts
    /// from there immediately.
    Interrupted {
        /// In-flight value at the moment of interruption.
        captured: AttrValue,
    },
    /// A transition still waiting out its delay was replaced.
    Replaced,
}

#[derive(Clone, Debug)]
struct Transition {
    from: AttrValue,
    to: AttrValue,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    fn started(&self, now: Duration) -> bool {
        now >= self.start
    }

    fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn value_at(&self, now: Duration) -> AttrValue {
        if !self.started(now) {
            return self.from;
        }
        let t = self.progress(now);
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, self.easing.apply(t))
        }
    }
}

/// Output of [`TransitionScheduler::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Attribute writes for every started transition, in key order.
    pub writes: Vec<SceneCommand>,
    /// Pairs whose transition reached its end this tick.
    pub completed: Vec<(Key, Attr)>,
}

impl Frame {
    /// True if the tick changed nothing.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.completed.is_empty()
    }
}

/// Owns at most one transition per `(key, attribute)` pair.
///
/// Time is always passed in by the caller, so the scheduler is deterministic
/// under a [`ManualClock`](crate::ManualClock).
#[derive(Clone, Debug, Default)]
pub struct TransitionScheduler {
    running: BTreeMap<(Key, Attr), Transition>,
}

impl TransitionScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `spec` at time `now`.
    ///
    /// `current` is the attribute's static value, used as the start when
    /// `spec.from` is unset. If a transition already runs on the pair it is
    /// interrupted: its interpolated value becomes the new start and the new
    /// transition begins at `now`, ignoring `spec.delay`. A transition still in
    /// its delay has written nothing yet, so it is simply replaced.
    pub fn animate(&mut self, now: Duration, spec: TransitionSpec, current: AttrValue) -> Scheduled {
        let pair = (spec.key, spec.attr);
        let (from, start, outcome) = match self.running.get(&pair) {
            Some(old) if old.started(now) => {
                let captured = old.value_at(now);
                debug!(key = %pair.0, attr = pair.1.name(), "transition interrupted");
                (captured, now, Scheduled::Interrupted { captured })
            }
            Some(_) => (
                spec.from.unwrap_or(current),
                now + spec.delay,
                Scheduled::Replaced,
            ),
            None => (
                spec.from.unwrap_or(current),
                now + spec.delay,
                Scheduled::Fresh,
            ),
        };
        self.running.insert(
            pair,
            Transition {
                from,
                to: spec.to,
                start,
                duration: spec.duration,
                easing: spec.easing,
            },
        );
        outcome
    }

    /// Advance to `now`.
    ///
    /// Every started transition writes its interpolated value; finished ones
    /// write their end value, are reported in [`Frame::completed`] and released.
    pub fn tick(&mut self, now: Duration) -> Frame {
        let mut frame = Frame::default();
        for ((key, attr), tr) in &self.running {
            if !tr.started(now) {
                continue;
            }
            frame.writes.push(SceneCommand::SetAttr {
                key: key.clone(),
                attr: *attr,
                value: tr.value_at(now),
            });
            if tr.progress(now) >= 1.0 {
                frame.completed.push((key.clone(), *attr));
            }
        }
        for pair in &frame.completed {
            self.running.remove(pair);
        }
        if !frame.is_empty() {
            trace!(
                writes = frame.writes.len(),
                completed = frame.completed.len(),
                "tick"
            );
        }
        frame
    }

    /// Value the pair shows at `now`, if a transition owns it.
    pub fn current_value(&self, now: Duration, key: &Key, attr: Attr) -> Option<AttrValue> {
        self.running
            .get(&(key.clone(), attr))
            .map(|t| t.value_at(now))
    }

    /// Drop every transition of `key`. Returns how many were dropped.
    pub fn cancel_element(&mut self, key: &Key) -> usize {
        let before = self.running.len();
        self.running.retain(|(k, _), _| k != key);
        before - self.running.len()
    }

    /// Drop everything.
    pub fn cancel_all(&mut self) {
        self.running.clear();
    }

    /// True if no transition is scheduled.
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Number of scheduled transitions.
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Same as [`TransitionScheduler::is_idle`].
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn height(to: f64) -> TransitionSpec {
        TransitionSpec::new("bar", Attr::Height, to)
            .duration(ms(1000))
            .easing(Easing::Linear)
    }

    fn number(v: Option<AttrValue>) -> f64 {
        v.and_then(AttrValue::as_number).unwrap()
    }

    #[test]
    fn interpolates_from_current_value() {
        let mut s = TransitionScheduler::new();
        assert_eq!(s.animate(ms(0), height(100.0), 0.0.into()), Scheduled::Fresh);
        let f = s.tick(ms(250));
        assert_eq!(
            f.writes,
            vec![SceneCommand::SetAttr {
                key: "bar".into(),
                attr: Attr::Height,
                value: AttrValue::Number(25.0),
            }]
        );
        assert!(f.completed.is_empty());
        let f = s.tick(ms(1000));
        assert_eq!(f.completed, vec![(Key::from("bar"), Attr::Height)]);
        assert!(s.is_idle());
    }

    #[test]
    fn interrupt_captures_in_flight_value() {
        let mut s = TransitionScheduler::new();
        let _ = s.animate(ms(0), height(100.0), 0.0.into());
        let outcome = s.animate(ms(500), height(200.0).delay(ms(300)), 0.0.into());
        let Scheduled::Interrupted { captured } = outcome else {
            panic!("expected interruption, got {outcome:?}");
        };
        let captured = captured.as_number().unwrap();
        assert!((captured - 50.0).abs() < 1e-9, "captured {captured}");
        assert_eq!(s.len(), 1);
        // Starts at once from the captured value; the new delay is ignored.
        let v = number(s.current_value(ms(1000), &"bar".into(), Attr::Height));
        assert!((v - 125.0).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn interrupt_ignores_explicit_from() {
        let mut s = TransitionScheduler::new();
        let _ = s.animate(ms(0), height(100.0), 0.0.into());
        let _ = s.animate(ms(500), height(0.0).from(999.0), 0.0.into());
        let v = number(s.current_value(ms(500), &"bar".into(), Attr::Height));
        assert!((v - 50.0).abs() < 1e-9, "no snap, got {v}");
    }

    #[test]
    fn pending_transition_is_replaced() {
        let mut s = TransitionScheduler::new();
        let _ = s.animate(ms(0), height(100.0).delay(ms(500)), 10.0.into());
        assert!(s.tick(ms(100)).is_empty());
        let outcome = s.animate(ms(200), height(40.0).delay(ms(100)), 10.0.into());
        assert_eq!(outcome, Scheduled::Replaced);
        assert!(s.tick(ms(250)).is_empty());
        let v = number(s.current_value(ms(800), &"bar".into(), Attr::Height));
        assert!((v - 25.0).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn stagger_delays_writes() {
        let mut s = TransitionScheduler::new();
        for i in 0..3_u64 {
            let spec = TransitionSpec::new(format!("bar{i}"), Attr::Opacity, 1.0)
                .delay(ms(i * 100))
                .duration(ms(100));
            let _ = s.animate(ms(0), spec, 0.0.into());
        }
        assert_eq!(s.tick(ms(50)).writes.len(), 1);
        assert_eq!(s.tick(ms(150)).writes.len(), 2);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut s = TransitionScheduler::new();
        let spec = TransitionSpec::new("t", Attr::Opacity, 0.9).duration(Duration::ZERO);
        let _ = s.animate(ms(0), spec, 0.0.into());
        let f = s.tick(ms(0));
        assert_eq!(f.completed.len(), 1);
        assert_eq!(
            f.writes[0],
            SceneCommand::SetAttr {
                key: "t".into(),
                attr: Attr::Opacity,
                value: AttrValue::Number(0.9),
            }
        );
    }

    #[test]
    fn pairs_are_independent_and_cancellable() {
        let mut s = TransitionScheduler::new();
        let _ = s.animate(ms(0), height(1.0), 0.0.into());
        let _ = s.animate(
            ms(0),
            TransitionSpec::new("bar", Attr::Y, 5.0),
            0.0.into(),
        );
        let _ = s.animate(ms(0), TransitionSpec::new("dot", Attr::Y, 5.0), 0.0.into());
        assert_eq!(s.len(), 3);
        assert_eq!(s.cancel_element(&"bar".into()), 2);
        assert_eq!(s.len(), 1);
        s.cancel_all();
        assert!(s.is_idle());
    }

    #[test]
    fn colors_interpolate() {
        use glimmer_scale::Color;
        let mut s = TransitionScheduler::new();
        let spec = TransitionSpec::new("r", Attr::Fill, Color::WHITE)
            .duration(ms(100))
            .easing(Easing::Linear);
        let _ = s.animate(ms(0), spec, Color::BLACK.into());
        let f = s.tick(ms(100));
        assert_eq!(
            f.writes[0],
            SceneCommand::SetAttr {
                key: "r".into(),
                attr: Attr::Fill,
                value: AttrValue::Color(Color::WHITE),
            }
        );
    }
}
