// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart lifecycle: init, update, tick and teardown.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use glimmer_data::{DataLoader, Fetch, JoinPolicy, JoinedEntity, Key, Source};
use glimmer_interact::{EntityIndex, InteractionLayer, TooltipChange, TooltipState};
use glimmer_scene::{
    Attr, AttrValue, Damage, RenderTarget, SceneCommand, SceneReconciler, Shape, Surface,
    TextAnchor, VisualElement,
};
use glimmer_scale::Color;
use glimmer_transition::{Clock, TransitionScheduler, TransitionSpec};
use kurbo::{Affine, Point, Size};
use tracing::{debug, error, info};

use crate::config::TooltipConfig;
use crate::error::{ChartError, Result};
use crate::events::{HostEvent, ListenerRegistry, Subscription};
use crate::view::{
    MARKS_LAYER, MARKS_Z, STATUS_LAYER, STATUS_Z, TOOLTIP_KEY, TOOLTIP_LAYER, TOOLTIP_Z,
    TooltipText, View, layer,
};

const STATUS_KEY: &str = "status/label";
const STATUS_FONT: f64 = 14.0;
const TOOLTIP_FONT: f64 = 12.0;

/// What the status layer currently reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load has been started.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The last load succeeded, or data was supplied directly.
    Ready,
    /// The last load failed with this message.
    Failed(String),
}

/// Everything released on teardown.
struct Resources {
    // Dropping unregisters the host listener.
    _subscription: Subscription,
    loads: Vec<AbortHandle>,
}

impl Resources {
    fn abort_loads(&mut self) {
        for load in self.loads.drain(..) {
            load.abort();
        }
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        self.abort_loads();
    }
}

struct Tooltip {
    layer: InteractionLayer<TooltipText>,
    config: TooltipConfig,
}

/// A mounted chart.
///
/// The handle owns its render target, its reconciler and scheduler, and every
/// resource acquired at init. Host events arrive through the
/// [`ListenerRegistry`] passed to [`Handle::init`] and are processed on the
/// next [`tick`](Self::tick). Nothing is released until
/// [`teardown`](Self::teardown), which also runs if the handle is simply
/// dropped.
pub struct Handle<V, T = Surface> {
    view: V,
    target: T,
    clock: Arc<dyn Clock>,
    size: Size,
    entities: EntityIndex,
    reconciler: SceneReconciler,
    scheduler: TransitionScheduler,
    tooltip: Option<Tooltip>,
    generation: u64,
    status: LoadStatus,
    inbox: Rc<RefCell<VecDeque<HostEvent>>>,
    resources: Resources,
}

impl<V: fmt::Debug, T> fmt::Debug for Handle<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("view", &self.view)
            .field("size", &self.size)
            .field("entities", &self.entities.len())
            .field("reconciler", &self.reconciler)
            .field("scheduler", &self.scheduler)
            .field("generation", &self.generation)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<V: View, T: RenderTarget> Handle<V, T> {
    /// Mount `view` on `target`.
    ///
    /// Creates the marks, status and tooltip layers, subscribes to `events`
    /// and draws the empty chart. Fails if the view cannot lay out even
    /// without data, which means its configuration is invalid.
    pub fn init(
        view: V,
        mut target: T,
        clock: Arc<dyn Clock>,
        events: &ListenerRegistry,
        size: Size,
    ) -> Result<Self> {
        let inbox: Rc<RefCell<VecDeque<HostEvent>>> = Rc::default();
        let sink = Rc::downgrade(&inbox);
        let subscription = events.subscribe(move |event| {
            if let Some(inbox) = sink.upgrade() {
                inbox.borrow_mut().push_back(*event);
            }
        });

        target.apply_all(vec![
            layer(MARKS_LAYER, Affine::IDENTITY, MARKS_Z),
            layer(STATUS_LAYER, Affine::IDENTITY, STATUS_Z),
        ]);
        let tooltip = view.tooltip().map(|(text, config)| {
            target.apply_all(vec![
                layer(TOOLTIP_LAYER, Affine::IDENTITY, TOOLTIP_Z),
                SceneCommand::Create {
                    layer: Key::from(TOOLTIP_LAYER),
                    element: VisualElement::text(TOOLTIP_KEY, "", Point::ZERO)
                        .font(TOOLTIP_FONT, TextAnchor::Middle)
                        .fill(Color::BLACK)
                        .opacity(0.0)
                        .non_pickable(),
                },
            ]);
            Tooltip {
                layer: InteractionLayer::new(text)
                    .with_offset(config.offset())
                    .for_layer(view.interactive_layer()),
                config,
            }
        });

        let mut handle = Self {
            view,
            target,
            clock,
            size,
            entities: EntityIndex::default(),
            reconciler: SceneReconciler::new(MARKS_LAYER),
            scheduler: TransitionScheduler::new(),
            tooltip,
            generation: 0,
            status: LoadStatus::Idle,
            inbox,
            resources: Resources {
                _subscription: subscription,
                loads: Vec::new(),
            },
        };
        handle.relayout()?;
        debug!(size = ?size, "chart mounted");
        Ok(handle)
    }

    /// Replace the data with `entities`.
    ///
    /// In-flight loads are aborted so they cannot overwrite this data later.
    /// Marks animate from wherever they are now, so calling this mid-transition
    /// never snaps.
    pub fn update(&mut self, entities: Vec<JoinedEntity>) -> Result<()> {
        self.supersede_loads();
        self.set_status(LoadStatus::Ready);
        self.set_entities(entities)
    }

    /// Lay out again for a new surface size.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        self.relayout()
    }

    /// Process queued host events, advance transitions and commit the target.
    pub fn tick(&mut self) -> Damage {
        let events: Vec<HostEvent> = self.inbox.borrow_mut().drain(..).collect();
        for event in &events {
            if let Err(e) = self.handle_event(event) {
                error!(error = %e, "event handling failed");
            }
        }

        let frame = self.scheduler.tick(self.clock.now());
        self.target.apply_all(frame.writes);
        for (key, attr) in frame.completed {
            if let Some(remove) = self.reconciler.on_transition_complete(&key, attr) {
                // Geometry tweens may outlive the fade.
                self.scheduler.cancel_element(&key);
                self.target.apply(remove);
            }
        }
        self.target.commit()
    }

    /// React to one host event immediately.
    pub fn handle_event(&mut self, event: &HostEvent) -> Result<()> {
        let change = match *event {
            HostEvent::Resize(size) => return self.resize(size),
            HostEvent::PointerMove(point) => match &mut self.tooltip {
                Some(tooltip) => tooltip
                    .layer
                    .on_pointer_move(&self.target, point, &self.entities),
                None => return Ok(()),
            },
            HostEvent::PointerLeave => match &mut self.tooltip {
                Some(tooltip) => tooltip.layer.on_pointer_leave(),
                None => return Ok(()),
            },
        };
        self.show_tooltip_change(change);
        Ok(())
    }

    /// Start loading the view's sources.
    ///
    /// Any older load is aborted and the status layer shows a loading label.
    /// Drive the returned ticket with [`LoadTicket::run`] on any executor and
    /// hand its result to [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self) -> LoadTicket {
        self.supersede_loads();
        let (abort, registration) = AbortHandle::new_pair();
        self.resources.loads.push(abort);
        self.set_status(LoadStatus::Loading);
        let sources = self.view.sources();
        debug!(generation = self.generation, sources = sources.len(), "load started");
        LoadTicket {
            generation: self.generation,
            sources,
            policy: self.view.join_policy(),
            registration,
        }
    }

    /// Apply a finished load.
    ///
    /// Returns `Ok(false)` when the result belongs to a superseded or aborted
    /// load and was ignored. A failed load clears the marks and shows an
    /// error label; no partial chart is drawn.
    pub fn finish_load(&mut self, load: LoadResult) -> Result<bool> {
        if load.generation != self.generation {
            debug!(
                generation = load.generation,
                current = self.generation,
                "stale load ignored"
            );
            return Ok(false);
        }
        self.resources.loads.clear();
        match load.result {
            Ok(entities) => {
                info!(entities = entities.len(), "chart data loaded");
                self.set_status(LoadStatus::Ready);
                self.set_entities(entities)?;
                Ok(true)
            }
            Err(ChartError::Aborted) => Ok(false),
            Err(e) => {
                error!(error = %e, "chart load failed");
                self.clear_marks();
                self.set_status(LoadStatus::Failed(e.to_string()));
                self.relayout()?;
                Err(e)
            }
        }
    }

    /// Unmount the chart.
    ///
    /// Unregisters the host listener and aborts in-flight loads, then hands
    /// the target back.
    pub fn teardown(self) -> T {
        let Self {
            target, resources, ..
        } = self;
        drop(resources);
        debug!("chart torn down");
        target
    }

    /// The render target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Entities currently bound.
    pub fn entities(&self) -> &[JoinedEntity] {
        self.entities.as_slice()
    }

    /// Current surface size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Status of the most recent load.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// True while transitions are running.
    pub fn is_animating(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Tooltip text and visibility, if the view shows tooltips.
    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref().map(|t| t.layer.tooltip())
    }

    fn supersede_loads(&mut self) {
        self.resources.abort_loads();
        self.generation += 1;
    }

    fn set_entities(&mut self, entities: Vec<JoinedEntity>) -> Result<()> {
        self.entities = EntityIndex::new(entities);
        self.relayout()?;
        let orphaned = self.tooltip.as_ref().is_some_and(|t| {
            t.layer
                .tooltip()
                .source
                .as_ref()
                .is_some_and(|key| !self.entities.contains(key))
        });
        if orphaned {
            if let Some(tooltip) = &mut self.tooltip {
                let change = tooltip.layer.on_pointer_leave();
                self.show_tooltip_change(change);
            }
        }
        Ok(())
    }

    fn relayout(&mut self) -> Result<()> {
        let layout = self.view.layout(self.entities.as_slice(), self.size)?;
        let mut commands = vec![layer(MARKS_LAYER, layout.marks_transform, MARKS_Z)];
        commands.extend(layout.decorations);
        let plan = self.reconciler.plan(&layout.marks, layout.timing);
        commands.extend(plan.commands);
        self.target.apply_all(commands);

        // Entering marks start at their baseline, never from a stale tween.
        for key in &plan.enter {
            self.scheduler.cancel_element(key);
        }
        let now = self.clock.now();
        for tween in &plan.tweens {
            let current = self.target.attr(&tween.key, tween.attr).unwrap_or(tween.to);
            self.scheduler
                .animate(now, TransitionSpec::from_tween(tween), current);
        }
        Ok(())
    }

    fn clear_marks(&mut self) {
        for key in self.reconciler.keys() {
            self.scheduler.cancel_element(key);
        }
        self.reconciler.reset();
        self.entities.clear();
        self.target.apply(SceneCommand::ClearLayer {
            key: Key::from(MARKS_LAYER),
        });
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.layer.reset();
            self.scheduler.cancel_element(&Key::from(TOOLTIP_KEY));
            self.target.apply(SceneCommand::SetAttr {
                key: Key::from(TOOLTIP_KEY),
                attr: Attr::Opacity,
                value: AttrValue::Number(0.0),
            });
        }
    }

    fn set_status(&mut self, status: LoadStatus) {
        let text = match &status {
            LoadStatus::Loading => Some("Loading…".to_string()),
            LoadStatus::Failed(message) => Some(format!("Failed to load data: {message}")),
            LoadStatus::Idle | LoadStatus::Ready => None,
        };
        let layer_key = Key::from(STATUS_LAYER);
        let mut commands = vec![SceneCommand::ClearLayer {
            key: layer_key.clone(),
        }];
        if let Some(text) = text {
            let center = Point::new(self.size.width / 2.0, self.size.height / 2.0);
            commands.push(SceneCommand::Create {
                layer: layer_key,
                element: VisualElement::text(STATUS_KEY, text, center)
                    .font(STATUS_FONT, TextAnchor::Middle)
                    .fill(Color::BLACK)
                    .non_pickable(),
            });
        }
        self.target.apply_all(commands);
        self.status = status;
    }

    fn show_tooltip_change(&mut self, change: TooltipChange) {
        let Some(tooltip) = &self.tooltip else {
            return;
        };
        let state = tooltip.layer.tooltip();
        let key = Key::from(TOOLTIP_KEY);
        let mut commands = Vec::new();
        if matches!(
            change,
            TooltipChange::Shown | TooltipChange::Moved | TooltipChange::Replaced
        ) {
            commands.push(SceneCommand::SetShape {
                key: key.clone(),
                shape: Shape::Text(state.content.clone()),
            });
            commands.push(SceneCommand::SetAttr {
                key: key.clone(),
                attr: Attr::X,
                value: AttrValue::Number(state.anchor.x),
            });
            commands.push(SceneCommand::SetAttr {
                key: key.clone(),
                attr: Attr::Y,
                value: AttrValue::Number(state.anchor.y),
            });
        }
        let fade = match change {
            TooltipChange::Shown => Some((tooltip.config.opacity, tooltip.config.fade_in())),
            TooltipChange::Hidden => Some((0.0, tooltip.config.fade_out())),
            TooltipChange::Unchanged | TooltipChange::Moved | TooltipChange::Replaced => None,
        };
        self.target.apply_all(commands);

        if let Some((opacity, duration)) = fade {
            let current = self
                .target
                .attr(&key, Attr::Opacity)
                .unwrap_or(AttrValue::Number(0.0));
            let spec = TransitionSpec::new(key, Attr::Opacity, opacity).duration(duration);
            self.scheduler.animate(self.clock.now(), spec, current);
        }
    }
}

/// A pending load, detached from its handle so it can run on any executor.
#[derive(Debug)]
#[must_use = "a load ticket does nothing until run"]
pub struct LoadTicket {
    generation: u64,
    sources: Vec<Source>,
    policy: JoinPolicy,
    registration: AbortRegistration,
}

impl LoadTicket {
    /// Fetch and join every source with `fetcher`.
    ///
    /// Resolves to [`ChartError::Aborted`] if the handle started another load,
    /// received data directly or was torn down meanwhile.
    pub async fn run<F: Fetch>(self, fetcher: F) -> LoadResult {
        let Self {
            generation,
            sources,
            policy,
            registration,
        } = self;
        let loader = DataLoader::new(fetcher).with_policy(policy);
        let result = match Abortable::new(loader.load(&sources), registration).await {
            Ok(loaded) => loaded.map_err(ChartError::from),
            Err(_aborted) => Err(ChartError::Aborted),
        };
        LoadResult { generation, result }
    }

    /// Sources this load fetches, primary first.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }
}

/// Outcome of [`LoadTicket::run`], for [`Handle::finish_load`].
#[derive(Debug)]
pub struct LoadResult {
    generation: u64,
    result: Result<Vec<JoinedEntity>>,
}

impl LoadResult {
    /// True if the load was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(&self.result, Err(e) if e.is_aborted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BarChart, BarChartConfig, LineChart};
    use glimmer_data::MemoryFetcher;
    use glimmer_transition::ManualClock;
    use std::time::Duration;

    fn bar_handle(clock: &ManualClock, events: &ListenerRegistry) -> Handle<BarChart> {
        let chart = BarChart::new(BarChartConfig::default()).unwrap();
        Handle::init(
            chart,
            Surface::new(),
            Arc::new(clock.clone()),
            events,
            Size::new(560.0, 300.0),
        )
        .unwrap()
    }

    fn height(surface: &Surface, key: &str) -> f64 {
        surface.element(&Key::from(key)).unwrap().size.height
    }

    #[test]
    fn bars_grow_over_the_transition() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = bar_handle(&clock, &events);
        handle
            .update(BarChart::entities([("a", 10.0), ("b", 20.0)]))
            .unwrap();
        assert_eq!(height(handle.target(), "a"), 0.0);

        clock.advance(Duration::from_millis(500));
        let _ = handle.tick();
        let mid = height(handle.target(), "b");
        assert!(mid > 0.0 && mid < 250.0, "mid-transition height {mid}");

        clock.advance(Duration::from_millis(600));
        let _ = handle.tick();
        assert!((height(handle.target(), "b") - 250.0).abs() < 1e-9);
        assert!(!handle.is_animating());
    }

    #[test]
    fn removed_bars_leave_the_surface() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = bar_handle(&clock, &events);
        handle
            .update(BarChart::entities([("a", 10.0), ("b", 20.0)]))
            .unwrap();
        handle.update(BarChart::entities([("b", 20.0)])).unwrap();
        let _ = handle.tick();
        assert!(handle.target().element(&Key::from("a")).is_none());
        assert!(handle.target().element(&Key::from("b")).is_some());
    }

    #[test]
    fn bar_reentering_after_removal_grows_from_the_baseline() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = bar_handle(&clock, &events);
        handle
            .update(BarChart::entities([("a", 10.0), ("b", 20.0)]))
            .unwrap();
        clock.advance(Duration::from_millis(500));
        let _ = handle.tick();
        assert!(height(handle.target(), "a") > 0.0);

        handle.update(BarChart::entities([("b", 20.0)])).unwrap();
        let _ = handle.tick();
        assert!(handle.target().element(&Key::from("a")).is_none());

        clock.advance(Duration::from_millis(100));
        handle
            .update(BarChart::entities([("a", 10.0), ("b", 20.0)]))
            .unwrap();
        let _ = handle.tick();
        assert_eq!(height(handle.target(), "a"), 0.0);

        clock.advance(Duration::from_millis(1000));
        let _ = handle.tick();
        assert!((height(handle.target(), "a") - 125.0).abs() < 1e-9);
    }

    #[test]
    fn resize_events_are_queued_until_tick() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = bar_handle(&clock, &events);
        events.emit(&HostEvent::Resize(Size::new(300.0, 300.0)));
        assert_eq!(handle.size(), Size::new(560.0, 300.0));
        let _ = handle.tick();
        assert_eq!(handle.size(), Size::new(300.0, 300.0));
    }

    #[test]
    fn teardown_unregisters_and_aborts() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = bar_handle(&clock, &events);
        assert_eq!(events.len(), 1);
        let ticket = handle.begin_load();
        let _surface = handle.teardown();
        assert!(events.is_empty());

        let result = futures::executor::block_on(ticket.run(MemoryFetcher::new()));
        assert!(result.is_aborted());
    }

    #[test]
    fn newer_load_supersedes_older() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = bar_handle(&clock, &events);
        let first = handle.begin_load();
        let second = handle.begin_load();
        let first = futures::executor::block_on(first.run(MemoryFetcher::new()));
        assert!(first.is_aborted());
        assert!(!handle.finish_load(first).unwrap());
        // Bar charts have no sources, so the second load joins to nothing.
        let second = futures::executor::block_on(second.run(MemoryFetcher::new()));
        assert!(handle.finish_load(second).unwrap());
        assert_eq!(handle.status(), &LoadStatus::Ready);
    }

    #[test]
    fn pointer_over_a_dot_fades_the_tooltip_in() {
        let clock = ManualClock::new();
        let events = ListenerRegistry::new();
        let mut handle = Handle::init(
            LineChart::default(),
            Surface::new(),
            Arc::new(clock.clone()),
            &events,
            Size::new(360.0, 190.0),
        )
        .unwrap();
        handle.update(LineChart::entities(&[25.0, 30.0])).unwrap();
        clock.advance(Duration::from_millis(1000));
        let _ = handle.tick();

        // Dot "0" sits at (0, 125) inside a layer translated by (20, 10).
        events.emit(&HostEvent::PointerMove(Point::new(20.0, 135.0)));
        let _ = handle.tick();
        let tooltip = handle.tooltip().unwrap();
        assert!(tooltip.visible);
        assert_eq!(tooltip.content, "Value: 25");

        clock.advance(Duration::from_millis(250));
        let _ = handle.tick();
        let label = handle.target().element(&Key::from(TOOLTIP_KEY)).unwrap();
        assert_eq!(label.opacity, 1.0);
        assert_eq!(label.position, Point::new(20.0, 107.0));

        events.emit(&HostEvent::PointerLeave);
        let _ = handle.tick();
        assert!(!handle.tooltip().unwrap().visible);
    }
}
