// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained primitive tree implementing [`RenderTarget`].

use std::collections::HashMap;
use std::fmt::Write as _;

use glimmer_data::Key;
use kurbo::{Affine, Point, Rect, Size};
use tracing::debug;

use crate::element::{Attr, AttrValue, ElementFlags, Shape, TextAnchor, VisualElement};
use crate::grid::Grid;
use crate::target::{Damage, RenderTarget, SceneCommand};

/// Edge length of a spatial index cell in surface units.
const GRID_CELL: f64 = 64.0;

/// Identifier for a node in the surface (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct NodeId(u32, u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Per-node dirty state.
#[derive(Clone, Copy, Debug, Default)]
struct Dirty {
    geometry: bool,
    paint: bool,
}

#[derive(Clone, Debug)]
enum Content {
    Layer {
        transform: Affine,
        z: i32,
        children: Vec<NodeId>,
    },
    Element {
        layer: NodeId,
        element: VisualElement,
    },
}

#[derive(Clone, Debug)]
struct Node {
    key: Key,
    seq: u64,
    content: Content,
    world_transform: Affine,
    world_bounds: Rect,
    dirty: Dirty,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A retained drawing surface: layers of keyed primitives.
///
/// Layers are top-level groups with a transform and z-order; elements live in
/// exactly one layer. [`Surface::commit`](RenderTarget::commit) recomputes
/// surface-space bounds of dirty elements, synchronizes the spatial grid and
/// returns coarse damage. Hit testing uses the grid to gather candidates and
/// then tests precise containment in element space.
pub struct Surface {
    nodes: Vec<Slot>,
    free_list: Vec<usize>,
    by_key: HashMap<Key, NodeId>,
    index: Grid,
    removed: Vec<Rect>,
    next_seq: u64,
    epoch: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|s| s.node.is_some()).count();
        f.debug_struct("Surface")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("epoch", &self.epoch)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            by_key: HashMap::new(),
            index: Grid::new(GRID_CELL),
            removed: Vec::new(),
            next_seq: 0,
            epoch: 0,
        }
    }

    /// Element by key.
    pub fn element(&self, key: &Key) -> Option<&VisualElement> {
        match &self.node_by_key(key)?.content {
            Content::Element { element, .. } => Some(element),
            Content::Layer { .. } => None,
        }
    }

    /// Elements of a layer in draw order. Empty for unknown layers.
    pub fn layer_elements(&self, layer: &Key) -> Vec<&VisualElement> {
        let Some(Content::Layer { children, .. }) = self.node_by_key(layer).map(|n| &n.content)
        else {
            return Vec::new();
        };
        children
            .iter()
            .filter_map(|id| self.node(*id))
            .filter_map(|n| match &n.content {
                Content::Element { element, .. } => Some(element),
                Content::Layer { .. } => None,
            })
            .collect()
    }

    /// Number of live elements across all layers.
    pub fn element_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|s| s.node.as_ref())
            .filter(|n| matches!(n.content, Content::Element { .. }))
            .count()
    }

    /// Surface-space bounds of an element as of the last commit.
    pub fn world_bounds(&self, key: &Key) -> Option<Rect> {
        self.node_by_key(key).map(|n| n.world_bounds)
    }

    /// Serialize visible layers and elements as an SVG document.
    pub fn to_svg(&self, size: Size) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(size.width),
            h = num(size.height)
        );
        for layer in self.layers_in_order() {
            let Content::Layer {
                transform,
                children,
                ..
            } = &layer.content
            else {
                continue;
            };
            let c = transform.as_coeffs();
            let _ = write!(
                out,
                r#"<g data-key="{}" transform="matrix({} {} {} {} {} {})">"#,
                escape(layer.key.as_str()),
                num(c[0]),
                num(c[1]),
                num(c[2]),
                num(c[3]),
                num(c[4]),
                num(c[5])
            );
            for child in children {
                if let Some(Content::Element { element, .. }) = self.node(*child).map(|n| &n.content)
                {
                    write_element(&mut out, element);
                }
            }
            out.push_str("</g>");
        }
        out.push_str("</svg>");
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.nodes.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.nodes.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    fn node_by_key(&self, key: &Key) -> Option<&Node> {
        self.node(*self.by_key.get(key)?)
    }

    fn layers_in_order(&self) -> Vec<&Node> {
        let mut layers: Vec<&Node> = self
            .nodes
            .iter()
            .filter_map(|s| s.node.as_ref())
            .filter(|n| matches!(n.content, Content::Layer { .. }))
            .collect();
        layers.sort_by_key(|n| (layer_z(n), n.seq));
        layers
    }

    fn alloc(&mut self, key: Key, content: Content) -> NodeId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = self.free_list.pop().unwrap_or_else(|| {
            self.nodes.push(Slot::default());
            self.nodes.len() - 1
        });
        let slot = &mut self.nodes[idx];
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;
        slot.node = Some(Node {
            key: key.clone(),
            seq,
            content,
            world_transform: Affine::IDENTITY,
            world_bounds: Rect::ZERO,
            dirty: Dirty {
                geometry: true,
                paint: true,
            },
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId(idx as u32, generation);
        self.by_key.insert(key, id);
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.node(id).cloned() else {
            return;
        };
        match node.content {
            Content::Layer { children, .. } => {
                for child in children {
                    self.remove_node(child);
                }
            }
            Content::Element { layer, .. } => {
                if let Some(Node {
                    content: Content::Layer { children, .. },
                    ..
                }) = self.node_mut(layer)
                {
                    children.retain(|c| *c != id);
                }
                if node.world_bounds.area() > 0.0 {
                    self.removed.push(node.world_bounds);
                }
                self.index.remove(id.idx());
            }
        }
        if self.by_key.get(&node.key) == Some(&id) {
            self.by_key.remove(&node.key);
        }
        // Free slot; the generation stays so stale ids no longer resolve.
        self.nodes[id.idx()].node = None;
        self.free_list.push(id.idx());
    }

    fn ensure_layer(&mut self, key: Key, transform: Affine, z: i32) {
        if let Some(id) = self.by_key.get(&key).copied() {
            if let Some(node) = self.node_mut(id) {
                if let Content::Layer {
                    transform: t,
                    z: old_z,
                    children,
                } = &mut node.content
                {
                    let moved = *t != transform;
                    *t = transform;
                    *old_z = z;
                    let children = children.clone();
                    self.mark_all(&children, moved);
                    return;
                }
            }
            debug!(%key, "layer key is in use by an element; ignored");
            return;
        }
        self.alloc(
            key,
            Content::Layer {
                transform,
                z,
                children: Vec::new(),
            },
        );
    }

    fn mark_all(&mut self, ids: &[NodeId], geometry: bool) {
        for id in ids {
            if let Some(n) = self.node_mut(*id) {
                n.dirty.geometry |= geometry;
                n.dirty.paint = true;
            }
        }
    }

    fn create(&mut self, layer: &Key, element: VisualElement) {
        let Some(layer_id) = self.by_key.get(layer).copied() else {
            debug!(%layer, key = %element.key, "create in unknown layer; ignored");
            return;
        };
        if !matches!(
            self.node(layer_id).map(|n| &n.content),
            Some(Content::Layer { .. })
        ) {
            debug!(%layer, "create target is not a layer; ignored");
            return;
        }
        if let Some(existing) = self.by_key.get(&element.key).copied() {
            if let Some(node) = self.node_mut(existing) {
                if let Content::Element {
                    layer: owner,
                    element: current,
                } = &mut node.content
                {
                    if *owner == layer_id {
                        *current = element;
                        node.dirty.geometry = true;
                        node.dirty.paint = true;
                        return;
                    }
                }
            }
            self.remove_node(existing);
        }
        let key = element.key.clone();
        let id = self.alloc(
            key,
            Content::Element {
                layer: layer_id,
                element,
            },
        );
        if let Some(Node {
            content: Content::Layer { children, .. },
            ..
        }) = self.node_mut(layer_id)
        {
            children.push(id);
        }
    }

    fn element_mut(&mut self, key: &Key) -> Option<(&mut VisualElement, &mut Dirty)> {
        let id = *self.by_key.get(key)?;
        let node = self.node_mut(id)?;
        match &mut node.content {
            Content::Element { element, .. } => Some((element, &mut node.dirty)),
            Content::Layer { .. } => None,
        }
    }

    fn update_world(&mut self, id: NodeId, damage: &mut Damage) {
        let Some(node) = self.node(id) else {
            return;
        };
        let Content::Element { layer, element } = &node.content else {
            return;
        };
        let dirty = node.dirty;
        if !dirty.geometry && !dirty.paint {
            return;
        }
        let layer_tf = match self.node(*layer).map(|n| &n.content) {
            Some(Content::Layer { transform, .. }) => *transform,
            _ => Affine::IDENTITY,
        };
        let old = node.world_bounds;
        let mut local = element.bounds();
        if element.stroke.a > 0 && !matches!(element.shape, Shape::Text(_)) {
            local = local.inflate(element.stroke_width * 0.5, element.stroke_width * 0.5);
        }
        let new = transform_rect_bbox(layer_tf, local);
        let visible = element.flags.contains(ElementFlags::VISIBLE);

        if let Some(n) = self.node_mut(id) {
            n.world_transform = layer_tf;
            n.world_bounds = new;
            n.dirty = Dirty::default();
        }
        if dirty.geometry {
            if visible {
                self.index.set(id.idx(), new);
            } else {
                self.index.remove(id.idx());
            }
        }

        if old != new {
            if old.area() > 0.0 {
                damage.dirty_rects.push(old);
            }
            if new.area() > 0.0 {
                damage.dirty_rects.push(new);
            }
        } else if dirty.paint && new.area() > 0.0 {
            damage.dirty_rects.push(new);
        }
    }
}

impl RenderTarget for Surface {
    fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::Layer { key, transform, z } => self.ensure_layer(key, transform, z),
            SceneCommand::ClearLayer { key } => {
                let children = match self.node_by_key(&key).map(|n| &n.content) {
                    Some(Content::Layer { children, .. }) => children.clone(),
                    _ => return,
                };
                for child in children {
                    self.remove_node(child);
                }
            }
            SceneCommand::Create { layer, element } => self.create(&layer, element),
            SceneCommand::SetAttr { key, attr, value } => {
                let Some((element, dirty)) = self.element_mut(&key) else {
                    debug!(%key, attr = attr.name(), "set on unknown element; ignored");
                    return;
                };
                if element.set(attr, value) {
                    match attr {
                        Attr::X | Attr::Y | Attr::Width | Attr::Height | Attr::Radius => {
                            dirty.geometry = true;
                        }
                        Attr::Opacity | Attr::Fill | Attr::Stroke => dirty.paint = true,
                    }
                }
            }
            SceneCommand::SetShape { key, shape } => {
                if let Some((element, dirty)) = self.element_mut(&key) {
                    element.shape = shape;
                    dirty.geometry = true;
                }
            }
            SceneCommand::Remove { key } => {
                if let Some(id) = self.by_key.get(&key).copied() {
                    self.remove_node(id);
                }
            }
        }
    }

    fn attr(&self, key: &Key, attr: Attr) -> Option<AttrValue> {
        self.element(key).map(|e| e.get(attr))
    }

    fn contains(&self, key: &Key) -> bool {
        self.node_by_key(key).is_some()
    }

    fn hit_test(&self, point: Point) -> Option<Vec<Key>> {
        let mut best: Option<((i32, u64, u64), &Node, &Node)> = None;
        for slot in self.index.query_point(point) {
            let Some(node) = self.nodes.get(slot).and_then(|s| s.node.as_ref()) else {
                continue;
            };
            let Content::Element { layer, element } = &node.content else {
                continue;
            };
            if !element
                .flags
                .contains(ElementFlags::VISIBLE | ElementFlags::PICKABLE)
            {
                continue;
            }
            let Some(layer_node) = self.node(*layer) else {
                continue;
            };
            let local = node.world_transform.inverse() * point;
            if !element.contains(local) {
                continue;
            }
            let rank = (layer_z(layer_node), layer_node.seq, node.seq);
            // Ties go to the later element, as in draw order.
            if best.as_ref().is_none_or(|(r, _, _)| rank >= *r) {
                best = Some((rank, layer_node, node));
            }
        }
        best.map(|(_, layer, node)| vec![layer.key.clone(), node.key.clone()])
    }

    fn commit(&mut self) -> Damage {
        self.epoch = self.epoch.wrapping_add(1);
        let mut damage = Damage {
            dirty_rects: std::mem::take(&mut self.removed),
        };
        let ids: Vec<NodeId> = self
            .by_key
            .values()
            .copied()
            .filter(|id| {
                self.node(*id)
                    .is_some_and(|n| matches!(n.content, Content::Element { .. }))
            })
            .collect();
        for id in ids {
            self.update_world(id, &mut damage);
        }
        if self.by_key.is_empty() {
            self.index.clear();
        }
        damage
    }
}

fn layer_z(node: &Node) -> i32 {
    match node.content {
        Content::Layer { z, .. } => z,
        Content::Element { .. } => 0,
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box in surface space.
fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let p0 = affine * Point::new(rect.x0, rect.y0);
    let p1 = affine * Point::new(rect.x1, rect.y0);
    let p2 = affine * Point::new(rect.x0, rect.y1);
    let p3 = affine * Point::new(rect.x1, rect.y1);
    let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
    let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
    let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
    let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}

fn write_element(out: &mut String, e: &VisualElement) {
    if !e.flags.contains(ElementFlags::VISIBLE) {
        return;
    }
    let key = escape(e.key.as_str());
    let paint = paint_attrs(e);
    let _ = match &e.shape {
        Shape::Rect => {
            let r = e.bounds();
            write!(
                out,
                r#"<rect data-key="{key}" x="{}" y="{}" width="{}" height="{}"{paint}/>"#,
                num(r.x0),
                num(r.y0),
                num(r.width()),
                num(r.height())
            )
        }
        Shape::Circle => write!(
            out,
            r#"<circle data-key="{key}" cx="{}" cy="{}" r="{}"{paint}/>"#,
            num(e.position.x),
            num(e.position.y),
            num(e.radius)
        ),
        Shape::Path(p) => {
            let offset = if e.position == Point::ZERO {
                String::new()
            } else {
                format!(
                    r#" transform="translate({} {})""#,
                    num(e.position.x),
                    num(e.position.y)
                )
            };
            write!(
                out,
                r#"<path data-key="{key}" d="{}"{offset}{paint}/>"#,
                p.to_svg()
            )
        }
        Shape::Text(text) => {
            let anchor = match e.anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(
                out,
                r#"<text data-key="{key}" x="{}" y="{}" font-size="{}" text-anchor="{anchor}"{paint}>"#,
                num(e.position.x),
                num(e.position.y),
                num(e.font_size)
            );
            for (i, line) in text.lines().enumerate() {
                if i == 0 {
                    out.push_str(&escape(line));
                } else {
                    let _ = write!(
                        out,
                        r#"<tspan x="{}" dy="1.2em">{}</tspan>"#,
                        num(e.position.x),
                        escape(line)
                    );
                }
            }
            out.push_str("</text>");
            Ok(())
        }
    };
}

fn paint_attrs(e: &VisualElement) -> String {
    let mut s = String::new();
    if e.fill.a == 0 {
        s.push_str(r#" fill="none""#);
    } else {
        let _ = write!(s, r#" fill="{}""#, e.fill.to_hex());
    }
    if e.stroke.a > 0 {
        let _ = write!(
            s,
            r#" stroke="{}" stroke-width="{}""#,
            e.stroke.to_hex(),
            num(e.stroke_width)
        );
    }
    if e.opacity < 1.0 {
        let _ = write!(s, r#" opacity="{}""#, num(e.opacity));
    }
    s
}

fn num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{r}")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
