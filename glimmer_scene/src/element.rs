// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual elements and their animatable attributes.

use bitflags::bitflags;
use glimmer_data::Key;
use glimmer_scale::Color;
use kurbo::{BezPath, Circle, Point, Rect, Shape as _, Size};

bitflags! {
    /// Element flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is drawn.
        const VISIBLE  = 0b0000_0001;
        /// Element takes part in hit testing.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Horizontal anchoring of a text element around its position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Position is the left edge.
    #[default]
    Start,
    /// Position is the horizontal center.
    Middle,
    /// Position is the right edge.
    End,
}

/// Primitive drawn for an element.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle at `position` with `size`.
    Rect,
    /// Circle centered at `position` with `radius`.
    Circle,
    /// Path in element space, offset by `position`.
    Path(BezPath),
    /// Text anchored at `position`; lines are separated by `\n`.
    Text(String),
}

/// Attributes an element exposes for reading, writing and animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attr {
    /// `position.x`.
    X,
    /// `position.y`.
    Y,
    /// `size.width`.
    Width,
    /// `size.height`.
    Height,
    /// Circle radius.
    Radius,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Fill color.
    Fill,
    /// Stroke color.
    Stroke,
}

impl Attr {
    /// Attributes compared when diffing two element states.
    pub const ANIMATED: [Self; 8] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Radius,
        Self::Opacity,
        Self::Fill,
        Self::Stroke,
    ];

    /// Lowercase name, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Radius => "radius",
            Self::Opacity => "opacity",
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }
}

/// Value of an [`Attr`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Numeric attribute.
    Number(f64),
    /// Color attribute.
    Color(Color),
}

impl AttrValue {
    /// Numeric value, if this is a number.
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Color(_) => None,
        }
    }

    /// Color value, if this is a color.
    pub fn as_color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            Self::Number(_) => None,
        }
    }

    /// Interpolate towards `to`. Mismatched kinds jump to `to` at `t >= 1`.
    #[must_use]
    pub fn lerp(self, to: Self, t: f64) -> Self {
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Self::Number(a + (b - a) * t),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(b, t)),
            (from, to) => {
                if t >= 1.0 {
                    to
                } else {
                    from
                }
            }
        }
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// The rendered counterpart of an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualElement {
    /// Identity, shared with the entity it draws.
    pub key: Key,
    /// Primitive.
    pub shape: Shape,
    /// Anchor point; meaning depends on [`Shape`].
    pub position: Point,
    /// Rectangle size. Negative sizes are normalized for drawing.
    pub size: Size,
    /// Circle radius.
    pub radius: f64,
    /// Fill color; transparent means no fill.
    pub fill: Color,
    /// Stroke color; transparent means no stroke.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Text size in pixels.
    pub font_size: f64,
    /// Text alignment.
    pub anchor: TextAnchor,
    /// Visibility and picking.
    pub flags: ElementFlags,
}

impl VisualElement {
    fn with_shape(key: impl Into<Key>, shape: Shape) -> Self {
        Self {
            key: key.into(),
            shape,
            position: Point::ZERO,
            size: Size::ZERO,
            radius: 0.0,
            fill: Color::BLACK,
            stroke: Color::TRANSPARENT,
            stroke_width: 1.0,
            opacity: 1.0,
            font_size: 10.0,
            anchor: TextAnchor::Start,
            flags: ElementFlags::default(),
        }
    }

    /// Rectangle covering `rect`.
    pub fn rect(key: impl Into<Key>, rect: Rect) -> Self {
        let mut e = Self::with_shape(key, Shape::Rect);
        e.position = rect.origin();
        e.size = rect.size();
        e
    }

    /// Circle at `center`.
    pub fn circle(key: impl Into<Key>, center: Point, radius: f64) -> Self {
        let mut e = Self::with_shape(key, Shape::Circle);
        e.position = center;
        e.radius = radius;
        e
    }

    /// Path, stroked black and unfilled.
    pub fn path(key: impl Into<Key>, path: BezPath) -> Self {
        let mut e = Self::with_shape(key, Shape::Path(path));
        e.fill = Color::TRANSPARENT;
        e.stroke = Color::BLACK;
        e
    }

    /// Non-pickable text label.
    pub fn text(key: impl Into<Key>, text: impl Into<String>, at: Point) -> Self {
        let mut e = Self::with_shape(key, Shape::Text(text.into()));
        e.position = at;
        e.flags = ElementFlags::VISIBLE;
        e
    }

    /// Set the fill.
    #[must_use]
    pub fn fill(mut self, color: Color) -> Self {
        self.fill = color;
        self
    }

    /// Set the stroke color and width.
    #[must_use]
    pub fn stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = color;
        self.stroke_width = width;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set text size and anchor.
    #[must_use]
    pub fn font(mut self, size: f64, anchor: TextAnchor) -> Self {
        self.font_size = size;
        self.anchor = anchor;
        self
    }

    /// Exclude from hit testing.
    #[must_use]
    pub fn non_pickable(mut self) -> Self {
        self.flags.remove(ElementFlags::PICKABLE);
        self
    }

    /// Read an attribute.
    pub fn get(&self, attr: Attr) -> AttrValue {
        match attr {
            Attr::X => self.position.x.into(),
            Attr::Y => self.position.y.into(),
            Attr::Width => self.size.width.into(),
            Attr::Height => self.size.height.into(),
            Attr::Radius => self.radius.into(),
            Attr::Opacity => self.opacity.into(),
            Attr::Fill => self.fill.into(),
            Attr::Stroke => self.stroke.into(),
        }
    }

    /// Write an attribute. Values of the wrong kind are ignored and `false` is returned.
    pub fn set(&mut self, attr: Attr, value: AttrValue) -> bool {
        match (attr, value) {
            (Attr::X, AttrValue::Number(n)) => self.position.x = n,
            (Attr::Y, AttrValue::Number(n)) => self.position.y = n,
            (Attr::Width, AttrValue::Number(n)) => self.size.width = n,
            (Attr::Height, AttrValue::Number(n)) => self.size.height = n,
            (Attr::Radius, AttrValue::Number(n)) => self.radius = n,
            (Attr::Opacity, AttrValue::Number(n)) => self.opacity = n,
            (Attr::Fill, AttrValue::Color(c)) => self.fill = c,
            (Attr::Stroke, AttrValue::Color(c)) => self.stroke = c,
            _ => return false,
        }
        true
    }

    /// Animated attributes whose value differs in `other`, with `other`'s value.
    pub fn diff(&self, other: &Self) -> Vec<(Attr, AttrValue)> {
        Attr::ANIMATED
            .into_iter()
            .filter_map(|a| {
                let theirs = other.get(a);
                (self.get(a) != theirs).then_some((a, theirs))
            })
            .collect()
    }

    /// Element-space bounds, before any layer transform.
    pub fn bounds(&self) -> Rect {
        match &self.shape {
            Shape::Rect => Rect::from_origin_size(self.position, self.size).abs(),
            Shape::Circle => Circle::new(self.position, self.radius.abs()).bounding_box(),
            Shape::Path(p) => p.bounding_box() + self.position.to_vec2(),
            Shape::Text(t) => {
                let lines = t.lines().count().max(1);
                let longest = t.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "Label lengths are far below 2^52."
                )]
                let (w, h) = (
                    longest as f64 * self.font_size * 0.6,
                    lines as f64 * self.font_size * 1.2,
                );
                let x0 = match self.anchor {
                    TextAnchor::Start => self.position.x,
                    TextAnchor::Middle => self.position.x - w * 0.5,
                    TextAnchor::End => self.position.x - w,
                };
                Rect::new(x0, self.position.y - self.font_size, x0 + w, self.position.y - self.font_size + h)
            }
        }
    }

    /// Precise containment of an element-space point.
    pub fn contains(&self, pt: Point) -> bool {
        match &self.shape {
            Shape::Rect | Shape::Text(_) => self.bounds().contains(pt),
            Shape::Circle => (pt - self.position).hypot2() <= self.radius * self.radius,
            Shape::Path(p) => p.winding(pt - self.position.to_vec2()) != 0,
        }
    }
}
