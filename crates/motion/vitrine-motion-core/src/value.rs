//! Animatable properties and typed values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inline style property that tweens and snapshots can drive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    Opacity,
    X,
    Y,
    XPercent,
    YPercent,
    Scale,
    RotationX,
    /// Blur radius of a `filter: blur(..)` in px.
    Blur,
    BoxShadow,
    BackgroundColor,
    Color,
    Display,
    PointerEvents,
    Overflow,
    TransformOrigin,
    /// Text content of the element.
    Text,
}

impl Prop {
    /// Value the property has when no inline override is present.
    pub fn rest_value(self) -> Value {
        match self {
            Prop::Opacity | Prop::Scale => Value::Float(1.0),
            Prop::X
            | Prop::Y
            | Prop::XPercent
            | Prop::YPercent
            | Prop::RotationX
            | Prop::Blur => Value::Float(0.0),
            Prop::BoxShadow => Value::Shadow([0.0, 0.0, 0.0]),
            Prop::BackgroundColor | Prop::Color => Value::Color([0.0, 0.0, 0.0, 0.0]),
            Prop::Display
            | Prop::PointerEvents
            | Prop::Overflow
            | Prop::TransformOrigin
            | Prop::Text => Value::Text(String::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Prop::Opacity => "opacity",
            Prop::X => "x",
            Prop::Y => "y",
            Prop::XPercent => "xPercent",
            Prop::YPercent => "yPercent",
            Prop::Scale => "scale",
            Prop::RotationX => "rotationX",
            Prop::Blur => "blur",
            Prop::BoxShadow => "boxShadow",
            Prop::BackgroundColor => "backgroundColor",
            Prop::Color => "color",
            Prop::Display => "display",
            Prop::PointerEvents => "pointerEvents",
            Prop::Overflow => "overflow",
            Prop::TransformOrigin => "transformOrigin",
            Prop::Text => "text",
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Value {
    Float(f32),
    /// RGBA, each channel in [0, 1].
    Color([f32; 4]),
    /// Drop shadow as (offset-y px, blur px, alpha).
    Shadow([f32; 3]),
    /// Step-only value (no blending).
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value blends continuously or switches in one step.
    pub fn is_step(&self) -> bool {
        matches!(self, Value::Text(_))
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f as f32)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Ordered property → value list. Later writes to the same property replace
/// earlier ones in place, so iteration order is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropSet(Vec<(Prop, Value)>);

impl PropSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop: Prop, value: impl Into<Value>) -> Self {
        self.insert(prop, value.into());
        self
    }

    pub fn insert(&mut self, prop: Prop, value: Value) {
        if let Some(slot) = self.0.iter_mut().find(|(p, _)| *p == prop) {
            slot.1 = value;
        } else {
            self.0.push((prop, value));
        }
    }

    pub fn remove(&mut self, prop: Prop) -> Option<Value> {
        let idx = self.0.iter().position(|(p, _)| *p == prop)?;
        Some(self.0.remove(idx).1)
    }

    pub fn contains(&self, prop: Prop) -> bool {
        self.0.iter().any(|(p, _)| *p == prop)
    }

    pub fn get(&self, prop: Prop) -> Option<&Value> {
        self.0.iter().find(|(p, _)| *p == prop).map(|(_, v)| v)
    }

    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        self.0.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Prop, &Value)> {
        self.0.iter().map(|(p, v)| (*p, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(Prop, Value); N]> for PropSet {
    fn from(items: [(Prop, Value); N]) -> Self {
        let mut set = PropSet::new();
        for (p, v) in items {
            set.insert(p, v);
        }
        set
    }
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp_arr<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for i in 0..N {
        out[i] = lerp_f32(a[i], b[i], t);
    }
    out
}

/// Blend between two values at eased progress `t`. Step values and mismatched
/// kinds take `b` as soon as the tween renders.
pub fn blend(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => Value::Float(lerp_f32(*va, *vb, t)),
        (Value::Color(ca), Value::Color(cb)) => Value::Color(lerp_arr(*ca, *cb, t)),
        (Value::Shadow(sa), Value::Shadow(sb)) => Value::Shadow(lerp_arr(*sa, *sb, t)),
        _ => b.clone(),
    }
}
