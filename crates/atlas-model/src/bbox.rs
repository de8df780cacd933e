//! Spatial envelopes: the double-precision working type and the compact
//! single-precision form stored on tree nodes and buckets.
//!
//! `BoundingBox32` exists for the per-node memory budget: four `f32`s instead
//! of four `f64`s, at tens of millions of nodes. Construction rounds outward
//! so the stored box always contains the source envelope; spatial pruning may
//! report a false "maybe intersects" but never a false "no intersection".

use serde::{Deserialize, Serialize};

/// Double-precision axis-aligned envelope used at API boundaries.
///
/// Empty iff `minx > maxx`; there is no separate flag field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    minx: f64,
    maxx: f64,
    miny: f64,
    maxy: f64,
}

impl Envelope {
    /// Create an envelope from explicit bounds.
    pub fn new(minx: f64, maxx: f64, miny: f64, maxy: f64) -> Self {
        Self {
            minx,
            maxx,
            miny,
            maxy,
        }
    }

    /// The empty envelope.
    pub const fn empty() -> Self {
        Self {
            minx: 0.0,
            maxx: -1.0,
            miny: 0.0,
            maxy: -1.0,
        }
    }

    /// Returns `true` if this envelope covers no area.
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx
    }

    pub fn minx(&self) -> f64 {
        self.minx
    }

    pub fn maxx(&self) -> f64 {
        self.maxx
    }

    pub fn miny(&self) -> f64 {
        self.miny
    }

    pub fn maxy(&self) -> f64 {
        self.maxy
    }

    /// Grow this envelope to include the point `(x, y)`.
    pub fn expand_to_point(&mut self, x: f64, y: f64) {
        if self.is_empty() {
            *self = Self::new(x, x, y, y);
            return;
        }
        self.minx = self.minx.min(x);
        self.maxx = self.maxx.max(x);
        self.miny = self.miny.min(y);
        self.maxy = self.maxy.max(y);
    }

    /// Grow this envelope to include `other`. No-op when `other` is empty.
    pub fn expand_to_include(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }
        self.minx = self.minx.min(other.minx);
        self.maxx = self.maxx.max(other.maxx);
        self.miny = self.miny.min(other.miny);
        self.maxy = self.maxy.max(other.maxy);
    }

    /// Returns `true` if the two envelopes share at least one point.
    /// Empty envelopes intersect nothing.
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.minx <= other.maxx
            && self.maxx >= other.minx
            && self.miny <= other.maxy
            && self.maxy >= other.miny
    }

    /// Returns `true` if `other` lies entirely within this envelope.
    pub fn contains(&self, other: &Envelope) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.minx <= other.minx
            && self.maxx >= other.maxx
            && self.miny <= other.miny
            && self.maxy >= other.maxy
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

/// Single-precision envelope guaranteed to contain its source envelope.
///
/// Empty iff `xmin > xmax`. Two empty boxes compare equal regardless of
/// their stored fields.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BoundingBox32 {
    xmin: f32,
    xmax: f32,
    ymin: f32,
    ymax: f32,
}

impl BoundingBox32 {
    /// The empty box, used for "bounds absent".
    pub const EMPTY: BoundingBox32 = BoundingBox32 {
        xmin: 0.0,
        xmax: -1.0,
        ymin: 0.0,
        ymax: -1.0,
    };

    /// Build a float box from a double-precision envelope.
    ///
    /// Minimums round toward negative infinity and maximums toward positive
    /// infinity whenever the `f32` cast is inexact, so the box is never
    /// smaller than the source.
    pub fn from_envelope(env: &Envelope) -> Self {
        if env.is_empty() {
            return Self::EMPTY;
        }
        Self {
            xmin: round_down(env.minx()),
            xmax: round_up(env.maxx()),
            ymin: round_down(env.miny()),
            ymax: round_up(env.maxy()),
        }
    }

    /// Returns `true` if this box covers no area.
    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax
    }

    /// Returns `true` if this box and the envelope share at least one point.
    /// False when either side is empty. Compared field by field in `f64`,
    /// without materializing an intermediate envelope.
    pub fn intersects(&self, env: &Envelope) -> bool {
        if self.is_empty() || env.is_empty() {
            return false;
        }
        env.minx() <= f64::from(self.xmax)
            && env.maxx() >= f64::from(self.xmin)
            && env.miny() <= f64::from(self.ymax)
            && env.maxy() >= f64::from(self.ymin)
    }

    /// Grow `env` to cover this box. No-op when this box is empty.
    ///
    /// Goes through [`BoundingBox32::as_envelope`] so the expanded envelope
    /// carries the float-quantized bounds and later comparisons agree with
    /// what was stored.
    pub fn expand(&self, env: &mut Envelope) {
        if self.is_empty() {
            return;
        }
        env.expand_to_include(&self.as_envelope());
    }

    /// The float-safe envelope covered by this box.
    pub fn as_envelope(&self) -> Envelope {
        if self.is_empty() {
            return Envelope::empty();
        }
        Envelope::new(
            f64::from(self.xmin),
            f64::from(self.xmax),
            f64::from(self.ymin),
            f64::from(self.ymax),
        )
    }
}

impl PartialEq for BoundingBox32 {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        self.xmin == other.xmin
            && self.xmax == other.xmax
            && self.ymin == other.ymin
            && self.ymax == other.ymax
    }
}

impl Default for BoundingBox32 {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Largest `f32` not greater than `v`.
fn round_down(v: f64) -> f32 {
    let cast = v as f32;
    if f64::from(cast) > v {
        next_down(cast)
    } else {
        cast
    }
}

/// Smallest `f32` not less than `v`.
fn round_up(v: f64) -> f32 {
    let cast = v as f32;
    if f64::from(cast) < v {
        next_up(cast)
    } else {
        cast
    }
}

// Bit-level float successor/predecessor, the `f32::next_up`/`next_down`
// equivalents available on the workspace's minimum toolchain. Only finite
// envelope coordinates reach these in practice.
fn next_up(v: f32) -> f32 {
    if v.is_nan() || v == f32::INFINITY {
        return v;
    }
    if v == 0.0 {
        return f32::from_bits(1);
    }
    let bits = v.to_bits();
    if bits >> 31 == 0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

fn next_down(v: f32) -> f32 {
    -next_up(-v)
}
