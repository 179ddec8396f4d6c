//! Fundamental geometric and identity types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Stable identifier for a world entity (player, obstacle, hazard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Vertical partition of the world. Entities generally only interact
/// within the same layer; bypass layers (elevated/transparent structures)
/// are mutually visible with every other layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer(pub u8);

impl Layer {
    /// Whether this layer value is a reserved bypass layer.
    pub fn is_bypass(self) -> bool {
        matches!(self.0, 2 | 3)
    }

    /// Symmetric layer compatibility: equal layers, or either side on a
    /// bypass layer.
    pub fn compatible(self, other: Layer) -> bool {
        self == other || self.is_bypass() || other.is_bypass()
    }
}

/// Collider geometry attached to obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Collider {
    Circle { center: DVec2, radius: f64 },
    Aabb { min: DVec2, max: DVec2 },
}

impl Collider {
    /// Nearest intersection of the segment `a -> b` with this collider,
    /// if any. Returns the hit point closest to `a`.
    pub fn intersect_segment(&self, a: DVec2, b: DVec2) -> Option<DVec2> {
        match *self {
            Collider::Circle { center, radius } => segment_circle(a, b, center, radius),
            Collider::Aabb { min, max } => segment_aabb(a, b, min, max),
        }
    }
}

/// Segment-circle intersection, nearest hit point to `a`.
fn segment_circle(a: DVec2, b: DVec2, center: DVec2, radius: f64) -> Option<DVec2> {
    let d = b - a;
    let f = a - center;
    let aa = d.dot(d);
    if aa < 1e-12 {
        // Degenerate segment: inside-circle test only.
        return (f.length_squared() <= radius * radius).then_some(a);
    }
    let bb = 2.0 * f.dot(d);
    let cc = f.dot(f) - radius * radius;
    let disc = bb * bb - 4.0 * aa * cc;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-bb - sqrt_disc) / (2.0 * aa);
    let t2 = (-bb + sqrt_disc) / (2.0 * aa);
    let t = if (0.0..=1.0).contains(&t1) {
        t1
    } else if (0.0..=1.0).contains(&t2) {
        // Segment starts inside the circle.
        t2
    } else {
        return None;
    };
    Some(a + d * t)
}

/// Segment-AABB intersection via the slab method, nearest hit point to `a`.
fn segment_aabb(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> Option<DVec2> {
    let d = b - a;
    let mut t_min: f64 = 0.0;
    let mut t_max: f64 = 1.0;

    for axis in 0..2 {
        let (start, delta, lo, hi) = if axis == 0 {
            (a.x, d.x, min.x, max.x)
        } else {
            (a.y, d.y, min.y, max.y)
        };
        if delta.abs() < 1e-12 {
            if start < lo || start > hi {
                return None;
            }
        } else {
            let inv = 1.0 / delta;
            let mut t0 = (lo - start) * inv;
            let mut t1 = (hi - start) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
    }
    Some(a + d * t_min)
}

/// Angle of the vector from `from` to `to` in radians.
pub fn angle_towards(from: DVec2, to: DVec2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for a heading angle in radians.
pub fn heading_vector(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}
