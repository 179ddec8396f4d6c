//! World snapshot schema — the engine's read-only input each tick.
//!
//! The engine never performs dynamic lookups against host objects; an
//! adapter populates this schema from whatever the host actually runs.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::EquippedSlot;
use crate::types::{Collider, EntityId, Layer};

/// Complete visible world state for one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Monotonic host time in seconds. Timestamps position samples and
    /// throttles hazard rescans.
    pub time_secs: f64,
    /// Observer is spectating; the engine must stay idle.
    pub spectating: bool,
    /// The entity the engine decides for. `None` while the world is
    /// still loading.
    pub observer: Option<Observer>,
    pub players: Vec<PlayerState>,
    pub obstacles: Vec<ObstacleState>,
    pub hazards: Vec<HazardState>,
    pub camera: Camera,
}

/// The observed entity the engine computes intent for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observer {
    pub id: EntityId,
    pub position: DVec2,
    pub team: u32,
    pub layer: Layer,
    pub equipped_slot: EquippedSlot,
    pub weapon: WeaponProfile,
    /// Cursor position in screen space (centre of the ranged FOV).
    pub cursor_screen: DVec2,
    /// Whether the fire input is currently held.
    pub is_firing: bool,
}

/// Properties of the observer's currently equipped weapon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Shot spread in degrees (0 for perfectly accurate weapons).
    pub spread_deg: f64,
    /// Projectile speed in units/s, if the weapon fires projectiles.
    pub projectile_speed: Option<f64>,
    /// Maximum projectile travel distance in units.
    pub range: Option<f64>,
}

/// A visible player other than the observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: EntityId,
    pub position: DVec2,
    pub team: u32,
    pub layer: Layer,
    pub alive: bool,
    pub downed: bool,
    pub name: String,
    /// Armor levels for the HUD record.
    pub helmet_level: u8,
    pub chest_level: u8,
    pub backpack_level: u8,
}

/// A visible obstacle or interactable object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleState {
    pub id: EntityId,
    /// Type tag used for blocking/loot pattern classification.
    pub kind: String,
    pub position: DVec2,
    pub collider: Option<Collider>,
    /// `None` when the object exists on all layers.
    pub layer: Option<Layer>,
    pub height: f64,
    pub health: Option<f64>,
    pub dead: bool,
    pub collidable: bool,
    pub is_wall: bool,
    pub indestructible: bool,
}

/// An area-effect threat (grenade, gas cloud, charge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardState {
    pub id: EntityId,
    /// Type tag matched against hazard patterns.
    pub kind: String,
    pub position: DVec2,
    pub layer: Option<Layer>,
    /// Explosion radius in units; the engine substitutes a default when
    /// absent.
    pub explosion_radius: Option<f64>,
    pub dead: bool,
}

/// Screen-space projection: `screen = (world - center) * zoom + screen_size / 2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World position at the centre of the screen.
    pub center: DVec2,
    /// Pixels per world unit.
    pub zoom: f64,
    /// Screen dimensions in pixels.
    pub screen_size: DVec2,
}

impl Camera {
    /// Identity projection: world coordinates pass through unchanged.
    pub fn identity() -> Self {
        Self {
            center: DVec2::ZERO,
            zoom: 1.0,
            screen_size: DVec2::ZERO,
        }
    }

    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        (world - self.center) * self.zoom + self.screen_size * 0.5
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::identity()
    }
}
