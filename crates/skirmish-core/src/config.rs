//! Engine configuration.
//!
//! Flag changes take effect at the next tick boundary, never mid-tick.

use serde::{Deserialize, Serialize};

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RNG seed for determinism (zero-distance hazard flee direction).
    pub seed: u64,
    pub ranged: RangedConfig,
    pub melee: MeleeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ranged: RangedConfig::default(),
            melee: MeleeConfig::default(),
        }
    }
}

/// Ranged targeting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangedConfig {
    pub enabled: bool,
    /// Screen-space field-of-view radius around the cursor (pixels).
    pub fov_radius: f64,
    /// Consider downed players as targets.
    pub target_downed: bool,
    /// Consider teammates as targets.
    pub target_allies: bool,
    /// Lead confidence in [0, 1]: 0 aims at the current position, 1 at
    /// the full intercept solution.
    pub prediction_strength: f64,
    /// Whether the aim indicator requires a clear line of effect. The
    /// fire gate always does, regardless of this setting.
    pub respect_obstacles: bool,
    /// Engage without the fire input held and extend the melee
    /// auto-equip envelope.
    pub aggressive: bool,
    /// Engage automatically whenever a target is held.
    pub automatic: bool,
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fov_radius: 150.0,
            target_downed: false,
            target_allies: false,
            prediction_strength: 1.0,
            respect_obstacles: true,
            aggressive: false,
            automatic: true,
        }
    }
}

/// Melee engagement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeleeConfig {
    pub enabled: bool,
    /// Attack teammates with melee.
    pub attack_allies: bool,
    /// Queue a weapon swap when a lock target enters range.
    pub auto_equip: bool,
    /// Queue fire inputs while locked and inside engage distance.
    pub auto_attack: bool,
    /// Evade area-effect hazards.
    pub hazard_evasion: bool,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            attack_allies: false,
            auto_equip: true,
            auto_attack: true,
            hazard_evasion: true,
        }
    }
}

impl EngineConfig {
    /// Whether any decision feature is enabled at all.
    pub fn any_enabled(&self) -> bool {
        self.ranged.enabled || self.melee.enabled
    }
}
