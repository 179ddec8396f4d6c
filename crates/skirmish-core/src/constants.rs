//! Engine tuning constants.

// --- History tracking ---

/// Ring buffer capacity for ranged prediction histories.
pub const RANGED_HISTORY_CAPACITY: usize = 20;

/// Minimum samples before a ranged velocity estimate is available.
pub const RANGED_MIN_SAMPLES: usize = 3;

/// Ring buffer capacity for melee prediction histories.
pub const MELEE_HISTORY_CAPACITY: usize = 30;

/// Minimum samples before a melee velocity estimate is available.
pub const MELEE_MIN_SAMPLES: usize = 5;

/// Exponential smoothing factor for melee velocity (weight on the
/// previous smoothed value).
pub const MELEE_VELOCITY_SMOOTHING: f64 = 0.7;

/// Maximum plausible target speed (units/s). Faster apparent motion is
/// treated as sensor noise or a teleport and rescaled down.
pub const MAX_TARGET_SPEED: f64 = 2000.0;

/// Time deltas below this are too small for a finite difference (seconds).
pub const MIN_SAMPLE_INTERVAL: f64 = 0.001;

/// Tracks unobserved for this long are evicted (seconds).
pub const HISTORY_MAX_AGE: f64 = 5.0;

// --- Visibility ---

/// Minimum projectile height; obstacles shorter than this are overflown.
pub const PROJECTILE_HEIGHT: f64 = 0.25;

/// Approximate player collision radius; hits within this of the target
/// do not count as blocking.
pub const TARGET_COLLISION_RADIUS: f64 = 0.75;

/// Spread widening factor for the visibility ray fan.
pub const SPREAD_FAN_FACTOR: f64 = 1.5;

/// Bounds on the visibility ray count.
pub const MIN_RAY_COUNT: usize = 1;
pub const MAX_RAY_COUNT: usize = 30;

/// Ray count for zero-spread weapons before the distance term.
pub const ZERO_SPREAD_RAY_COUNT: usize = 15;

/// One additional ray per this many units of target distance.
pub const RAY_DISTANCE_STEP: f64 = 50.0;

/// Fraction of unblocked rays for immediate acceptance.
pub const VISIBILITY_FAST_ACCEPT: f64 = 0.4;

/// Minimum fraction of unblocked rays to still accept.
pub const VISIBILITY_MIN_ACCEPT: f64 = 0.3;

/// Obstacles above this health are assumed load-bearing and blocking
/// when no other classification applies.
pub const BLOCKING_HEALTH_THRESHOLD: f64 = 200.0;

// --- Target acquisition ---

/// Screen-distance decay constant for ranged target scoring (pixels).
pub const RANGED_SCORE_DECAY: f64 = 120.0;

/// Score bonus for keeping the previously selected target.
pub const TARGET_CONTINUITY_BONUS: f64 = 0.02;

/// World distance under which loot candidates get a score boost.
pub const LOOT_NEAR_DISTANCE: f64 = 100.0;

/// Score boost for loot candidates inside `LOOT_NEAR_DISTANCE`.
pub const LOOT_NEAR_BONUS: f64 = 50.0;

// --- Melee engagement ---

/// Base melee engage distance (units).
pub const MELEE_ENGAGE_DISTANCE: f64 = 5.5;

/// Extended detection range for melee target search (units).
pub const MELEE_DETECTION_DISTANCE: f64 = 7.5;

/// Hysteresis margin preventing rapid lock/unlock at the boundary.
pub const MELEE_LOCK_HYSTERESIS: f64 = 1.0;

/// Base melee prediction lookahead (seconds).
pub const MELEE_PREDICTION_LOOKAHEAD: f64 = 0.2;

/// Target speed at which the adaptive lookahead saturates (units/s).
pub const MELEE_LOOKAHEAD_SPEED_SCALE: f64 = 500.0;

/// Target speed above which the movement angle leads the target.
pub const MELEE_LEAD_SPEED_THRESHOLD: f64 = 150.0;

/// Upper bound on the directional lead blend factor.
pub const MELEE_LEAD_MAX_FACTOR: f64 = 0.15;

/// Adaptive engage bonus saturates at speed / this (capped below).
pub const MELEE_ADAPTIVE_SPEED_SCALE: f64 = 1000.0;

/// Maximum adaptive engage distance bonus (units).
pub const MELEE_ADAPTIVE_MAX_BONUS: f64 = 0.5;

/// Aggressive-mode multiplier on the auto-equip envelope.
pub const AGGRESSIVE_MELEE_RANGE_FACTOR: f64 = 1.5;

/// Ranged aiming also engages inside this distance when only melee is
/// enabled (units).
pub const MELEE_RANGED_ASSIST_DISTANCE: f64 = 8.0;

// --- Hazard avoidance ---

/// Default explosion radius when the snapshot carries none (units).
pub const HAZARD_BASE_RADIUS: f64 = 8.0;

/// Safety margin added to the explosion radius to form the danger zone.
pub const HAZARD_SAFETY_MARGIN: f64 = 20.0;

/// Fraction of the explosion radius forming the critical zone, inside
/// which melee pursuit is overridden.
pub const HAZARD_CRITICAL_FACTOR: f64 = 0.8;

/// Maximum distance at which hazards are considered at all (units).
pub const HAZARD_SCAN_RANGE: f64 = 45.0;

/// Minimum interval between full hazard scans (seconds).
pub const HAZARD_SCAN_INTERVAL: f64 = 0.05;

/// Substitute weight for a hazard at effectively zero distance.
pub const HAZARD_ZERO_DISTANCE_WEIGHT: f64 = 10.0;

/// Distances below this hit the zero-distance singularity guard.
pub const HAZARD_ZERO_DISTANCE_EPSILON: f64 = 0.1;

/// Evasion headings with resultant magnitude below this are discarded.
pub const HAZARD_MIN_RESULTANT: f64 = 0.1;
