//! Trajectory solver — ballistic intercept for ranged fire and
//! short-horizon kinematic extrapolation for melee pursuit.

use glam::DVec2;

use skirmish_core::constants::*;

use super::history::MeleeEstimate;

/// Solve the closing-distance quadratic for the intercept time of a
/// projectile fired now at constant speed toward a linearly moving
/// target: `|target + v*t - shooter|^2 = (speed * t)^2`.
///
/// Returns the smallest positive real root, or `None` when the target
/// outruns the projectile and no intercept exists.
pub fn quadratic_intercept(
    shooter: DVec2,
    target: DVec2,
    target_velocity: DVec2,
    projectile_speed: f64,
) -> Option<f64> {
    if projectile_speed <= 0.0 {
        return None;
    }
    let d = target - shooter;
    let a = target_velocity.dot(target_velocity) - projectile_speed * projectile_speed;
    let b = 2.0 * d.dot(target_velocity);
    let c = d.dot(d);

    if a.abs() < 1e-9 {
        // Target speed matches projectile speed: the quadratic collapses
        // to a linear equation.
        if b.abs() < 1e-9 {
            return (c < 1e-9).then_some(0.0);
        }
        let t = -c / b;
        return (t >= 0.0).then_some(t);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

    if lo >= 0.0 {
        Some(lo)
    } else if hi >= 0.0 {
        Some(hi)
    } else {
        None
    }
}

/// Predicted aim point for ranged fire: the target's extrapolated
/// position at intercept time, with the lead scaled by the configured
/// prediction strength. Falls back to the current position (zero lead)
/// when no intercept exists.
pub fn ranged_aim_point(
    shooter: DVec2,
    target: DVec2,
    target_velocity: DVec2,
    projectile_speed: f64,
    prediction_strength: f64,
) -> DVec2 {
    match quadratic_intercept(shooter, target, target_velocity, projectile_speed) {
        Some(t) => target + target_velocity * t * prediction_strength.clamp(0.0, 1.0),
        None => target,
    }
}

/// Adaptive melee lookahead: more lead for faster movers, within
/// [0.16 s, 0.28 s].
pub fn melee_lookahead(speed: f64) -> f64 {
    let velocity_factor = (speed / MELEE_LOOKAHEAD_SPEED_SCALE).min(1.0);
    MELEE_PREDICTION_LOOKAHEAD * (0.8 + velocity_factor * 0.4)
}

/// Second-order Taylor extrapolation of a melee target's position using
/// the smoothed velocity and acceleration estimates.
pub fn melee_aim_point(position: DVec2, estimate: &MeleeEstimate) -> DVec2 {
    let dt = melee_lookahead(estimate.velocity.length());
    position + estimate.velocity * dt + estimate.acceleration * (0.5 * dt * dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_target_zero_lead() {
        let aim = ranged_aim_point(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::ZERO,
            1000.0,
            1.0,
        );
        assert_eq!(aim, DVec2::new(100.0, 0.0));
    }

    #[test]
    fn test_stationary_target_any_positive_speed() {
        for speed in [1.0, 50.0, 10_000.0] {
            let aim = ranged_aim_point(DVec2::ZERO, DVec2::new(30.0, 40.0), DVec2::ZERO, speed, 1.0);
            assert_eq!(aim, DVec2::new(30.0, 40.0), "speed {speed}");
        }
    }

    #[test]
    fn test_crossing_target_leads_in_motion_direction() {
        let t = quadratic_intercept(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(0.0, 50.0),
            1000.0,
        )
        .expect("intercept exists");
        assert!(t > 0.0);
        // Roughly 0.1 s of flight time, so roughly 5 units of lead.
        assert!((t - 0.1).abs() < 0.01, "t = {t}");
    }

    #[test]
    fn test_receding_target_faster_than_projectile_no_intercept() {
        let result = quadratic_intercept(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(500.0, 0.0),
            300.0,
        );
        assert!(result.is_none(), "outrunning target has no intercept");
    }

    #[test]
    fn test_no_intercept_falls_back_to_raw_position() {
        let aim = ranged_aim_point(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(500.0, 0.0),
            300.0,
            1.0,
        );
        assert_eq!(aim, DVec2::new(100.0, 0.0));
        assert!(aim.x.is_finite() && aim.y.is_finite());
    }

    #[test]
    fn test_approaching_target_faster_than_projectile_still_intercepts() {
        // Head-on closure always has a positive root even when the
        // target is faster than the projectile.
        let t = quadratic_intercept(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(-500.0, 0.0),
            300.0,
        )
        .expect("head-on intercept exists");
        assert!(t > 0.0 && t.is_finite());
    }

    #[test]
    fn test_prediction_strength_blends_lead() {
        let full = ranged_aim_point(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(0.0, 50.0),
            1000.0,
            1.0,
        );
        let half = ranged_aim_point(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(0.0, 50.0),
            1000.0,
            0.5,
        );
        let none = ranged_aim_point(
            DVec2::ZERO,
            DVec2::new(100.0, 0.0),
            DVec2::new(0.0, 50.0),
            1000.0,
            0.0,
        );
        assert_eq!(none, DVec2::new(100.0, 0.0));
        assert!((half.y - full.y / 2.0).abs() < 1e-9, "linear blend");
        assert!(full.y > half.y && half.y > none.y);
    }

    #[test]
    fn test_melee_lookahead_bounds() {
        assert!((melee_lookahead(0.0) - 0.16).abs() < 1e-12);
        assert!((melee_lookahead(500.0) - 0.28).abs() < 1e-12);
        assert!((melee_lookahead(5000.0) - 0.28).abs() < 1e-12, "saturates");
    }

    #[test]
    fn test_melee_extrapolation_second_order() {
        let estimate = MeleeEstimate {
            velocity: DVec2::new(100.0, 0.0),
            acceleration: DVec2::new(0.0, 10.0),
        };
        let dt = melee_lookahead(100.0);
        let predicted = melee_aim_point(DVec2::ZERO, &estimate);
        assert!((predicted.x - 100.0 * dt).abs() < 1e-9);
        assert!((predicted.y - 5.0 * dt * dt).abs() < 1e-9);
    }
}
