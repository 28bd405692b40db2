//! Ballistic lead solving for gravity-affected rounds.
//!
//! Solves the minimal positive intercept time for a constant-speed round
//! against a constant-velocity target, then lifts the aim point to cancel
//! the gravity drop over the flight. Iterative refinement, no closed form.

use arena_core::types::{Position, Velocity};

/// Longest lead the solver will accept before declaring the target
/// unreachable (seconds).
const MAX_LEAD_SECS: f64 = 6.0;

/// Refinement passes over the intercept time.
const LEAD_ITERATIONS: usize = 3;

/// A firing solution against a moving target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticSolution {
    /// Launch bearing in radians.
    pub angle: f64,
    /// Estimated flight time to intercept.
    pub lead_secs: f64,
    /// Predicted target position at intercept (pre gravity lift).
    pub impact: Position,
}

/// Solve for a lead intercept. Returns `None` when the target cannot be
/// reached at the given muzzle speed — callers fall back to direct aim.
pub fn solve_lead(
    shooter: &Position,
    target_pos: &Position,
    target_vel: &Velocity,
    muzzle_speed: f64,
    gravity: f64,
) -> Option<BallisticSolution> {
    if muzzle_speed <= 1.0 {
        return None;
    }

    let mut t = shooter.distance_to(target_pos) / muzzle_speed;
    for _ in 0..LEAD_ITERATIONS {
        let predicted = Position::new(
            target_pos.x + target_vel.x * t,
            target_pos.y + target_vel.y * t,
        );
        t = shooter.distance_to(&predicted) / muzzle_speed;
        if !t.is_finite() || t > MAX_LEAD_SECS {
            return None;
        }
    }

    let impact = Position::new(
        target_pos.x + target_vel.x * t,
        target_pos.y + target_vel.y * t,
    );

    // Lift the aim point by the gravity drop accumulated over the flight
    // (y grows downward, so the lift subtracts).
    let drop = 0.5 * gravity * t * t;
    let aim = Position::new(impact.x, impact.y - drop);

    // A lift that dwarfs the horizontal reach means the round falls short.
    let horizontal = (impact.x - shooter.x).abs().max(1.0);
    if drop > horizontal * 2.0 {
        return None;
    }

    Some(BallisticSolution {
        angle: shooter.angle_to(&aim),
        lead_secs: t,
        impact,
    })
}

/// Direct bearing at the target's current position, gravity ignored.
pub fn direct_aim(shooter: &Position, target: &Position) -> f64 {
    shooter.angle_to(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_points_ahead_of_crossing_target() {
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(300.0, 0.0);
        let vel = Velocity::new(0.0, 60.0); // moving down-screen

        let sol = solve_lead(&shooter, &target, &vel, 400.0, 0.0).unwrap();
        assert!(
            sol.impact.y > target.y,
            "impact should lead the target's motion: {:?}",
            sol.impact
        );
        assert!(sol.lead_secs > 0.0);

        // With zero gravity the bearing points straight at the impact.
        let expected = shooter.angle_to(&sol.impact);
        assert!((sol.angle - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_lifts_aim_above_target() {
        let shooter = Position::new(0.0, 500.0);
        let target = Position::new(400.0, 500.0);
        let still = Velocity::new(0.0, 0.0);

        let flat = solve_lead(&shooter, &target, &still, 400.0, 0.0).unwrap();
        let arced = solve_lead(&shooter, &target, &still, 400.0, 140.0).unwrap();

        // Arced shot aims above (smaller y-angle, i.e. more negative).
        assert!(
            arced.angle < flat.angle,
            "gravity compensation should raise the bearing"
        );
    }

    #[test]
    fn test_unreachable_target_has_no_solution() {
        let shooter = Position::new(0.0, 0.0);
        // Target receding faster than the round flies.
        let target = Position::new(500.0, 0.0);
        let vel = Velocity::new(300.0, 0.0);
        assert!(solve_lead(&shooter, &target, &vel, 200.0, 0.0).is_none());
    }

    #[test]
    fn test_stationary_target_matches_direct_aim() {
        let shooter = Position::new(100.0, 100.0);
        let target = Position::new(300.0, 250.0);
        let still = Velocity::new(0.0, 0.0);

        let sol = solve_lead(&shooter, &target, &still, 500.0, 0.0).unwrap();
        let direct = direct_aim(&shooter, &target);
        assert!((sol.angle - direct).abs() < 1e-9);
        let expected_t = shooter.distance_to(&target) / 500.0;
        assert!((sol.lead_secs - expected_t).abs() < 1e-9);
    }
}
