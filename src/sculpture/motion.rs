//! Free-roam movement: persistent direction, occasional course changes and
//! inelastic bounces off the sculpture volume.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::Point;
use crate::params::SculptureParams;

/// Uniformly distributed direction on the unit sphere
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z).normalize()
}

/// Per-point free-roam state
#[derive(Debug, Clone, Copy)]
pub struct MovementState {
    /// Unit heading
    pub direction: Vec3,

    /// Distance travelled per frame
    pub speed: f32,

    /// Clock time of the next course change (milliseconds)
    pub next_change_ms: f64,
}

impl MovementState {
    pub fn new<R: Rng + ?Sized>(now_ms: f64, params: &SculptureParams, rng: &mut R) -> Self {
        Self {
            direction: random_unit_vector(rng),
            speed: random_speed(params, rng),
            next_change_ms: now_ms + random_change_interval(params, rng),
        }
    }

    /// Drift toward a fresh random heading and redraw speed and deadline
    pub fn change_course<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        params: &SculptureParams,
        rng: &mut R,
    ) {
        let fresh = random_unit_vector(rng);
        let blend = params.direction_blend;
        let blended = self.direction * (1.0 - blend) + fresh * blend;
        self.direction = blended.try_normalize().unwrap_or(fresh);
        self.speed = random_speed(params, rng);
        self.next_change_ms = now_ms + random_change_interval(params, rng);
    }

    /// Clamp `position` into the volume, reflecting and diffusing the heading
    ///
    /// # Returns
    /// `true` if any axis was out of bounds
    pub fn bounce<R: Rng + ?Sized>(
        &mut self,
        position: &mut Vec3,
        params: &SculptureParams,
        rng: &mut R,
    ) -> bool {
        let lo = Vec3::new(-params.lateral_bound, -params.lateral_bound, 0.0);
        let hi = Vec3::new(params.lateral_bound, params.lateral_bound, params.depth_bound);
        let jitter = params.bounce_jitter;
        let mut bounced = false;

        for axis in 0..3 {
            if position[axis] < lo[axis] || position[axis] > hi[axis] {
                position[axis] = position[axis].clamp(lo[axis], hi[axis]);
                self.direction[axis] = -self.direction[axis];
                for other in (0..3).filter(|&other| other != axis) {
                    self.direction[other] += rng.gen_range(-jitter..=jitter);
                }
                bounced = true;
            }
        }

        if bounced {
            // Fall back to heading for the volume centre
            let centre = (lo + hi) * 0.5;
            self.direction = self
                .direction
                .try_normalize()
                .or_else(|| (centre - *position).try_normalize())
                .unwrap_or(Vec3::Z);
        }
        bounced
    }
}

fn random_speed<R: Rng + ?Sized>(params: &SculptureParams, rng: &mut R) -> f32 {
    let (lo, hi) = params.speed_range;
    rng.gen_range(lo..=hi)
}

fn random_change_interval<R: Rng + ?Sized>(params: &SculptureParams, rng: &mut R) -> f64 {
    let (lo, hi) = params.direction_change_ms;
    rng.gen_range(lo..=hi)
}

impl Point {
    /// One free-roam step
    ///
    /// The first call after the spread phase settles the point on its target
    /// and allocates its movement state; motion starts on the following frame.
    pub(super) fn roam<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        params: &SculptureParams,
        rng: &mut R,
    ) {
        let Some(state) = self.movement.as_mut() else {
            self.position = self.target;
            self.movement = Some(MovementState::new(now_ms, params, rng));
            return;
        };

        if now_ms > state.next_change_ms {
            state.change_course(now_ms, params, rng);
        }

        self.position += state.direction * state.speed;
        state.bounce(&mut self.position, params, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_movement_state_ranges() {
        let params = SculptureParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let state = MovementState::new(1000.0, &params, &mut rng);
            assert!(state.speed >= 0.5 && state.speed <= 2.0);
            assert!(state.next_change_ms >= 3000.0 && state.next_change_ms <= 8000.0);
        }
    }

    #[test]
    fn test_course_change_is_gradual() {
        let params = SculptureParams::default();
        let mut rng = StdRng::seed_from_u64(21);
        let mut state = MovementState::new(0.0, &params, &mut rng);
        let before = state.direction;

        state.change_course(10_000.0, &params, &mut rng);

        assert!((state.direction.length() - 1.0).abs() < 1e-5);
        // A 5% blend can turn the heading by at most a few degrees
        assert!(before.dot(state.direction) > 0.9);
        assert!(state.next_change_ms > 10_000.0);
    }

    #[test]
    fn test_bounce_reflects_offending_axis() {
        let params = SculptureParams::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = MovementState {
            direction: Vec3::new(1.0, 0.0, 0.0),
            speed: 1.0,
            next_change_ms: f64::MAX,
        };
        let mut position = Vec3::new(401.5, 10.0, 200.0);

        assert!(state.bounce(&mut position, &params, &mut rng));
        assert_eq!(position.x, 400.0);
        assert!(state.direction.x < 0.0);
        assert!((state.direction.length() - 1.0).abs() < 1e-5);
        // The other axes pick up jitter, so the heading is no longer pure x
        assert!(state.direction.y != 0.0 || state.direction.z != 0.0);
        assert!(state.direction.y.abs() <= 0.1 && state.direction.z.abs() <= 0.1);
    }

    #[test]
    fn test_bounce_off_floor() {
        let params = SculptureParams::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = MovementState {
            direction: Vec3::new(0.0, 0.0, -1.0),
            speed: 2.0,
            next_change_ms: f64::MAX,
        };
        let mut position = Vec3::new(0.0, 0.0, -1.2);

        assert!(state.bounce(&mut position, &params, &mut rng));
        assert_eq!(position.z, 0.0);
        assert!(state.direction.z > 0.0);
    }

    #[test]
    fn test_no_bounce_inside_volume() {
        let params = SculptureParams::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = MovementState::new(0.0, &params, &mut rng);
        let before = state.direction;
        let mut position = Vec3::new(10.0, -20.0, 30.0);

        assert!(!state.bounce(&mut position, &params, &mut rng));
        assert_eq!(state.direction, before);
    }

    #[test]
    fn test_roam_settles_on_target_first() {
        let params = SculptureParams::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut point = Point::new(Vec3::ZERO, Vec3::new(50.0, 60.0, 70.0));

        point.roam(3000.0, &params, &mut rng);
        assert_eq!(point.position, point.target);
        assert!(point.movement.is_some());

        point.roam(3016.0, &params, &mut rng);
        assert!(point.position != point.target);
    }
}
