use log::debug;

use crate::angle::normalize_angle;
use crate::raycaster::{RayCaster, RayHit};
use crate::world::GridMap;

/// Direction of a turn or walk: -1, 0 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    Negative,
    #[default]
    Zero,
    Positive,
}

impl Sign {
    #[inline]
    pub fn value(self) -> f32 {
        match self {
            Sign::Negative => -1.0,
            Sign::Zero => 0.0,
            Sign::Positive => 1.0,
        }
    }
}

/// What the player is asking for on this update. `turn` is positive
/// clockwise (towards increasing angle), `walk` positive forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub turn: Sign,
    pub walk: Sign,
}

impl Intent {
    pub const IDLE: Intent = Intent {
        turn: Sign::Zero,
        walk: Sign::Zero,
    };
}

pub struct Camera {
    pub pos: [f32; 2], // (x, y) position in world space
    pub angle: f32,    // radians in [0, 2π), 0 faces +x, π/2 faces +y (down)
    pub move_speed: f32,
    pub turn_speed: f32,
    pub radius: f32,
    rays: Vec<RayHit>,
}

impl Camera {
    pub fn new(pos: [f32; 2], angle: f32, move_speed: f32, turn_speed: f32, radius: f32) -> Self {
        Self {
            pos,
            angle: normalize_angle(angle),
            move_speed,
            turn_speed,
            radius,
            rays: Vec::new(),
        }
    }

    /// The bundle from the last `apply_intent`.
    pub fn rays(&self) -> &[RayHit] {
        &self.rays
    }

    #[inline]
    pub fn forward(&self) -> [f32; 2] {
        [self.angle.cos(), self.angle.sin()]
    }

    /// Turns, then tries to step along the new facing. The step is dropped
    /// when the target point lies in a blocked cell; only the target point is
    /// tested, so a step longer than a wall is thick can pass through it.
    /// The ray bundle is always recast, even for an idle intent.
    ///
    /// Returns `false` if a requested step was rejected.
    pub fn apply_intent(&mut self, intent: Intent, map: &GridMap, caster: &RayCaster) -> bool {
        self.angle = normalize_angle(self.angle + intent.turn.value() * self.turn_speed);

        let step = intent.walk.value() * self.move_speed;
        let [fx, fy] = self.forward();
        let target = [self.pos[0] + fx * step, self.pos[1] + fy * step];

        let moved = if step == 0.0 {
            true
        } else if map.is_blocked_at_world(target[0], target[1]) {
            false
        } else {
            self.pos = target;
            true
        };

        self.rays = caster.cast(self.pos, self.angle, map);

        debug!(
            "intent {:?}: pos ({:.2}, {:.2}) angle {:.4}{}",
            intent,
            self.pos[0],
            self.pos[1],
            self.angle,
            if moved { "" } else { ", move rejected" }
        );
        moved
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    use super::*;
    use crate::angle::to_radians;

    const T: f32 = 32.0;

    fn setup() -> (GridMap, RayCaster) {
        (
            GridMap::generate_blank(5, 5, T).unwrap(),
            RayCaster::new(to_radians(60.0), 8),
        )
    }

    #[test]
    fn idle_intent_recasts_rays() {
        let (map, caster) = setup();
        let mut cam = Camera::new(map.spawn(), 0.0, 2.0, 0.1, 8.0);
        assert!(cam.rays().is_empty());
        assert!(cam.apply_intent(Intent::IDLE, &map, &caster));
        assert_eq!(cam.rays().len(), 8);
        assert_eq!(cam.pos, map.spawn());
    }

    #[test]
    fn turning_wraps_angle() {
        let (map, caster) = setup();
        let mut cam = Camera::new(map.spawn(), 0.05, 2.0, 0.1, 8.0);
        let left = Intent {
            turn: Sign::Negative,
            walk: Sign::Zero,
        };
        cam.apply_intent(left, &map, &caster);
        assert!((cam.angle - (TAU - 0.05)).abs() < 1e-5);
        assert!((0.0..TAU).contains(&cam.angle));
    }

    #[test]
    fn open_step_moves_exactly_move_speed() {
        let (map, caster) = setup();
        let start = map.spawn();
        let mut cam = Camera::new(start, FRAC_PI_2, 3.0, 0.1, 8.0);
        let forward = Intent {
            turn: Sign::Zero,
            walk: Sign::Positive,
        };
        assert!(cam.apply_intent(forward, &map, &caster));
        let moved = (cam.pos[0] - start[0]).hypot(cam.pos[1] - start[1]);
        assert!((moved - 3.0).abs() < 1e-4);
        assert!(cam.pos[1] > start[1]);
    }

    #[test]
    fn blocked_step_keeps_position_but_still_turns() {
        let (map, caster) = setup();
        // Facing the west wall one tile away, stepping a full tile into it.
        let start = [1.5 * T, 3.5 * T];
        let mut cam = Camera::new(start, PI, T, 0.25, 8.0);
        let turn_and_walk = Intent {
            turn: Sign::Positive,
            walk: Sign::Positive,
        };
        assert!(!cam.apply_intent(turn_and_walk, &map, &caster));
        assert_eq!(cam.pos, start);
        assert!((cam.angle - (PI + 0.25)).abs() < 1e-5);
    }
}
