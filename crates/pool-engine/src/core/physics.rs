use glam::DVec2;

use crate::api::config::PhysicsConfig;
use crate::api::types::BallId;
use crate::core::balls::{Ball, BallRegistry};
use crate::core::geometry::{separation, snap_to_rest};
use crate::core::table::Table;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Something that happened during one physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// A ball dropped into pocket `pocket` (index into [`Table::pockets`]).
    Pocketed { ball: BallId, pocket: usize },
    /// Two approaching balls exchanged an impulse of `impulse` along the normal.
    BallContact { a: BallId, b: BallId, impulse: f64 },
    /// A ball bounced off a cushion.
    Cushion { ball: BallId },
}

/// Fixed-tick integrator for every ball on the table.
///
/// Each tick moves balls by their velocity (one unit timestep), applies
/// rolling friction, tests pockets and then cushions per ball, and finally
/// resolves overlapping pairs with an impulse along the contact normal.
#[derive(Debug, Clone)]
pub struct PhysicsStepper {
    table: Table,
    config: PhysicsConfig,
}

impl PhysicsStepper {
    pub fn new(table: Table, config: PhysicsConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance one tick and collect what happened into the provided Vec.
    pub fn step_into(&self, balls: &mut BallRegistry, events: &mut Vec<PhysicsEvent>) {
        let radius = balls.radius();

        for ball in balls.as_mut_slice().iter_mut() {
            if ball.pocketed {
                continue;
            }
            ball.pos += ball.vel;
            ball.vel = snap_to_rest(ball.vel * self.config.friction, self.config.rest_epsilon);

            if let Some(pocket) = self.check_pocket(ball) {
                events.push(PhysicsEvent::Pocketed { ball: ball.id, pocket });
                continue;
            }
            if self.bounce_off_cushions(ball, radius) {
                events.push(PhysicsEvent::Cushion { ball: ball.id });
            }
        }

        self.resolve_pairs(balls.as_mut_slice(), radius, events);

        // Pair correction can nudge a ball through a rail.
        for ball in balls.as_mut_slice().iter_mut().filter(|b| b.is_active()) {
            self.bounce_off_cushions(ball, radius);
        }
    }

    /// Capture the ball if it lies strictly inside a pocket. Returns the
    /// pocket index. An already pocketed ball is left untouched.
    pub fn check_pocket(&self, ball: &mut Ball) -> Option<usize> {
        if ball.pocketed {
            return None;
        }
        let pocket = self.table.pocket_at(ball.pos)?;
        ball.pocketed = true;
        ball.vel = DVec2::ZERO;
        ball.height = self.config.pocketed_height;
        Some(pocket)
    }

    /// Clamp into the cushion bounds. A velocity component is reflected only
    /// while it still points out of the table. Returns true on a bounce.
    fn bounce_off_cushions(&self, ball: &mut Ball, radius: f64) -> bool {
        let (lo, hi) = self.table.cushion_bounds(radius);
        let e = self.config.cushion_restitution;
        let mut bounced = false;

        if ball.pos.x < lo.x {
            ball.pos.x = lo.x;
            if ball.vel.x < 0.0 {
                ball.vel.x *= -e;
                bounced = true;
            }
        } else if ball.pos.x > hi.x {
            ball.pos.x = hi.x;
            if ball.vel.x > 0.0 {
                ball.vel.x *= -e;
                bounced = true;
            }
        }

        if ball.pos.y < lo.y {
            ball.pos.y = lo.y;
            if ball.vel.y < 0.0 {
                ball.vel.y *= -e;
                bounced = true;
            }
        } else if ball.pos.y > hi.y {
            ball.pos.y = hi.y;
            if ball.vel.y > 0.0 {
                ball.vel.y *= -e;
                bounced = true;
            }
        }
        bounced
    }

    fn resolve_pairs(&self, balls: &mut [Ball], radius: f64, events: &mut Vec<PhysicsEvent>) {
        let min_dist = radius * 2.0;
        let e = self.config.ball_restitution;

        for i in 0..balls.len() {
            let (head, tail) = balls.split_at_mut(i + 1);
            let a = &mut head[i];
            if a.pocketed {
                continue;
            }
            for b in tail.iter_mut() {
                if b.pocketed {
                    continue;
                }
                let Some((normal, dist)) = separation(a.pos, b.pos) else {
                    continue;
                };
                if dist >= min_dist {
                    continue;
                }

                let push = normal * ((min_dist - dist) * 0.5);
                a.pos += push;
                b.pos -= push;

                let vn = (a.vel - b.vel).dot(normal);
                if vn > 0.0 {
                    continue;
                }
                let impulse = -(1.0 + e) * vn * 0.5;
                a.vel += normal * impulse;
                b.vel -= normal * impulse;
                if impulse > 0.0 {
                    events.push(PhysicsEvent::BallContact { a: a.id, b: b.id, impulse });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;

    fn setup() -> (PhysicsStepper, BallRegistry) {
        let config = EngineConfig::default();
        let stepper = PhysicsStepper::new(Table::from_config(&config.table), config.physics.clone());
        let mut balls = BallRegistry::racked(&config);
        // Park every object ball in a pocket so tests start from a bare cue.
        for ball in balls.as_mut_slice().iter_mut().skip(1) {
            ball.pocketed = true;
            ball.height = -1.0;
        }
        (stepper, balls)
    }

    #[test]
    fn friction_brings_ball_to_exact_rest() {
        let (stepper, mut balls) = setup();
        balls.cue_mut().vel = DVec2::new(0.0, 0.02);
        let mut events = Vec::new();
        let mut last = balls.cue().vel.length();
        for _ in 0..400 {
            stepper.step_into(&mut balls, &mut events);
            let speed = balls.cue().vel.length();
            assert!(speed <= last);
            last = speed;
        }
        assert_eq!(balls.cue().vel, DVec2::ZERO);
    }

    #[test]
    fn cushion_reflects_and_clamps() {
        let (stepper, mut balls) = setup();
        // Head for the +x rail away from any pocket.
        balls.cue_mut().pos = DVec2::new(1.35, 1.5);
        balls.cue_mut().vel = DVec2::new(0.1, 0.0);
        let mut events = Vec::new();
        stepper.step_into(&mut balls, &mut events);
        let cue = balls.cue();
        assert!((cue.pos.x - (1.5 - 0.09)).abs() < 1e-12);
        assert!(cue.vel.x < 0.0);
        assert!((cue.vel.x + 0.1 * 0.98 * 0.8).abs() < 1e-12);
        assert!(events.contains(&PhysicsEvent::Cushion { ball: BallId::CUE }));
    }

    #[test]
    fn ball_at_corner_is_pocketed_in_one_tick() {
        let (stepper, mut balls) = setup();
        balls.cue_mut().pos = DVec2::new(-1.5, -3.0);
        let mut events = Vec::new();
        stepper.step_into(&mut balls, &mut events);
        let cue = balls.cue();
        assert!(cue.pocketed);
        assert_eq!(cue.vel, DVec2::ZERO);
        assert_eq!(cue.height, -1.0);
        assert_eq!(events, vec![PhysicsEvent::Pocketed { ball: BallId::CUE, pocket: 0 }]);
    }

    #[test]
    fn check_pocket_is_idempotent() {
        let (stepper, mut balls) = setup();
        let cue = balls.cue_mut();
        cue.pos = DVec2::new(1.5, 0.0);
        assert_eq!(stepper.check_pocket(cue), Some(5));
        let before = cue.clone();
        assert_eq!(stepper.check_pocket(cue), None);
        assert_eq!(*cue, before);
    }

    #[test]
    fn head_on_collision_conserves_momentum() {
        let (stepper, mut balls) = setup();
        balls.place(BallId(9), DVec2::new(0.0, 0.5), 0.67);
        balls.cue_mut().pos = DVec2::new(0.0, 0.5 - 0.17);
        balls.cue_mut().vel = DVec2::new(0.0, 0.05);

        let before: DVec2 = balls.iter().filter(|b| b.is_active()).map(|b| b.vel).sum();
        let mut events = Vec::new();
        stepper.step_into(&mut balls, &mut events);

        // Friction scales both velocities before the pair pass.
        let after: DVec2 = balls.iter().filter(|b| b.is_active()).map(|b| b.vel).sum();
        assert!((after - before * 0.98).length() < 1e-12);
        let obj = balls.get(BallId(9)).unwrap();
        assert!(obj.vel.y > balls.cue().vel.y);
        assert!(events.iter().any(|e| matches!(e, PhysicsEvent::BallContact { .. })));
    }

    #[test]
    fn separating_pair_keeps_velocity() {
        let (stepper, mut balls) = setup();
        balls.place(BallId(9), DVec2::new(0.0, 0.5), 0.67);
        balls.cue_mut().pos = DVec2::new(0.0, 0.4);
        balls.cue_mut().vel = DVec2::new(0.0, -0.01);
        let mut events = Vec::new();
        stepper.step_into(&mut balls, &mut events);
        assert!((balls.cue().vel.y + 0.01 * 0.98).abs() < 1e-12);
        assert!(balls.cue().pos.distance(balls.get(BallId(9)).unwrap().pos) >= 0.18 - 1e-12);
        assert!(events.is_empty());
    }

    #[test]
    fn coincident_pair_is_skipped() {
        let (stepper, mut balls) = setup();
        balls.place(BallId(9), DVec2::new(0.3, 0.3), 0.67);
        balls.cue_mut().pos = DVec2::new(0.3, 0.3);
        let mut events = Vec::new();
        stepper.step_into(&mut balls, &mut events);
        assert_eq!(balls.cue().pos, DVec2::new(0.3, 0.3));
        assert!(balls.iter().all(|b| b.pos.is_finite()));
    }

    #[test]
    fn correction_never_pushes_through_rail() {
        let (stepper, mut balls) = setup();
        balls.place(BallId(9), DVec2::new(1.41, 1.0), 0.67);
        balls.cue_mut().pos = DVec2::new(1.30, 1.0);
        let mut events = Vec::new();
        stepper.step_into(&mut balls, &mut events);
        assert!(balls.iter().filter(|b| b.is_active()).all(|b| stepper.table().contains(b.pos, 0.09)));
    }
}
