//! Ball records, roles, and the starting rack.

use glam::DVec2;
use serde::Serialize;

use crate::api::config::EngineConfig;
use crate::api::types::{BallId, BallRole, Group};

/// Cue plus fifteen object balls.
pub const BALL_COUNT: usize = 16;

/// The black sits in the centre of the third row.
pub const BLACK_INDEX: usize = 5;

/// Role of every ball by registry index.
pub const ROLES: [BallRole; BALL_COUNT] = {
    let mut roles = [BallRole::Object(Group::Red); BALL_COUNT];
    roles[0] = BallRole::Cue;
    let mut i = 1;
    while i <= 8 {
        roles[i] = BallRole::Object(Group::Blue);
        i += 1;
    }
    roles[BLACK_INDEX] = BallRole::Black;
    roles
};

/// Number of balls in one colour group.
pub fn group_size(group: Group) -> usize {
    ROLES.iter().filter(|r| r.group() == Some(group)).count()
}

/// Triangle rack for the fifteen object balls.
///
/// Row `r` holds `r + 1` balls ordered left to right (increasing x); rows
/// grow toward +z from `apex`. Element `i` belongs to ball index `i + 1`.
pub fn rack_positions(apex: DVec2, ball_radius: f64, gap: f64) -> [DVec2; 15] {
    let spacing = ball_radius * 2.0 + gap;
    let row_offset = spacing * 0.866; // sqrt(3)/2 for an equilateral triangle

    let mut positions = [DVec2::ZERO; 15];
    let mut slot = 0;
    for row in 0..5 {
        for k in 0..=row {
            let x = apex.x + (k as f64 - row as f64 * 0.5) * spacing;
            let z = apex.y + row as f64 * row_offset;
            positions[slot] = DVec2::new(x, z);
            slot += 1;
        }
    }
    positions
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub id: BallId,
    pub role: BallRole,
    /// (x, z) on the table plane.
    pub pos: DVec2,
    pub vel: DVec2,
    /// Render height.
    pub height: f64,
    pub pocketed: bool,
}

impl Ball {
    pub fn new(id: BallId, pos: DVec2, height: f64) -> Self {
        Self {
            id,
            role: ROLES[id.index()],
            pos,
            vel: DVec2::ZERO,
            height,
            pocketed: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.pocketed
    }
}

/// All sixteen balls, indexed by [`BallId`].
#[derive(Debug, Clone, PartialEq)]
pub struct BallRegistry {
    balls: Vec<Ball>,
    radius: f64,
}

impl BallRegistry {
    /// Racked balls and the cue on its spot.
    pub fn racked(config: &EngineConfig) -> Self {
        let radius = config.physics.ball_radius;
        let height = config.physics.table_height;
        let mut balls = Vec::with_capacity(BALL_COUNT);
        balls.push(Ball::new(BallId::CUE, config.rack.cue_spot, height));
        for (i, pos) in rack_positions(config.rack.apex, radius, config.rack.gap)
            .into_iter()
            .enumerate()
        {
            balls.push(Ball::new(BallId(i as u8 + 1), pos, height));
        }
        Self { balls, radius }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.index())
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(id.index())
    }

    pub fn cue(&self) -> &Ball {
        &self.balls[0]
    }

    pub fn cue_mut(&mut self) -> &mut Ball {
        &mut self.balls[0]
    }

    /// Found by role, not by position in the rack.
    pub fn black(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.role.is_black())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn as_slice(&self) -> &[Ball] {
        &self.balls
    }

    pub fn as_mut_slice(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    /// Every ball below `epsilon` on both axes. Pocketed balls are at rest.
    pub fn all_settled(&self, epsilon: f64) -> bool {
        self.balls
            .iter()
            .all(|b| crate::core::geometry::is_at_rest(b.vel, epsilon))
    }

    /// True when an active ball other than `except` overlaps a ball at `pos`.
    pub fn is_occupied(&self, pos: DVec2, except: BallId) -> bool {
        let min_dist = self.radius * 2.0;
        self.balls
            .iter()
            .any(|b| b.id != except && b.is_active() && b.pos.distance(pos) < min_dist)
    }

    /// Put a ball back on the cloth at rest.
    pub fn place(&mut self, id: BallId, pos: DVec2, height: f64) -> bool {
        match self.get_mut(id) {
            Some(ball) => {
                ball.pos = pos;
                ball.vel = DVec2::ZERO;
                ball.height = height;
                ball.pocketed = false;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_by_index() {
        assert!(ROLES[0].is_cue());
        assert!(ROLES[5].is_black());
        for i in [1, 2, 3, 4, 6, 7, 8] {
            assert_eq!(ROLES[i], BallRole::Object(Group::Blue));
        }
        for i in 9..16 {
            assert_eq!(ROLES[i], BallRole::Object(Group::Red));
        }
        assert_eq!(group_size(Group::Blue), 7);
        assert_eq!(group_size(Group::Red), 7);
    }

    #[test]
    fn rack_rows_and_black_centre() {
        let apex = DVec2::new(0.0, 1.0);
        let pos = rack_positions(apex, 0.09, 0.0);
        assert_eq!(pos[0], apex);
        // Ball 5 (element 4) is the middle of row 2, straight behind the apex.
        assert!((pos[BLACK_INDEX - 1].x).abs() < 1e-12);
        assert!((pos[BLACK_INDEX - 1].y - (1.0 + 2.0 * 0.18 * 0.866)).abs() < 1e-12);
        // Row 1 left to right.
        assert!(pos[1].x < pos[2].x);
        assert!((pos[1].y - pos[2].y).abs() < 1e-12);
    }

    #[test]
    fn racked_balls_do_not_overlap() {
        let pos = rack_positions(DVec2::new(0.0, 1.0), 0.09, 0.001);
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                assert!(pos[i].distance(pos[j]) >= 0.18, "{} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn registry_starts_at_rest() {
        let reg = BallRegistry::racked(&EngineConfig::default());
        assert_eq!(reg.len(), BALL_COUNT);
        assert_eq!(reg.cue().pos, DVec2::new(0.0, -1.0));
        assert_eq!(reg.black().map(|b| b.id), Some(BallId(5)));
        assert!(reg.all_settled(0.001));
        assert!(reg.iter().all(|b| b.height == 0.67 && !b.pocketed));
    }

    #[test]
    fn place_clears_pocketed_and_velocity() {
        let mut reg = BallRegistry::racked(&EngineConfig::default());
        {
            let ball = reg.get_mut(BallId(3)).unwrap();
            ball.pocketed = true;
            ball.vel = DVec2::new(0.1, 0.2);
        }
        assert!(reg.place(BallId(3), DVec2::new(1.0, 1.0), 0.67));
        let ball = reg.get(BallId(3)).unwrap();
        assert!(!ball.pocketed);
        assert_eq!(ball.vel, DVec2::ZERO);
        assert!(!reg.place(BallId(40), DVec2::ZERO, 0.67));
    }

    #[test]
    fn occupancy_ignores_pocketed_and_self() {
        let mut reg = BallRegistry::racked(&EngineConfig::default());
        let apex = reg.get(BallId(1)).unwrap().pos;
        assert!(reg.is_occupied(apex, BallId::CUE));
        reg.get_mut(BallId(1)).unwrap().pocketed = true;
        // Row 1 sits a full diameter plus the gap behind the apex.
        assert!(!reg.is_occupied(apex, BallId::CUE));
        assert!(!reg.is_occupied(DVec2::new(0.0, -2.0), BallId::CUE));
    }
}
