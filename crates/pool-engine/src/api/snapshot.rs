use serde::Serialize;

use crate::api::types::{BallId, BallRole, Group, PlayerId, WinReason};
use crate::core::balls::Ball;
use crate::systems::rules::{Phase, Player};
use crate::systems::shot::ShotState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallSnapshot {
    pub id: BallId,
    pub role: BallRole,
    pub x: f64,
    /// Render height.
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vz: f64,
    pub pocketed: bool,
}

impl From<&Ball> for BallSnapshot {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            role: ball.role,
            x: ball.pos.x,
            y: ball.height,
            z: ball.pos.y,
            vx: ball.vel.x,
            vz: ball.vel.y,
            pocketed: ball.pocketed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub group: Option<Group>,
    pub pocketed_balls: Vec<BallId>,
    pub pocketed_count: usize,
    pub fouls: u32,
    pub shots: u32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            group: player.group,
            pocketed_balls: player.pocketed_balls.iter().copied().collect(),
            pocketed_count: player.pocketed_balls.len(),
            fouls: player.fouls,
            shots: player.shots,
        }
    }
}

/// Read-only view of the whole match for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub balls: Vec<BallSnapshot>,
    pub aim: f64,
    pub power: f64,
    pub shot_state: ShotState,
    pub can_shoot: bool,
    pub current_player: PlayerId,
    pub players: [PlayerSnapshot; 2],
    pub groups_assigned: bool,
    pub phase: Phase,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    pub win_reason: Option<WinReason>,
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn ball(&self, id: BallId) -> Option<&BallSnapshot> {
        self.balls.get(id.index())
    }

    pub fn player(&self, id: PlayerId) -> &PlayerSnapshot {
        &self.players[id.slot()]
    }
}
