//! Shared-buffer layout for the host.
//! Must stay in sync with the host's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 24 floats]
//! [Balls: max_balls × 8 floats]
//! [Sounds: max_sounds × 1 float]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header so the host can compute offsets.

use crate::api::engine::Engine;
use crate::api::types::{Group, GameEvent, MatchEvent, SoundEvent};
use crate::core::balls::BALL_COUNT;
use crate::renderer::instance::BallInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 24;

/// Header field indices. Slots 0 and 23 are spare.
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_BALLS: usize = 3;
pub const HEADER_BALL_COUNT: usize = 4;
pub const HEADER_MAX_SOUNDS: usize = 5;
pub const HEADER_SOUND_COUNT: usize = 6;
pub const HEADER_MAX_EVENTS: usize = 7;
pub const HEADER_EVENT_COUNT: usize = 8;
pub const HEADER_TICK: usize = 9;
pub const HEADER_CURRENT_PLAYER: usize = 10;
pub const HEADER_AIM: usize = 11;
pub const HEADER_POWER: usize = 12;
pub const HEADER_CHARGING: usize = 13;
pub const HEADER_CAN_SHOOT: usize = 14;
pub const HEADER_P1_GROUP: usize = 15;
pub const HEADER_P2_GROUP: usize = 16;
pub const HEADER_P1_POCKETED: usize = 17;
pub const HEADER_P2_POCKETED: usize = 18;
pub const HEADER_GAME_OVER: usize = 19;
/// 0 while the match is running.
pub const HEADER_WINNER: usize = 20;
pub const HEADER_P1_FOULS: usize = 21;
pub const HEADER_P2_FOULS: usize = 22;

pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball instance (wire format, fixed).
pub const BALL_FLOATS: usize = BallInstance::FLOATS;

/// Floats per game event: kind, a, b, c (wire format, fixed).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

pub const DEFAULT_MAX_SOUNDS: usize = 32;
pub const DEFAULT_MAX_EVENTS: usize = 32;

/// Section sizes and offsets, all in floats.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_balls: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub ball_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_balls: usize, max_sounds: usize, max_events: usize) -> Self {
        let ball_data_offset = HEADER_FLOATS;
        let sound_data_offset = ball_data_offset + max_balls * BALL_FLOATS;
        let event_data_offset = sound_data_offset + max_sounds;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;
        Self {
            max_balls,
            max_sounds,
            max_events,
            ball_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// A zeroed buffer of the right size with capacities in the header.
    pub fn allocate(&self) -> Vec<f32> {
        let mut buf = vec![0.0; self.buffer_total_floats];
        buf[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buf[HEADER_MAX_BALLS] = self.max_balls as f32;
        buf[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        buf[HEADER_MAX_EVENTS] = self.max_events as f32;
        buf
    }

    /// Pack one frame. Sounds and events beyond capacity are dropped.
    /// Returns false when `buf` is too small for this layout.
    pub fn write_frame(
        &self,
        buf: &mut [f32],
        engine: &Engine,
        sounds: &[SoundEvent],
        events: &[MatchEvent],
    ) -> bool {
        if buf.len() < self.buffer_total_floats {
            return false;
        }
        let rules = engine.rules();
        let shot = engine.shot();
        let [p1, p2] = rules.players();

        buf[HEADER_FRAME_COUNTER] += 1.0;
        buf[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buf[HEADER_MAX_BALLS] = self.max_balls as f32;
        buf[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        buf[HEADER_MAX_EVENTS] = self.max_events as f32;
        buf[HEADER_TICK] = engine.clock().tick() as f32;
        buf[HEADER_CURRENT_PLAYER] = rules.current_player().0 as f32;
        buf[HEADER_AIM] = shot.aim() as f32;
        buf[HEADER_POWER] = shot.power() as f32;
        buf[HEADER_CHARGING] = flag(shot.is_charging());
        buf[HEADER_CAN_SHOOT] = flag(engine.can_shoot());
        buf[HEADER_P1_GROUP] = Group::wire_code(p1.group);
        buf[HEADER_P2_GROUP] = Group::wire_code(p2.group);
        buf[HEADER_P1_POCKETED] = p1.pocketed_balls.len() as f32;
        buf[HEADER_P2_POCKETED] = p2.pocketed_balls.len() as f32;
        buf[HEADER_GAME_OVER] = flag(rules.is_game_over());
        buf[HEADER_WINNER] = rules.winner().map_or(0.0, |p| p.0 as f32);
        buf[HEADER_P1_FOULS] = p1.fouls as f32;
        buf[HEADER_P2_FOULS] = p2.fouls as f32;

        let mut ball_count = 0;
        let ball_section = &mut buf[self.ball_data_offset..self.sound_data_offset];
        for (slot, ball) in ball_section
            .chunks_exact_mut(BALL_FLOATS)
            .zip(engine.balls().iter())
        {
            slot.copy_from_slice(bytemuck::cast_slice(&[BallInstance::from(ball)]));
            ball_count += 1;
        }
        buf[HEADER_BALL_COUNT] = ball_count as f32;

        let sound_count = sounds.len().min(self.max_sounds);
        for (i, sound) in sounds.iter().take(sound_count).enumerate() {
            buf[self.sound_data_offset + i] = sound.0 as f32;
        }
        buf[HEADER_SOUND_COUNT] = sound_count as f32;

        let event_count = events.len().min(self.max_events);
        let event_section = &mut buf[self.event_data_offset..self.buffer_total_floats];
        for (slot, event) in event_section
            .chunks_exact_mut(EVENT_FLOATS)
            .zip(events.iter().take(event_count))
        {
            slot.copy_from_slice(bytemuck::cast_slice(&[event.to_wire()]));
        }
        buf[HEADER_EVENT_COUNT] = event_count as f32;
        true
    }
}

impl Default for ProtocolLayout {
    fn default() -> Self {
        Self::new(BALL_COUNT, DEFAULT_MAX_SOUNDS, DEFAULT_MAX_EVENTS)
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}
