use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Index of a ball in the registry. Stable for the life of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallId(pub u8);

impl BallId {
    pub const CUE: BallId = BallId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the two seats at the table (1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(1);
    pub const TWO: PlayerId = PlayerId(2);

    /// The opponent.
    pub fn other(self) -> PlayerId {
        if self == PlayerId::ONE {
            PlayerId::TWO
        } else {
            PlayerId::ONE
        }
    }

    /// Slot in a `[T; 2]` indexed by player.
    #[inline]
    pub fn slot(self) -> usize {
        if self == PlayerId::ONE { 0 } else { 1 }
    }
}

/// Colour group of the fourteen object balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Blue,
    Red,
}

impl Group {
    pub fn other(self) -> Group {
        match self {
            Group::Blue => Group::Red,
            Group::Red => Group::Blue,
        }
    }

    /// Numeric code used on the wire: 0 = unassigned, 1 = blue, 2 = red.
    pub fn wire_code(group: Option<Group>) -> f32 {
        match group {
            None => 0.0,
            Some(Group::Blue) => 1.0,
            Some(Group::Red) => 2.0,
        }
    }
}

/// What a ball is for the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallRole {
    Cue,
    Black,
    Object(Group),
}

impl BallRole {
    pub fn is_cue(self) -> bool {
        self == BallRole::Cue
    }

    pub fn is_black(self) -> bool {
        self == BallRole::Black
    }

    pub fn group(self) -> Option<Group> {
        match self {
            BallRole::Object(group) => Some(group),
            _ => None,
        }
    }

    /// Numeric code used on the wire: 0 = cue, 1 = black, 2 = blue, 3 = red.
    pub fn wire_code(self) -> f32 {
        match self {
            BallRole::Cue => 0.0,
            BallRole::Black => 1.0,
            BallRole::Object(Group::Blue) => 2.0,
            BallRole::Object(Group::Red) => 3.0,
        }
    }
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// The shooter cleared their group and then sank the black.
    ClearedGroup,
    /// The black went down early; the shooter's opponent takes the match.
    EarlyBlack,
}

/// A sound cue for the host's audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    pub const CUE_STRIKE: SoundEvent = SoundEvent(1);
    pub const BALL_CLICK: SoundEvent = SoundEvent(2);
    pub const CUSHION: SoundEvent = SoundEvent(3);
    pub const POCKET: SoundEvent = SoundEvent(4);
}

/// Wire kinds for [`GameEvent`].
pub mod event_kind {
    pub const SHOT_TAKEN: f32 = 1.0;
    pub const BALL_POCKETED: f32 = 2.0;
    pub const CUE_FOUL: f32 = 3.0;
    pub const CUE_RESPOTTED: f32 = 4.0;
    pub const GROUPS_ASSIGNED: f32 = 5.0;
    pub const TURN_PASSED: f32 = 6.0;
    pub const TURN_RETAINED: f32 = 7.0;
    pub const GAME_OVER: f32 = 8.0;
}

/// Something the rules or the shot controller decided during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    ShotTaken { player: PlayerId, angle: f64, power: f64 },
    BallPocketed { ball: BallId, role: BallRole, pocket: usize, player: PlayerId },
    CueFoul { player: PlayerId },
    CueRespotted,
    GroupsAssigned { player: PlayerId, group: Group },
    TurnPassed { to: PlayerId },
    TurnRetained { player: PlayerId },
    GameOver { winner: PlayerId, reason: WinReason },
}

impl MatchEvent {
    /// Flatten into the fixed 4-float wire record.
    pub fn to_wire(&self) -> GameEvent {
        let (kind, a, b, c) = match *self {
            MatchEvent::ShotTaken { player, angle, power } => {
                (event_kind::SHOT_TAKEN, player.0 as f32, angle as f32, power as f32)
            }
            MatchEvent::BallPocketed { ball, role, pocket, .. } => {
                (event_kind::BALL_POCKETED, ball.0 as f32, role.wire_code(), pocket as f32)
            }
            MatchEvent::CueFoul { player } => (event_kind::CUE_FOUL, player.0 as f32, 0.0, 0.0),
            MatchEvent::CueRespotted => (event_kind::CUE_RESPOTTED, 0.0, 0.0, 0.0),
            MatchEvent::GroupsAssigned { player, group } => {
                (event_kind::GROUPS_ASSIGNED, player.0 as f32, Group::wire_code(Some(group)), 0.0)
            }
            MatchEvent::TurnPassed { to } => (event_kind::TURN_PASSED, to.0 as f32, 0.0, 0.0),
            MatchEvent::TurnRetained { player } => {
                (event_kind::TURN_RETAINED, player.0 as f32, 0.0, 0.0)
            }
            MatchEvent::GameOver { winner, reason } => {
                let reason = match reason {
                    WinReason::ClearedGroup => 0.0,
                    WinReason::EarlyBlack => 1.0,
                };
                (event_kind::GAME_OVER, winner.0 as f32, reason, 0.0)
            }
        };
        GameEvent { kind, a, b, c }
    }
}

/// A game event as the host reads it from the shared buffer.
/// `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_alternate() {
        assert_eq!(PlayerId::ONE.other(), PlayerId::TWO);
        assert_eq!(PlayerId::TWO.other(), PlayerId::ONE);
        assert_eq!(PlayerId::TWO.slot(), 1);
    }

    #[test]
    fn pocket_event_wire_form() {
        let ev = MatchEvent::BallPocketed {
            ball: BallId(9),
            role: BallRole::Object(Group::Red),
            pocket: 4,
            player: PlayerId::ONE,
        };
        let wire = ev.to_wire();
        assert_eq!(wire.kind, event_kind::BALL_POCKETED);
        assert_eq!(wire.a, 9.0);
        assert_eq!(wire.b, 3.0);
        assert_eq!(wire.c, 4.0);
    }

    #[test]
    fn game_event_is_16_bytes() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
    }

    #[test]
    fn match_event_json_is_tagged() {
        let json = serde_json::to_string(&MatchEvent::TurnPassed { to: PlayerId::TWO }).unwrap();
        assert_eq!(json, r#"{"type":"turn_passed","to":2}"#);
    }
}
