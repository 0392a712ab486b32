use std::collections::BTreeSet;

use serde::Serialize;

use crate::api::config::RulesConfig;
use crate::api::types::{BallId, BallRole, Group, MatchEvent, PlayerId, WinReason};
use crate::core::balls::group_size;

/// Where the match is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Something on the table is still moving.
    WaitingForRest,
    /// The last shot has been judged; the table is ready.
    TurnResolved,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub group: Option<Group>,
    /// Balls of this player's group that have gone down, whoever sank them.
    pub pocketed_balls: BTreeSet<BallId>,
    pub fouls: u32,
    pub shots: u32,
}

impl Player {
    fn new(id: PlayerId) -> Self {
        Self {
            id,
            group: None,
            pocketed_balls: BTreeSet::new(),
            fouls: 0,
            shots: 0,
        }
    }

    /// Every ball of the player's group is down.
    pub fn has_cleared_group(&self) -> bool {
        match self.group {
            Some(group) => self.pocketed_balls.len() >= group_size(group),
            None => false,
        }
    }
}

/// Turn, group and win bookkeeping for one match.
#[derive(Debug, Clone)]
pub struct MatchState {
    config: RulesConfig,
    players: [Player; 2],
    current: PlayerId,
    first_group_assigned: bool,
    phase: Phase,
    winner: Option<PlayerId>,
    win_reason: Option<WinReason>,
    /// Shooter's own-group count when the last turn was judged.
    last_pocketed_count: usize,
    awaiting_settle: bool,
    /// The cue went down since the last judgement.
    shot_fouled: bool,
}

impl MatchState {
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            players: [Player::new(PlayerId::ONE), Player::new(PlayerId::TWO)],
            current: PlayerId::ONE,
            first_group_assigned: false,
            phase: Phase::TurnResolved,
            winner: None,
            win_reason: None,
            last_pocketed_count: 0,
            awaiting_settle: false,
            shot_fouled: false,
        }
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.slot()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn groups_assigned(&self) -> bool {
        self.first_group_assigned
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn win_reason(&self) -> Option<WinReason> {
        self.win_reason
    }

    pub fn is_awaiting_settle(&self) -> bool {
        self.awaiting_settle
    }

    fn owner_of(&self, group: Group) -> Option<PlayerId> {
        self.players.iter().find(|p| p.group == Some(group)).map(|p| p.id)
    }

    pub fn on_shot(&mut self, angle: f64, power: f64, events: &mut Vec<MatchEvent>) {
        if self.is_game_over() {
            return;
        }
        self.players[self.current.slot()].shots += 1;
        events.push(MatchEvent::ShotTaken { player: self.current, angle, power });
    }

    /// React to a ball dropping. Returns true when the cue needs a respot.
    pub fn on_pocketed(
        &mut self,
        ball: BallId,
        role: BallRole,
        pocket: usize,
        events: &mut Vec<MatchEvent>,
    ) -> bool {
        if self.is_game_over() {
            return false;
        }
        let shooter = self.current;
        events.push(MatchEvent::BallPocketed { ball, role, pocket, player: shooter });

        match role {
            BallRole::Cue => {
                self.players[shooter.slot()].fouls += 1;
                self.shot_fouled = true;
                events.push(MatchEvent::CueFoul { player: shooter });
                log::debug!("player {} scratched", shooter.0);
                true
            }
            BallRole::Black => {
                let (winner, reason) = if self.player(shooter).has_cleared_group() {
                    (shooter, WinReason::ClearedGroup)
                } else {
                    (shooter.other(), WinReason::EarlyBlack)
                };
                self.phase = Phase::GameOver;
                self.winner = Some(winner);
                self.win_reason = Some(reason);
                self.awaiting_settle = false;
                events.push(MatchEvent::GameOver { winner, reason });
                log::info!("game over: player {} wins ({:?})", winner.0, reason);
                false
            }
            BallRole::Object(group) => {
                if !self.first_group_assigned {
                    self.first_group_assigned = true;
                    self.players[shooter.slot()].group = Some(group);
                    self.players[shooter.other().slot()].group = Some(group.other());
                    events.push(MatchEvent::GroupsAssigned { player: shooter, group });
                    log::info!("player {} takes {:?}", shooter.0, group);
                }
                if let Some(owner) = self.owner_of(group) {
                    self.players[owner.slot()].pocketed_balls.insert(ball);
                }
                false
            }
        }
    }

    /// Called once per tick after physics. Judges the turn the first time the
    /// table comes to rest after movement.
    pub fn on_settle_check(&mut self, settled: bool, events: &mut Vec<MatchEvent>) {
        if self.is_game_over() {
            return;
        }
        if !settled {
            self.awaiting_settle = true;
            self.phase = Phase::WaitingForRest;
            return;
        }
        if !self.awaiting_settle {
            return;
        }
        self.awaiting_settle = false;

        let count = self.player(self.current).pocketed_balls.len();
        let fouled = self.config.foul_passes_turn && self.shot_fouled;
        if count > self.last_pocketed_count && !fouled {
            events.push(MatchEvent::TurnRetained { player: self.current });
            log::debug!("player {} stays at the table", self.current.0);
        } else {
            self.current = self.current.other();
            events.push(MatchEvent::TurnPassed { to: self.current });
            log::debug!("turn passes to player {}", self.current.0);
        }
        self.last_pocketed_count = self.player(self.current).pocketed_balls.len();
        self.shot_fouled = false;
        self.phase = Phase::TurnResolved;
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue(n: u8) -> (BallId, BallRole) {
        (BallId(n), BallRole::Object(Group::Blue))
    }

    fn red(n: u8) -> (BallId, BallRole) {
        (BallId(n), BallRole::Object(Group::Red))
    }

    /// Simulate one shot: movement, the given pockets, then rest.
    fn shot(state: &mut MatchState, pots: &[(BallId, BallRole)]) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        state.on_shot(0.0, 0.3, &mut events);
        state.on_settle_check(false, &mut events);
        for &(ball, role) in pots {
            state.on_pocketed(ball, role, 0, &mut events);
        }
        state.on_settle_check(true, &mut events);
        events
    }

    #[test]
    fn empty_shot_passes_turn_once() {
        let mut state = MatchState::default();
        let events = shot(&mut state, &[]);
        assert_eq!(state.current_player(), PlayerId::TWO);
        assert_eq!(events.iter().filter(|e| matches!(e, MatchEvent::TurnPassed { .. })).count(), 1);
        // Further rest ticks don't flip it back.
        let mut more = Vec::new();
        state.on_settle_check(true, &mut more);
        state.on_settle_check(true, &mut more);
        assert!(more.is_empty());
        assert_eq!(state.current_player(), PlayerId::TWO);
        assert_eq!(state.phase(), Phase::TurnResolved);
    }

    #[test]
    fn first_pot_assigns_groups_and_keeps_turn() {
        let mut state = MatchState::default();
        let events = shot(&mut state, &[red(11)]);
        assert_eq!(state.player(PlayerId::ONE).group, Some(Group::Red));
        assert_eq!(state.player(PlayerId::TWO).group, Some(Group::Blue));
        assert!(events.contains(&MatchEvent::GroupsAssigned { player: PlayerId::ONE, group: Group::Red }));
        assert!(events.contains(&MatchEvent::TurnRetained { player: PlayerId::ONE }));
        assert_eq!(state.current_player(), PlayerId::ONE);
    }

    #[test]
    fn potting_opponent_ball_passes_turn_and_scores_for_them() {
        let mut state = MatchState::default();
        shot(&mut state, &[red(11)]);
        shot(&mut state, &[blue(2)]);
        assert_eq!(state.current_player(), PlayerId::TWO);
        assert!(state.player(PlayerId::TWO).pocketed_balls.contains(&BallId(2)));
        assert!(state.player(PlayerId::ONE).pocketed_balls.contains(&BallId(11)));
    }

    #[test]
    fn second_player_must_pot_own_ball_to_stay() {
        let mut state = MatchState::default();
        shot(&mut state, &[red(11)]);
        shot(&mut state, &[]);
        assert_eq!(state.current_player(), PlayerId::TWO);
        shot(&mut state, &[blue(3)]);
        assert_eq!(state.current_player(), PlayerId::TWO);
        shot(&mut state, &[red(12)]);
        assert_eq!(state.current_player(), PlayerId::ONE);
    }

    #[test]
    fn early_black_loses() {
        let mut state = MatchState::default();
        let events = shot(&mut state, &[(BallId(5), BallRole::Black)]);
        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(PlayerId::TWO));
        assert_eq!(state.win_reason(), Some(WinReason::EarlyBlack));
        assert!(!events.iter().any(|e| matches!(e, MatchEvent::TurnPassed { .. })));
    }

    #[test]
    fn black_after_clearing_wins() {
        let mut state = MatchState::default();
        let reds: Vec<_> = (9..16).map(red).collect();
        shot(&mut state, &reds);
        assert!(state.player(PlayerId::ONE).has_cleared_group());
        shot(&mut state, &[(BallId(5), BallRole::Black)]);
        assert_eq!(state.winner(), Some(PlayerId::ONE));
        assert_eq!(state.win_reason(), Some(WinReason::ClearedGroup));
    }

    #[test]
    fn nothing_changes_after_game_over() {
        let mut state = MatchState::default();
        shot(&mut state, &[(BallId(5), BallRole::Black)]);
        let events = shot(&mut state, &[red(9), (BallId::CUE, BallRole::Cue)]);
        assert!(events.is_empty());
        assert!(!state.groups_assigned());
        assert_eq!(state.player(PlayerId::ONE).fouls, 0);
    }

    #[test]
    fn scratch_counts_foul_and_requests_respot() {
        let mut state = MatchState::default();
        let mut events = Vec::new();
        assert!(state.on_pocketed(BallId::CUE, BallRole::Cue, 2, &mut events));
        assert_eq!(state.player(PlayerId::ONE).fouls, 1);
        assert!(events.contains(&MatchEvent::CueFoul { player: PlayerId::ONE }));
    }

    #[test]
    fn scratch_with_own_pot_keeps_turn_by_default() {
        let mut state = MatchState::default();
        shot(&mut state, &[blue(1), (BallId::CUE, BallRole::Cue)]);
        assert_eq!(state.current_player(), PlayerId::ONE);
    }

    #[test]
    fn foul_passes_turn_option() {
        let mut state = MatchState::new(RulesConfig { foul_passes_turn: true, ..RulesConfig::default() });
        shot(&mut state, &[blue(1), (BallId::CUE, BallRole::Cue)]);
        assert_eq!(state.current_player(), PlayerId::TWO);
    }
}
