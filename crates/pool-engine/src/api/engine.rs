use glam::DVec2;

use crate::api::config::{ConfigError, EngineConfig};
use crate::api::snapshot::{BallSnapshot, MatchSnapshot, PlayerSnapshot};
use crate::api::types::{BallId, MatchEvent, SoundEvent};
use crate::core::balls::BallRegistry;
use crate::core::geometry::is_at_rest;
use crate::core::physics::{PhysicsEvent, PhysicsStepper};
use crate::core::table::Table;
use crate::core::time::SimClock;
use crate::input::queue::InputEvent;
use crate::systems::rules::MatchState;
use crate::systems::schedule::{Scheduled, Scheduler};
use crate::systems::shot::{ShotController, Strike};

/// One table, sixteen balls and a two-player match.
///
/// Inputs may arrive at any time between ticks. [`Engine::tick`] runs one
/// whole step (scheduled actions, aim and charge, physics, rules) so callers
/// never observe a half-finished tick. Match events and sounds accumulate
/// until drained.
pub struct Engine {
    config: EngineConfig,
    balls: BallRegistry,
    physics: PhysicsStepper,
    shot: ShotController,
    rules: MatchState,
    scheduler: Scheduler,
    clock: SimClock,
    physics_events: Vec<PhysicsEvent>,
    events: Vec<MatchEvent>,
    sounds: Vec<SoundEvent>,
}

impl Engine {
    /// Validate `config` and rack a new match.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Build from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        EngineConfig::from_json(json).map(Self::build)
    }

    fn build(config: EngineConfig) -> Self {
        let table = Table::from_config(&config.table);
        log::info!("new rack: {} balls", crate::core::balls::BALL_COUNT);
        Self {
            balls: BallRegistry::racked(&config),
            physics: PhysicsStepper::new(table, config.physics.clone()),
            shot: ShotController::new(config.shot.clone()),
            rules: MatchState::new(config.rules.clone()),
            scheduler: Scheduler::new(),
            clock: SimClock::default(),
            physics_events: Vec::with_capacity(32),
            events: Vec::new(),
            sounds: Vec::new(),
            config,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn balls(&self) -> &BallRegistry {
        &self.balls
    }

    pub fn table(&self) -> &Table {
        self.physics.table()
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    pub fn rules(&self) -> &MatchState {
        &self.rules
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    /// Match events since the last drain.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sound cues since the last drain.
    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    /// True when the match is live, every ball is at rest and the last shot
    /// has been judged.
    pub fn can_shoot(&self) -> bool {
        self.cue_ready()
            && !self.rules.is_awaiting_settle()
            && self.balls.all_settled(self.config.physics.rest_epsilon)
    }

    /// The cue is on the table and still. A charge already in progress only
    /// advances while this holds.
    fn cue_ready(&self) -> bool {
        let cue = self.balls.cue();
        !self.rules.is_game_over()
            && !cue.pocketed
            && is_at_rest(cue.vel, self.config.physics.rest_epsilon)
    }

    // -- Inputs -------------------------------------------------------------

    pub fn begin_shot(&mut self) {
        let shootable = self.can_shoot();
        self.shot.begin(shootable);
    }

    /// Strike with the charged power. Returns false if nothing happened.
    pub fn release_shot(&mut self) -> bool {
        let shootable = self.can_shoot();
        match self.shot.release(shootable) {
            Some(strike) => {
                self.apply_strike(strike);
                true
            }
            None => false,
        }
    }

    pub fn cancel_shot(&mut self) {
        self.shot.cancel();
    }

    pub fn adjust_aim(&mut self, delta: f64) {
        let shootable = self.can_shoot();
        self.shot.adjust_aim(delta, shootable);
    }

    pub fn step_aim(&mut self, direction: f64) {
        let shootable = self.can_shoot();
        self.shot.step_aim(direction, shootable);
    }

    /// Strike now at `angle` with `power` (clamped). Returns false if the cue
    /// can't be played.
    pub fn shoot(&mut self, angle: f64, power: f64) -> bool {
        let shootable = self.can_shoot();
        match self.shot.strike(angle, power, shootable) {
            Some(strike) => {
                self.apply_strike(strike);
                true
            }
            None => false,
        }
    }

    /// Re-rack and start a new match with the same configuration.
    pub fn reset(&mut self) {
        *self = Self::build(self.config.clone());
    }

    /// Put a ball at (x, z) at rest, clamped inside the cushions. Only balls
    /// still in play can be moved, plus a pocketed cue, which skips its
    /// respot. Returns false for an unknown or pocketed ball, a non-finite
    /// position, or a finished match.
    pub fn place_ball(&mut self, id: BallId, x: f64, z: f64) -> bool {
        if self.rules.is_game_over() || !x.is_finite() || !z.is_finite() {
            return false;
        }
        match self.balls.get(id) {
            Some(ball) if !ball.pocketed || id == BallId::CUE => {}
            _ => return false,
        }
        let (lo, hi) = self.table().cushion_bounds(self.balls.radius());
        let pos = DVec2::new(x, z).clamp(lo, hi);
        let height = self.config.physics.table_height;
        self.balls.place(id, pos, height);
        if id == BallId::CUE {
            self.scheduler.cancel(Scheduled::RespotCue);
        }
        true
    }

    pub fn apply(&mut self, input: InputEvent) {
        match input {
            InputEvent::BeginShot => self.begin_shot(),
            InputEvent::ReleaseShot => {
                self.release_shot();
            }
            InputEvent::CancelShot => self.cancel_shot(),
            InputEvent::AdjustAim { delta } => self.adjust_aim(delta),
            InputEvent::StepAim { direction } => self.step_aim(direction),
            InputEvent::Shoot { angle, power } => {
                self.shoot(angle, power);
            }
            InputEvent::Reset => self.reset(),
            InputEvent::PlaceBall { ball, x, z } => {
                self.place_ball(ball, x, z);
            }
        }
    }

    pub fn apply_all(&mut self, inputs: impl IntoIterator<Item = InputEvent>) {
        for input in inputs {
            self.apply(input);
        }
    }

    // -- Simulation ---------------------------------------------------------

    /// Advance one fixed tick.
    pub fn tick(&mut self) {
        let now = self.clock.advance();

        for action in self.scheduler.take_due(now) {
            match action {
                Scheduled::RespotCue => self.respot_cue(),
            }
        }

        let cue_ready = self.cue_ready();
        self.shot.tick(self.config.tick_seconds, cue_ready);

        let mut physics_events = std::mem::take(&mut self.physics_events);
        physics_events.clear();
        self.physics.step_into(&mut self.balls, &mut physics_events);

        for event in &physics_events {
            match *event {
                PhysicsEvent::Pocketed { ball, pocket } => {
                    self.sounds.push(SoundEvent::POCKET);
                    let Some(role) = self.balls.get(ball).map(|b| b.role) else {
                        continue;
                    };
                    let respot = self.rules.on_pocketed(ball, role, pocket, &mut self.events);
                    if respot && !self.scheduler.is_pending(Scheduled::RespotCue) {
                        let due = now.saturating_add(self.config.respot_delay_ticks());
                        self.scheduler.schedule(due, Scheduled::RespotCue);
                    }
                }
                PhysicsEvent::BallContact { .. } => self.sounds.push(SoundEvent::BALL_CLICK),
                PhysicsEvent::Cushion { .. } => self.sounds.push(SoundEvent::CUSHION),
            }
        }
        self.physics_events = physics_events;

        let settled = self.balls.all_settled(self.config.physics.rest_epsilon);
        self.rules.on_settle_check(settled, &mut self.events);
    }

    /// Tick until the table is at rest and the last shot has been judged.
    /// Returns the number of ticks run, or `None` if `max_ticks` ran out.
    pub fn run_until_settled(&mut self, max_ticks: u64) -> Option<u64> {
        for n in 1..=max_ticks {
            self.tick();
            let settled = self.balls.all_settled(self.config.physics.rest_epsilon);
            if settled && !self.rules.is_awaiting_settle() && self.scheduler.is_empty() {
                return Some(n);
            }
        }
        None
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let [p1, p2] = self.rules.players();
        MatchSnapshot {
            tick: self.clock.tick(),
            balls: self.balls.iter().map(BallSnapshot::from).collect(),
            aim: self.shot.aim(),
            power: self.shot.power(),
            shot_state: self.shot.state(),
            can_shoot: self.can_shoot(),
            current_player: self.rules.current_player(),
            players: [PlayerSnapshot::from(p1), PlayerSnapshot::from(p2)],
            groups_assigned: self.rules.groups_assigned(),
            phase: self.rules.phase(),
            game_over: self.rules.is_game_over(),
            winner: self.rules.winner(),
            win_reason: self.rules.win_reason(),
        }
    }

    // -- Internals ----------------------------------------------------------

    fn apply_strike(&mut self, strike: Strike) {
        self.balls.cue_mut().vel = strike.velocity;
        self.rules.on_shot(strike.angle, strike.power, &mut self.events);
        if strike.power > 0.0 {
            self.sounds.push(SoundEvent::CUE_STRIKE);
        }
        log::debug!(
            "player {} shoots: angle {:.3} power {:.3}",
            self.rules.current_player().0,
            strike.angle,
            strike.power
        );
    }

    /// The first free spot at or behind the cue spot along -z.
    fn respot_position(&self) -> DVec2 {
        let spot = self.config.rack.cue_spot;
        let step = self.balls.radius() * 2.0;
        let (lo, _) = self.table().cushion_bounds(self.balls.radius());
        let mut pos = spot;
        while self.balls.is_occupied(pos, BallId::CUE) {
            pos.y -= step;
            if pos.y < lo.y {
                return spot;
            }
        }
        pos
    }

    fn respot_cue(&mut self) {
        if self.rules.is_game_over() || !self.balls.cue().pocketed {
            return;
        }
        let pos = self.respot_position();
        let height = self.config.physics.table_height;
        self.balls.place(BallId::CUE, pos, height);
        self.events.push(MatchEvent::CueRespotted);
        log::info!("cue ball respotted at ({:.3}, {:.3})", pos.x, pos.y);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
