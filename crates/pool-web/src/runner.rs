use pool_engine::{
    Engine, EngineConfig, FixedTimestep, GameEvent, InputEvent, InputQueue, MatchEvent,
    ProtocolLayout, SoundEvent,
};

/// Drives one [`Engine`] from the browser's animation frames.
///
/// Concrete exports (e.g. `eight-ball`) keep a `thread_local!` MatchRunner
/// and expose free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export the engine's borrowing API directly.
pub struct MatchRunner {
    engine: Engine,
    input: InputQueue,
    timestep: FixedTimestep,
    layout: ProtocolLayout,
    /// Shared frame buffer; see `pool_engine::bridge::protocol`.
    frame: Vec<f32>,
    /// Per-frame outputs, kept until the next tick for host reads.
    sounds: Vec<SoundEvent>,
    events: Vec<MatchEvent>,
    wire_events: Vec<GameEvent>,
}

impl MatchRunner {
    pub fn new(engine: Engine) -> Self {
        let timestep = FixedTimestep::new(engine.config().tick_seconds);
        let layout = ProtocolLayout::default();
        let frame = layout.allocate();
        let mut runner = Self {
            engine,
            input: InputQueue::new(),
            timestep,
            layout,
            frame,
            sounds: Vec::new(),
            events: Vec::new(),
            wire_events: Vec::new(),
        };
        runner.pack();
        runner
    }

    /// Replace the engine with one built from `json`. A rejected config is
    /// logged and the current match keeps running.
    pub fn load_config(&mut self, json: &str) -> bool {
        match Engine::from_json(json) {
            Ok(engine) => {
                self.timestep = FixedTimestep::new(engine.config().tick_seconds);
                self.engine = engine;
                self.input.drain();
                self.pack();
                log::info!("config loaded");
                true
            }
            Err(err) => {
                log::warn!("config rejected, keeping current: {}", err);
                false
            }
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Queue a host event in the flat `(kind, a, b, c)` form.
    pub fn push_custom(&mut self, kind: u32, a: f32, b: f32, c: f32) {
        match InputEvent::from_custom(kind, a, b, c) {
            Some(event) => self.input.push(event),
            None => log::warn!("unknown input kind {}", kind),
        }
    }

    /// Apply queued input, run however many fixed ticks `dt` covers, and pack
    /// the frame.
    pub fn tick(&mut self, dt: f32) {
        let inputs = self.input.drain();
        self.engine.apply_all(inputs);

        let steps = self.timestep.accumulate(dt as f64);
        for _ in 0..steps {
            self.engine.tick();
        }
        self.pack();
    }

    fn pack(&mut self) {
        self.sounds = self.engine.drain_sounds();
        self.events = self.engine.drain_events();
        self.wire_events.clear();
        self.wire_events.extend(self.events.iter().map(MatchEvent::to_wire));
        if !self
            .layout
            .write_frame(&mut self.frame, &self.engine, &self.sounds, &self.events)
        {
            log::warn!("frame buffer smaller than layout");
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    // ---- Frame accessors ----

    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn max_balls(&self) -> u32 {
        self.layout.max_balls as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.wire_events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.wire_events.len() as u32
    }

    pub fn can_shoot(&self) -> bool {
        self.engine.can_shoot()
    }

    /// Snapshot of the current match as JSON, or `"{}"` if it can't be
    /// serialised.
    pub fn snapshot_json(&self) -> String {
        match self.engine.snapshot().to_json() {
            Ok(json) => json,
            Err(err) => {
                log::warn!("snapshot serialisation failed: {}", err);
                "{}".to_string()
            }
        }
    }

    /// The last frame's match events as a JSON array.
    pub fn events_json(&self) -> String {
        serde_json::to_string(&self.events).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn config_json(&self) -> String {
        self.engine
            .config()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new(Engine::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_engine::bridge::protocol::{
        HEADER_BALL_COUNT, HEADER_CAN_SHOOT, HEADER_CURRENT_PLAYER, HEADER_EVENT_COUNT,
        HEADER_SOUND_COUNT,
    };
    use pool_engine::input::queue::input_kind;

    #[test]
    fn fresh_runner_has_packed_frame() {
        let runner = MatchRunner::default();
        let frame = runner.frame();
        assert_eq!(frame.len(), runner.buffer_total_floats() as usize);
        assert_eq!(frame[HEADER_BALL_COUNT], 16.0);
        assert_eq!(frame[HEADER_CAN_SHOOT], 1.0);
    }

    #[test]
    fn input_waits_for_next_frame() {
        let mut runner = MatchRunner::default();
        runner.push_custom(input_kind::SHOOT, 0.0, 0.3, 0.0);
        assert!(runner.can_shoot());
        runner.tick(1.0 / 60.0);
        assert!(!runner.can_shoot());
        assert_eq!(runner.frame()[HEADER_SOUND_COUNT], 1.0);
        assert_eq!(runner.sounds(), &[SoundEvent::CUE_STRIKE]);
        assert_eq!(runner.game_events_len(), 1);
        assert_eq!(runner.frame()[HEADER_EVENT_COUNT], 1.0);
    }

    #[test]
    fn short_frame_runs_no_ticks() {
        let mut runner = MatchRunner::default();
        runner.tick(0.001);
        assert_eq!(runner.engine().clock().tick(), 0);
        runner.tick(0.02);
        assert_eq!(runner.engine().clock().tick(), 1);
    }

    #[test]
    fn bad_config_keeps_current_match() {
        let mut runner = MatchRunner::default();
        runner.tick(1.0 / 60.0);
        assert!(!runner.load_config(r#"{ "physics": { "friction": 2.0 } }"#));
        assert_eq!(runner.engine().clock().tick(), 1);
        assert!(runner.load_config(r#"{ "rules": { "foul_passes_turn": true } }"#));
        assert!(runner.engine().config().rules.foul_passes_turn);
        assert_eq!(runner.engine().clock().tick(), 0);
    }

    #[test]
    fn missed_shot_reaches_frame_header() {
        let mut runner = MatchRunner::default();
        runner.push_input(InputEvent::Shoot { angle: std::f64::consts::PI, power: 0.05 });
        for _ in 0..400 {
            runner.tick(1.0 / 60.0);
        }
        assert_eq!(runner.frame()[HEADER_CURRENT_PLAYER], 2.0);
        let snapshot: serde_json::Value = serde_json::from_str(&runner.snapshot_json()).unwrap();
        assert_eq!(snapshot["current_player"], 2);
    }

    #[test]
    fn unknown_custom_kind_is_dropped() {
        let mut runner = MatchRunner::default();
        runner.push_custom(999, 0.0, 0.0, 0.0);
        runner.tick(1.0 / 60.0);
        assert!(runner.can_shoot());
    }
}
