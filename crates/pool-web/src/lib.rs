pub mod runner;

pub use runner::MatchRunner;

// Re-exported for the generated bindings.
pub use js_sys;
pub use web_sys;

/// Generate all `#[wasm_bindgen]` exports for an 8-ball table.
///
/// Generates:
/// - `thread_local!` storage for the MatchRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (match_init, match_tick, shot inputs, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// pool_web::export_match!("eight-ball");
/// ```
///
/// The runner is created on first use, so a host that forgets `match_init()`
/// still gets a default table (without console logging).
#[macro_export]
macro_rules! export_match {
    ($match_name:literal) => {
        use std::cell::RefCell;
        use pool_engine::{BallId, InputEvent};

        thread_local! {
            static RUNNER: RefCell<Option<$crate::MatchRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::MatchRunner) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.get_or_insert_with($crate::MatchRunner::default);
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn match_init() {
            console_error_panic_hook::set_once();
            if console_log::init_with_level(log::Level::Info).is_err() {
                $crate::web_sys::console::warn_1(&"logger already installed".into());
            }
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some($crate::MatchRunner::default());
            });
            log::info!("{}: initialized", $match_name);
        }

        #[wasm_bindgen]
        pub fn match_load_config(json: &str) -> bool {
            with_runner(|r| r.load_config(json))
        }

        #[wasm_bindgen]
        pub fn match_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Inputs (applied at the start of the next tick) ----

        #[wasm_bindgen]
        pub fn match_begin_shot() {
            with_runner(|r| r.push_input(InputEvent::BeginShot));
        }

        #[wasm_bindgen]
        pub fn match_release_shot() {
            with_runner(|r| r.push_input(InputEvent::ReleaseShot));
        }

        #[wasm_bindgen]
        pub fn match_cancel_shot() {
            with_runner(|r| r.push_input(InputEvent::CancelShot));
        }

        #[wasm_bindgen]
        pub fn match_adjust_aim(delta: f64) {
            with_runner(|r| r.push_input(InputEvent::AdjustAim { delta }));
        }

        #[wasm_bindgen]
        pub fn match_step_aim(direction: f64) {
            with_runner(|r| r.push_input(InputEvent::StepAim { direction }));
        }

        #[wasm_bindgen]
        pub fn match_shoot(angle: f64, power: f64) {
            with_runner(|r| r.push_input(InputEvent::Shoot { angle, power }));
        }

        #[wasm_bindgen]
        pub fn match_reset() {
            with_runner(|r| r.push_input(InputEvent::Reset));
        }

        #[wasm_bindgen]
        pub fn match_place_ball(ball: u8, x: f64, z: f64) {
            with_runner(|r| r.push_input(InputEvent::PlaceBall { ball: BallId(ball), x, z }));
        }

        #[wasm_bindgen]
        pub fn match_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_custom(kind, a, b, c));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_ptr() -> *const f32 {
            with_runner(|r| r.frame_ptr())
        }

        /// Copy of the frame buffer for hosts without shared memory.
        #[wasm_bindgen]
        pub fn get_frame_copy() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.frame()))
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }

        #[wasm_bindgen]
        pub fn get_max_balls() -> u32 {
            with_runner(|r| r.max_balls())
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_can_shoot() -> bool {
            with_runner(|r| r.can_shoot())
        }

        #[wasm_bindgen]
        pub fn get_snapshot_json() -> String {
            with_runner(|r| r.snapshot_json())
        }

        #[wasm_bindgen]
        pub fn get_events_json() -> String {
            with_runner(|r| r.events_json())
        }

        #[wasm_bindgen]
        pub fn get_config_json() -> String {
            with_runner(|r| r.config_json())
        }
    };
}
