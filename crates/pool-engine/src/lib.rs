pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{
    ConfigError, EngineConfig, PhysicsConfig, RackConfig, RulesConfig, ShotConfig, TableConfig,
};
pub use api::engine::Engine;
pub use api::snapshot::{BallSnapshot, MatchSnapshot, PlayerSnapshot};
pub use api::types::{
    BallId, BallRole, GameEvent, Group, MatchEvent, PlayerId, SoundEvent, WinReason,
};
pub use crate::core::balls::{Ball, BallRegistry, BALL_COUNT};
pub use crate::core::physics::{PhysicsEvent, PhysicsStepper};
pub use crate::core::table::{Pocket, PocketKind, Table};
pub use crate::core::time::{FixedTimestep, SimClock};
pub use systems::rules::{MatchState, Phase, Player};
pub use systems::shot::{ShotController, ShotState, Strike};
pub use renderer::instance::BallInstance;
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
