use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rejected configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },

    #[error("table bounds on the {axis} axis leave no room for a ball")]
    InvertedBounds { axis: &'static str },

    #[error("corner pocket radius {corner} must be larger than side pocket radius {side}")]
    PocketSizes { corner: f64, side: f64 },

    #[error("{what} at ({x}, {z}) is outside the cushions")]
    OffTable { what: &'static str, x: f64, z: f64 },
}

/// Table geometry. Pockets sit on the four corners and the midpoints of the
/// two long (x = min / x = max) sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub corner_pocket_radius: f64,
    pub side_pocket_radius: f64,
    /// Render height of the pocket discs.
    pub pocket_height: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_x: -1.5,
            max_x: 1.5,
            min_z: -3.0,
            max_z: 3.0,
            corner_pocket_radius: 0.17,
            side_pocket_radius: 0.15,
            pocket_height: 0.57,
        }
    }
}

/// Per-tick integration constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub ball_radius: f64,
    /// Velocity multiplier applied every tick.
    pub friction: f64,
    /// Velocity components below this snap to zero.
    pub rest_epsilon: f64,
    /// Fraction of normal velocity kept after a cushion bounce.
    pub cushion_restitution: f64,
    /// Coefficient of restitution between two balls.
    pub ball_restitution: f64,
    /// Render height of a ball resting on the cloth.
    pub table_height: f64,
    /// Render height that marks a ball as off the table.
    pub pocketed_height: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_radius: 0.09,
            friction: 0.98,
            rest_epsilon: 0.001,
            cushion_restitution: 0.8,
            ball_restitution: 0.8,
            table_height: 0.67,
            pocketed_height: -1.0,
        }
    }
}

/// Cue charging and aiming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    /// Power gained per second of charging.
    pub charge_rate: f64,
    pub max_power: f64,
    /// Fraction of the remaining aim error closed each tick.
    pub aim_lerp: f64,
    /// Angle step for one "aim left/right" key press on the host.
    pub aim_step: f64,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            charge_rate: 0.2,
            max_power: 0.5,
            aim_lerp: 0.13,
            aim_step: 0.037,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Delay before a pocketed cue ball comes back.
    pub respot_delay_seconds: f64,
    /// When set, pocketing the cue always hands the table over.
    pub foul_passes_turn: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            respot_delay_seconds: 0.5,
            foul_passes_turn: false,
        }
    }
}

/// Starting layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RackConfig {
    /// Cue ball home, also the respot.
    pub cue_spot: DVec2,
    /// Centre of the apex ball; rows grow toward +z.
    pub apex: DVec2,
    /// Clearance between neighbouring racked balls.
    pub gap: f64,
}

impl Default for RackConfig {
    fn default() -> Self {
        Self {
            cue_spot: DVec2::new(0.0, -1.0),
            apex: DVec2::new(0.0, 1.0),
            gap: 0.001,
        }
    }
}

/// Everything the engine needs to set up a table and play a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulation seconds per tick (default: 1/60).
    pub tick_seconds: f64,
    pub table: TableConfig,
    pub physics: PhysicsConfig,
    pub shot: ShotConfig,
    pub rules: RulesConfig,
    pub rack: RackConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 60.0,
            table: TableConfig::default(),
            physics: PhysicsConfig::default(),
            shot: ShotConfig::default(),
            rules: RulesConfig::default(),
            rack: RackConfig::default(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}

impl EngineConfig {
    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ticks between a cue foul and the respot (at least one).
    pub fn respot_delay_ticks(&self) -> u64 {
        let ticks = (self.rules.respot_delay_seconds / self.tick_seconds).round();
        if ticks >= 1.0 { ticks as u64 } else { 1 }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("tick_seconds", self.tick_seconds, 1e-4, 1.0)?;

        let physics = &self.physics;
        positive("physics.ball_radius", physics.ball_radius)?;
        positive("physics.rest_epsilon", physics.rest_epsilon)?;
        // Friction of exactly 1 would never bring a ball to rest.
        in_range("physics.friction", physics.friction, 0.0, 1.0 - f64::EPSILON)?;
        in_range("physics.cushion_restitution", physics.cushion_restitution, 0.0, 1.0)?;
        in_range("physics.ball_restitution", physics.ball_restitution, 0.0, 1.0)?;

        let table = &self.table;
        let r = physics.ball_radius;
        if table.max_x - table.min_x <= 2.0 * r {
            return Err(ConfigError::InvertedBounds { axis: "x" });
        }
        if table.max_z - table.min_z <= 2.0 * r {
            return Err(ConfigError::InvertedBounds { axis: "z" });
        }
        positive("table.corner_pocket_radius", table.corner_pocket_radius)?;
        positive("table.side_pocket_radius", table.side_pocket_radius)?;
        if table.corner_pocket_radius <= table.side_pocket_radius {
            return Err(ConfigError::PocketSizes {
                corner: table.corner_pocket_radius,
                side: table.side_pocket_radius,
            });
        }

        let shot = &self.shot;
        positive("shot.charge_rate", shot.charge_rate)?;
        positive("shot.max_power", shot.max_power)?;
        in_range("shot.aim_lerp", shot.aim_lerp, f64::MIN_POSITIVE, 1.0)?;
        in_range("shot.aim_step", shot.aim_step, 0.0, std::f64::consts::PI)?;

        in_range("rules.respot_delay_seconds", self.rules.respot_delay_seconds, 0.0, 60.0)?;

        // DVec2.y carries the table z coordinate.
        let on_cloth = |p: DVec2| {
            p.x >= table.min_x + r
                && p.x <= table.max_x - r
                && p.y >= table.min_z + r
                && p.y <= table.max_z - r
        };
        let cue = self.rack.cue_spot;
        if !on_cloth(cue) {
            return Err(ConfigError::OffTable { what: "cue spot", x: cue.x, z: cue.y });
        }
        in_range("rack.gap", self.rack.gap, 0.0, r)?;
        for pos in crate::core::balls::rack_positions(self.rack.apex, r, self.rack.gap) {
            if !on_cloth(pos) {
                return Err(ConfigError::OffTable { what: "racked ball", x: pos.x, z: pos.y });
            }
        }
        Ok(())
    }
}
