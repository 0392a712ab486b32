use glam::DVec2;
use serde::Serialize;

use crate::api::config::TableConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PocketKind {
    Corner,
    Side,
}

/// A capture disc on the table plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pocket {
    pub pos: DVec2,
    pub radius: f64,
    pub kind: PocketKind,
}

impl Pocket {
    /// Strictly inside the capture radius.
    #[inline]
    pub fn captures(&self, pos: DVec2) -> bool {
        self.pos.distance(pos) < self.radius
    }
}

/// Axis-aligned playing surface with six pockets.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub min: DVec2,
    pub max: DVec2,
    pockets: [Pocket; 6],
}

impl Table {
    pub fn from_config(config: &TableConfig) -> Self {
        let corner = |x, z| Pocket {
            pos: DVec2::new(x, z),
            radius: config.corner_pocket_radius,
            kind: PocketKind::Corner,
        };
        let side = |x| Pocket {
            pos: DVec2::new(x, (config.min_z + config.max_z) * 0.5),
            radius: config.side_pocket_radius,
            kind: PocketKind::Side,
        };
        Self {
            min: DVec2::new(config.min_x, config.min_z),
            max: DVec2::new(config.max_x, config.max_z),
            pockets: [
                corner(config.min_x, config.min_z),
                corner(config.max_x, config.min_z),
                corner(config.min_x, config.max_z),
                corner(config.max_x, config.max_z),
                side(config.min_x),
                side(config.max_x),
            ],
        }
    }

    pub fn pockets(&self) -> &[Pocket; 6] {
        &self.pockets
    }

    /// Index of the first pocket that captures `pos`.
    pub fn pocket_at(&self, pos: DVec2) -> Option<usize> {
        self.pockets.iter().position(|p| p.captures(pos))
    }

    /// Lowest and highest legal centre positions for a ball of `radius`.
    #[inline]
    pub fn cushion_bounds(&self, radius: f64) -> (DVec2, DVec2) {
        (self.min + DVec2::splat(radius), self.max - DVec2::splat(radius))
    }

    pub fn contains(&self, pos: DVec2, radius: f64) -> bool {
        let (lo, hi) = self.cushion_bounds(radius);
        pos.x >= lo.x && pos.x <= hi.x && pos.y >= lo.y && pos.y <= hi.y
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}
