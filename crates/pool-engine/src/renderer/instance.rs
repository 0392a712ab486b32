use bytemuck::{Pod, Zeroable};

use crate::core::balls::Ball;

/// Per-ball render data written to the shared buffer for the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    /// Table-plane X.
    pub x: f32,
    /// Render height (-1 once pocketed).
    pub y: f32,
    /// Table-plane Z.
    pub z: f32,
    pub vx: f32,
    pub vz: f32,
    /// Ball id (0 = cue).
    pub id: f32,
    /// See `BallRole::wire_code`.
    pub role: f32,
    /// 1.0 when pocketed.
    pub pocketed: f32,
}

impl BallInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

impl From<&Ball> for BallInstance {
    fn from(ball: &Ball) -> Self {
        Self {
            x: ball.pos.x as f32,
            y: ball.height as f32,
            z: ball.pos.y as f32,
            vx: ball.vel.x as f32,
            vz: ball.vel.y as f32,
            id: ball.id.0 as f32,
            role: ball.role.wire_code(),
            pocketed: if ball.pocketed { 1.0 } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BallId;
    use glam::DVec2;

    #[test]
    fn stride_is_32_bytes() {
        assert_eq!(std::mem::size_of::<BallInstance>(), BallInstance::STRIDE_BYTES);
        assert_eq!(BallInstance::STRIDE_BYTES, 32);
    }

    #[test]
    fn from_ball_maps_plane_to_xz() {
        let mut ball = Ball::new(BallId(5), DVec2::new(0.25, -1.5), 0.67);
        ball.vel = DVec2::new(0.5, -0.25);
        let inst = BallInstance::from(&ball);
        assert_eq!(inst.x, 0.25);
        assert_eq!(inst.z, -1.5);
        assert_eq!(inst.vz, -0.25);
        assert_eq!(inst.role, 1.0);
        assert_eq!(inst.pocketed, 0.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&inst));
        assert_eq!(floats.len(), BallInstance::FLOATS);
        assert_eq!(floats[5], 5.0);
    }
}
