use crate::api::types::BallId;

/// Custom-event kinds the host sends over the flat `(kind, a, b, c)` channel.
pub mod input_kind {
    pub const BEGIN_SHOT: u32 = 1;
    pub const RELEASE_SHOT: u32 = 2;
    pub const CANCEL_SHOT: u32 = 3;
    /// `a` = angle delta in radians.
    pub const ADJUST_AIM: u32 = 4;
    /// `a` = direction (negative = left, positive = right).
    pub const STEP_AIM: u32 = 5;
    /// `a` = angle, `b` = power.
    pub const SHOOT: u32 = 6;
    pub const RESET: u32 = 7;
    /// `a` = ball id, `b` = x, `c` = z.
    pub const PLACE_BALL: u32 = 8;
}

/// Player and setup commands the engine understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    BeginShot,
    ReleaseShot,
    CancelShot,
    AdjustAim { delta: f64 },
    /// One configured aim step; sign picks the direction.
    StepAim { direction: f64 },
    Shoot { angle: f64, power: f64 },
    Reset,
    PlaceBall { ball: BallId, x: f64, z: f64 },
}

impl InputEvent {
    /// Decode the host's flat form. Unknown kinds are `None`.
    pub fn from_custom(kind: u32, a: f32, b: f32, c: f32) -> Option<Self> {
        use input_kind::*;
        let event = match kind {
            BEGIN_SHOT => InputEvent::BeginShot,
            RELEASE_SHOT => InputEvent::ReleaseShot,
            CANCEL_SHOT => InputEvent::CancelShot,
            ADJUST_AIM => InputEvent::AdjustAim { delta: a as f64 },
            STEP_AIM => InputEvent::StepAim { direction: a as f64 },
            SHOOT => InputEvent::Shoot { angle: a as f64, power: b as f64 },
            RESET => InputEvent::Reset,
            PLACE_BALL => {
                if !(0.0..256.0).contains(&a) {
                    return None;
                }
                InputEvent::PlaceBall { ball: BallId(a as u8), x: b as f64, z: c as f64 }
            }
            _ => return None,
        };
        Some(event)
    }
}

/// A queue of input events.
/// The host pushes between frames; the engine drains before ticking.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::BeginShot);
        q.push(InputEvent::AdjustAim { delta: 0.1 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events, vec![InputEvent::BeginShot, InputEvent::AdjustAim { delta: 0.1 }]);
        assert!(q.is_empty());
    }

    #[test]
    fn decodes_custom_events() {
        assert_eq!(
            InputEvent::from_custom(input_kind::SHOOT, 0.5, 0.25, 0.0),
            Some(InputEvent::Shoot { angle: 0.5, power: 0.25 })
        );
        assert_eq!(
            InputEvent::from_custom(input_kind::PLACE_BALL, 9.0, 1.0, -2.0),
            Some(InputEvent::PlaceBall { ball: BallId(9), x: 1.0, z: -2.0 })
        );
        assert_eq!(InputEvent::from_custom(input_kind::PLACE_BALL, -1.0, 0.0, 0.0), None);
        assert_eq!(InputEvent::from_custom(99, 0.0, 0.0, 0.0), None);
    }
}
