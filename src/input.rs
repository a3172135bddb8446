//! Per-tick input snapshot polled from the host.
use glam::Vec2;

/// Everything the character reads from input during one tick.
///
/// Buttons are edge flags for this tick only; nothing is buffered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag mirrors one independent input binding."
)]
pub struct InputFrame {
    /// Strafe on `x`, forward on `y`, each in `[-1, 1]`.
    pub move_axis: Vec2,
    /// Mouse movement since the last tick.
    pub look_delta: Vec2,
    /// Run modifier is held.
    pub run_held: bool,
    /// Crouch was pressed this tick.
    pub crouch_pressed: bool,
    /// Jump was pressed this tick.
    pub jump_pressed: bool,
    /// Flashlight toggle was pressed this tick.
    pub flashlight_pressed: bool,
    /// Interact was pressed this tick.
    pub interact_pressed: bool,
}

impl InputFrame {
    /// Frame moving forward at full deflection.
    #[must_use]
    pub fn forward() -> Self {
        Self {
            move_axis: Vec2::Y,
            ..Self::default()
        }
    }

    /// Same frame with run held.
    #[must_use]
    pub const fn running(mut self) -> Self {
        self.run_held = true;
        self
    }

    /// Drops the per-tick edges, keeping held state.
    ///
    /// Hosts that run several fixed ticks per polled frame call this after
    /// the first tick so a press is seen once.
    pub fn clear_edges(&mut self) {
        *self = Self {
            move_axis: self.move_axis,
            run_held: self.run_held,
            ..Self::default()
        };
    }

    /// Movement magnitude, clamped to 1 so diagonals are not faster.
    #[must_use]
    pub fn move_magnitude(&self) -> f32 {
        self.move_axis.length().min(1.0)
    }
}
