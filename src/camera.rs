//! First-person camera
//!
//! Mouse-look plus six directional move keys, with a walking bob.
//! Target and up vectors are derived from position and angles on demand.

use serde::{Deserialize, Serialize};
use crate::math::{Vec2, Vec3, DEG2RAD};

/// Tuning for the first-person controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Per-frame movement is `1 / move_divider` units per held key
    pub move_divider: f32,
    /// Radians of rotation per pixel of mouse travel
    pub mouse_sensitivity: f32,
    /// Distance from position to the look-at target
    pub focus_distance: f32,
    /// Pitch limit in degrees (applied symmetrically)
    pub pitch_clamp_deg: f32,
    /// Swing counter divisor for the vertical bob
    pub step_trig_divider: f32,
    /// Amplitude divisor for the vertical bob
    pub step_divider: f32,
    /// Amplitude divisor for the up-vector roll
    pub waving_divider: f32,
    /// Eye height above the floor
    pub eye_height: f32,
    /// Vertical field of view in degrees
    pub fovy: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_divider: 20.0,
            mouse_sensitivity: 0.003,
            focus_distance: 25.0,
            pitch_clamp_deg: 85.0,
            step_trig_divider: 5.0,
            step_divider: 30.0,
            waving_divider: 200.0,
            eye_height: 0.6,
            fovy: 60.0,
        }
    }
}

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub front: bool,
    pub back: bool,
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveKeys {
    pub fn any(&self) -> bool {
        self.front || self.back || self.right || self.left || self.up || self.down
    }
}

/// Everything the camera reads from input in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub moves: MoveKeys,
    /// Mouse travel since last frame, in pixels
    pub mouse_delta: Vec2,
}

fn axis(held: bool) -> f32 {
    if held { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Horizontal angle, radians
    pub yaw: f32,
    /// Vertical angle, radians, clamped to ±pitch_clamp_deg
    pub pitch: f32,
    /// Frames spent moving; drives the walking bob
    swing_counter: u32,
    settings: CameraSettings,
}

impl FirstPersonCamera {
    pub fn new(position: Vec3, settings: CameraSettings) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            swing_counter: 0,
            settings,
        }
    }

    pub fn fovy(&self) -> f32 {
        self.settings.fovy
    }

    /// Advance one frame.
    ///
    /// Translation uses the angles from the previous frame; the new
    /// mouse delta only affects where the camera looks afterwards.
    pub fn update(&mut self, input: &CameraInput) {
        let s = &self.settings;
        let m = &input.moves;
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let sin_pitch = self.pitch.sin();

        self.position.x += (sin_yaw * axis(m.back) - sin_yaw * axis(m.front)
            - cos_yaw * axis(m.left)
            + cos_yaw * axis(m.right))
            / s.move_divider;

        self.position.y += (sin_pitch * axis(m.front) - sin_pitch * axis(m.back)
            + axis(m.up)
            - axis(m.down))
            / s.move_divider;

        self.position.z += (cos_yaw * axis(m.back) - cos_yaw * axis(m.front)
            + sin_yaw * axis(m.left)
            - sin_yaw * axis(m.right))
            / s.move_divider;

        self.yaw += input.mouse_delta.x * -s.mouse_sensitivity;
        let limit = s.pitch_clamp_deg * DEG2RAD;
        self.pitch = (self.pitch + input.mouse_delta.y * -s.mouse_sensitivity).clamp(-limit, limit);

        if m.any() {
            self.swing_counter += 1;
        }

        // Eye height overrides vertical movement
        self.position.y = s.eye_height
            - (self.swing_counter as f32 / s.step_trig_divider).sin() / s.step_divider;
    }

    /// Look-at point, `focus_distance` ahead along yaw/pitch
    pub fn target(&self) -> Vec3 {
        let d = self.settings.focus_distance;
        Vec3::new(
            self.position.x - self.yaw.sin() * d,
            self.position.y + self.pitch.sin() * d,
            self.position.z - self.yaw.cos() * d,
        )
    }

    /// Up vector with a small sideways roll while walking
    pub fn up(&self) -> Vec3 {
        let s = &self.settings;
        let wave = (self.swing_counter as f32 / (s.step_trig_divider * 2.0)).sin() / s.waving_divider;
        Vec3::new(wave, 1.0, -wave)
    }
}
