//! Game configuration
//!
//! Everything tunable lives in one RON file. Missing fields fall back to
//! the built-in defaults, so a config only needs to list what it changes:
//!
//! ```ron
//! (
//!     map_path: "assets/maps/maze.png",
//!     scan: Neighborhood,
//!     bindings: { MoveFront: "Up", MoveBack: "Down" },
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::camera::CameraSettings;
use crate::collision::{CollisionParams, ScanMode};
use crate::input::KeyBindings;
use crate::math::Vec3;

/// File name looked up in the working directory
pub const LOCAL_CONFIG: &str = "maze3d.ron";

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    Validation(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
            ConfigError::Validation(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub resizable: bool,
    /// Hide and lock the cursor for mouse-look
    pub grab_cursor: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "maze3d".to_string(),
            width: 800,
            height: 450,
            resizable: false,
            grab_cursor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    /// Frames per second; below 1 disables pacing
    pub target_fps: i32,
    /// Cubicmap image (white = wall, black = open)
    pub map_path: PathBuf,
    /// 2x2 texture atlas for the map mesh
    pub atlas_path: PathBuf,
    pub cube_size: f32,
    /// World position of map cell (0, 0)
    pub map_position: Vec3,
    /// Model draw tint, RGBA
    pub tint: [u8; 4],
    pub player_radius: f32,
    pub scan: ScanMode,
    pub start_position: Vec3,
    pub camera: CameraSettings,
    pub bindings: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            target_fps: 60,
            map_path: PathBuf::from("assets/maps/maze.png"),
            atlas_path: PathBuf::from("assets/textures/cubicmap_atlas.png"),
            cube_size: 1.0,
            map_position: Vec3::ZERO,
            tint: [255, 255, 255, 255],
            player_radius: 0.1,
            scan: ScanMode::Full,
            start_position: Vec3::ONE,
            camera: CameraSettings::default(),
            bindings: KeyBindings::default(),
        }
    }
}

fn finite(name: &str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{} must be finite", name)))
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{} must be positive, got {}", name, value)))
    }
}

impl GameConfig {
    /// Parse from RON text and validate
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load the first config found on the search path, else defaults.
    /// A file that exists but fails to load is reported and skipped.
    pub fn load_or_default() -> Self {
        for path in search_paths() {
            if !path.is_file() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    tracing::info!("Config loaded from {}", path.display());
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cube_size", self.cube_size)?;
        positive("player_radius", self.player_radius)?;
        for (name, v) in [("map_position", self.map_position), ("start_position", self.start_position)] {
            if !v.is_finite() {
                return Err(ConfigError::Validation(format!("{} must be finite", name)));
            }
        }

        let cam = &self.camera;
        positive("camera.move_divider", cam.move_divider)?;
        positive("camera.step_trig_divider", cam.step_trig_divider)?;
        positive("camera.step_divider", cam.step_divider)?;
        positive("camera.waving_divider", cam.waving_divider)?;
        positive("camera.focus_distance", cam.focus_distance)?;
        finite("camera", &[cam.mouse_sensitivity, cam.eye_height])?;
        if !(cam.fovy > 0.0 && cam.fovy < 180.0) {
            return Err(ConfigError::Validation(format!("camera.fovy out of range: {}", cam.fovy)));
        }
        if !(0.0..90.0).contains(&cam.pitch_clamp_deg) {
            return Err(ConfigError::Validation(format!(
                "camera.pitch_clamp_deg out of range: {}",
                cam.pitch_clamp_deg
            )));
        }

        if self.window.width <= 0 || self.window.height <= 0 {
            return Err(ConfigError::Validation(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        self.bindings.validate().map_err(ConfigError::Validation)
    }

    pub fn collision_params(&self) -> CollisionParams {
        CollisionParams {
            map_position: self.map_position,
            cube_size: self.cube_size,
            radius: self.player_radius,
            scan: self.scan,
        }
    }
}

/// Per-user config file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("maze3d").join("config.ron"))
}

/// Write the default config to `path`, or to the per-user location.
/// Returns where it was written.
pub fn write_default_config(path: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    let path = path.or_else(user_config_path).ok_or_else(|| {
        ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no per-user config directory",
        ))
    })?;
    GameConfig::default().save(&path)?;
    Ok(path)
}

/// Config files in lookup order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    paths.extend(user_config_path());
    paths
}
