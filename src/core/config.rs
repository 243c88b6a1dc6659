//=========================================================================
// Stage Configuration
//=========================================================================
//
// Serde-backed settings for the orchestrator and the desktop host.
//
// Every section has defaults, so a partial file (or none at all) is a
// valid configuration. Only TOML is supported.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::display::{SimulatedDisplay, StageDimensions};
use crate::core::error::ConfigError;
use crate::core::scene::{Camera, Transform};

//=== Sections ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "xr_stage".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Eye height of the desktop camera, in meters.
    pub user_height: f32,
}

impl CameraConfig {
    /// Builds a camera with these settings for a `width` × `height` view.
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
        Camera::perspective(self.fov, aspect, self.near, self.far)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 80.0,
            near: 0.01,
            far: 1_000_000.0,
            user_height: 1.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub width: f32,
    pub depth: f32,
}

impl StageConfig {
    pub fn dimensions(&self) -> StageDimensions {
        StageDimensions::new(self.width, self.depth)
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        let stage = StageDimensions::default();
        Self {
            width: stage.width,
            depth: stage.depth,
        }
    }
}

/// A headset the desktop host pretends is plugged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedDisplayConfig {
    pub name: String,
    /// Play area; `None` simulates a seated-only device.
    pub stage: Option<[f32; 2]>,
    /// Per-eye render size; `None` simulates a device reporting nothing.
    pub eye: Option<[u32; 2]>,
}

impl SimulatedDisplayConfig {
    pub fn build(&self) -> SimulatedDisplay {
        let mut display = SimulatedDisplay::new(self.name.clone())
            .with_eye_size(self.eye.map(|[w, h]| (w, h)));
        if let Some([width, depth]) = self.stage {
            display = display.with_stage(StageDimensions::new(width, depth));
        }
        display
    }
}

impl Default for SimulatedDisplayConfig {
    fn default() -> Self {
        Self {
            name: "Simulated HMD".to_string(),
            stage: Some([3.0, 4.0]),
            eye: Some([1080, 1200]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Per-eye size assumed when a presenting device reports none.
    pub default_eye: [u32; 2],
    pub simulated: Option<SimulatedDisplayConfig>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_eye: [1080, 1200],
            simulated: None,
        }
    }
}

/// World-space pose of a numbered spectator camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedCameraConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl FixedCameraConfig {
    pub fn transform(&self) -> Transform {
        Transform::from_position(Vec3::from_array(self.position)).looking_at(Vec3::from_array(self.look_at))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectatorConfig {
    /// Start in spectator mode.
    pub enabled: bool,
    pub fixed_cameras: Vec<FixedCameraConfig>,
}

impl SpectatorConfig {
    pub fn transforms(&self) -> Vec<Transform> {
        self.fixed_cameras.iter().map(FixedCameraConfig::transform).collect()
    }
}

impl Default for SpectatorConfig {
    fn default() -> Self {
        let target = [0.0, 1.2, -1.0];
        let corner = |x: f32, z: f32| FixedCameraConfig {
            position: [x, 2.4, z],
            look_at: target,
        };
        Self {
            enabled: false,
            fixed_cameras: vec![
                corner(3.0, 2.0),
                corner(-3.0, 2.0),
                corner(-3.0, -4.0),
                corner(3.0, -4.0),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub desktop_map_size: u32,
    pub hmd_map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            desktop_map_size: 1024,
            hmd_map_size: 4096,
        }
    }
}

//=== AppConfig ===========================================================

/// Complete orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub stage: StageConfig,
    pub display: DisplayConfig,
    pub spectator: SpectatorConfig,
    pub shadows: ShadowConfig,
    /// Skips the intro stage and starts straight in the experience.
    pub debug_mode: bool,
}

impl AppConfig {
    /// Loads configuration from a `.toml` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::check_format(path)?;

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Saves configuration to a `.toml` file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        Self::check_format(path)?;

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    fn check_format(path: &Path) -> Result<(), ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(()),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn default_eye(&self) -> (u32, u32) {
        let [width, height] = self.display.default_eye;
        (width, height)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
