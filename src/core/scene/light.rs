//=========================================================================
// Key Light
//=========================================================================
//
// The shadow-casting directional light the orchestrator animates.
//
//=========================================================================

use glam::Vec3;

/// Orthographic shadow camera range of a directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    pub near: f32,
    pub far: f32,
    pub map_size: u32,
}

/// Main directional light of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLight {
    pub position: Vec3,
    pub intensity: f32,
    pub shadow: ShadowCamera,
}

impl KeyLight {
    /// Default rig: placed behind and to the left, tight shadow range.
    pub fn new(shadow_map_size: u32) -> Self {
        Self {
            position: Vec3::new(-8.0, 10.0, -18.0),
            intensity: 0.6,
            shadow: ShadowCamera {
                near: 20.0,
                far: 26.0,
                map_size: shadow_map_size,
            },
        }
    }
}
