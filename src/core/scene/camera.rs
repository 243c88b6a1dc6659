//=========================================================================
// Camera
//=========================================================================
//
// Perspective camera with a world transform.
//
// The projection keeps its parameters (fov, aspect, near, far) and
// derives matrices on demand, so resizing only touches `aspect`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Quat, Vec3};

//=== Transform ===========================================================

/// Position, orientation and scale of a node or camera in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotates the transform so its -Z axis points at `target`.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        let forward = target - self.position;
        if forward.length_squared() > f32::EPSILON {
            let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
            self.rotation = Quat::from_mat4(&view.inverse());
        }
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Direction of the local -Z axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=== Camera ==============================================================

/// Perspective camera used for both the primary and spectator viewpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            transform: Transform::IDENTITY,
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Updates the aspect ratio. Non-finite or non-positive values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.transform.rotation, self.transform.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(80.0, 16.0 / 9.0, 0.01, 1_000_000.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
