//! Local and world transforms of scene objects.
//!
//! A transform is kept decomposed (position, rotation as quaternion, scale) so
//! attributes can address each part independently. World transforms are
//! obtained by composing parent and child with `*`.

use std::ops::Mul;

use cgmath::{InnerSpace, One, Rotation, Rotation3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Rotates around an axis in local space.
    pub fn rotate_on_axis(&mut self, axis: cgmath::Vector3<f32>, angle: f32) {
        if axis.magnitude2() == 0.0 {
            return;
        }
        let q = cgmath::Quaternion::from_axis_angle(axis.normalize(), cgmath::Rad(angle));
        self.rotation = (self.rotation * q).normalize();
    }

    /// Moves along an axis in local space.
    pub fn translate_on_axis(&mut self, axis: cgmath::Vector3<f32>, distance: f32) {
        if axis.magnitude2() == 0.0 {
            return;
        }
        let direction = self.rotation.rotate_vector(axis.normalize());
        self.position += direction * distance;
    }

    /// Turns the local +Z axis towards `target`, keeping `up` as close to +Y as possible.
    pub fn look_at(&mut self, target: cgmath::Vector3<f32>, up: cgmath::Vector3<f32>) {
        let forward = target - self.position;
        if forward.magnitude2() == 0.0 {
            return;
        }
        let z = forward.normalize();
        let mut x = up.cross(z);
        if x.magnitude2() == 0.0 {
            // up and forward are parallel; nudge up off-axis
            x = cgmath::Vector3::new(up.z, up.x, up.y).cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.rotation = cgmath::Quaternion::from(cgmath::Matrix3::from_cols(x, y, z));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        let scaled_rhs_pos = cgmath::Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        Transform {
            position: self.position + self.rotation.rotate_vector(scaled_rhs_pos),
            rotation: self.rotation * rhs.rotation,
            scale: cgmath::Vector3::new(
                self.scale.x * rhs.scale.x,
                self.scale.y * rhs.scale.y,
                self.scale.z * rhs.scale.z,
            ),
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        &self * &rhs
    }
}
