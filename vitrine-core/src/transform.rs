/// Object placement: position, Euler rotation and scale
use nalgebra::{Matrix4, Vector3};

/// Where a scene object sits and how it is oriented and sized.
///
/// Rotation is stored as Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl ObjectTransform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    /// Compose the model matrix from position, rotation and scale
    pub fn matrix(&self) -> Matrix4<f32> {
        let translation = Matrix4::new_translation(&self.position);
        let rx = Matrix4::new_rotation(Vector3::new(self.rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.rotation.z));
        let scaling = Matrix4::new_nonuniform_scaling(&self.scale);

        // Rotations apply in order: X, then Y, then Z
        translation * (rz * ry * rx) * scaling
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_matrix() {
        let transform = ObjectTransform::identity();
        assert!((transform.matrix() - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation() {
        let transform = ObjectTransform::at(1.0, 2.0, 3.0);
        let point = transform.matrix().transform_point(&Point3::origin());
        assert!((point - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_about_y() {
        let mut transform = ObjectTransform::identity();
        transform.rotation.y = FRAC_PI_2;
        let point = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((point - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let mut transform = ObjectTransform::at(10.0, 0.0, 0.0);
        transform.scale = Vector3::new(0.0, 0.0, 0.0);
        let point = transform.matrix().transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert!((point - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-6);
    }
}
