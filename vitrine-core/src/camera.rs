/// Perspective camera: view and projection matrices, NDC mapping, picking rays
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::ray::Ray;

/// Camera state for a showcase scene
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Transform a world-space point to normalized device coordinates.
    ///
    /// Always yields a value: points at or behind the camera plane map to
    /// coordinates outside the [-1, 1] cube instead of failing. Callers
    /// that need clipping use `project_to_screen`.
    pub fn world_to_ndc(&self, point: &Point3<f32>) -> Vector3<f32> {
        let clip = self.view_projection_matrix() * point.to_homogeneous();
        let w = if clip.w.abs() < 1e-6 { 1e-6 } else { clip.w };
        Vector3::new(clip.x / w, clip.y / w, clip.z / w)
    }

    /// Build a picking ray from the camera through a point given in
    /// normalized device coordinates.
    ///
    /// Returns None only when the view-projection matrix cannot be
    /// inverted.
    pub fn screen_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inverse = self.view_projection_matrix().try_inverse()?;
        let world = inverse * Vector4::new(ndc_x, ndc_y, 0.5, 1.0);
        if world.w.abs() < 1e-6 {
            return None;
        }
        let through = Point3::new(world.x / world.w, world.y / world.w, world.z / world.w);
        Some(Ray::new(self.position, through - self.position))
    }

    /// Project a world-space point to pixel coordinates with a depth value.
    ///
    /// Returns None for points behind the camera or outside the viewport.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Points on or behind the camera plane never reach the screen
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.w;

        // Clip test
        if ndc_x < -1.0 || ndc_x > 1.0 || ndc_y < -1.0 || ndc_y > 1.0 {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_target_maps_to_ndc_center() {
        let camera = Camera::new(800, 600);
        let ndc = camera.world_to_ndc(&Point3::origin());
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
    }

    #[test]
    fn test_ndc_deterministic() {
        let camera = Camera::new(800, 600);
        let point = Point3::new(1.3, -0.7, 2.1);
        let first = camera.world_to_ndc(&point);
        let second = camera.world_to_ndc(&point);
        assert_eq!(first, second);
    }

    #[test]
    fn test_point_right_of_center_has_positive_x() {
        let camera = Camera::new(800, 600);
        let ndc = camera.world_to_ndc(&Point3::new(1.0, 0.0, 0.0));
        assert!(ndc.x > 0.0);
    }

    #[test]
    fn test_behind_camera_still_produces_value() {
        let camera = Camera::new(800, 600);
        let ndc = camera.world_to_ndc(&Point3::new(0.0, 0.0, 50.0));
        assert!(ndc.x.is_finite());
        assert!(ndc.y.is_finite());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera::new(800, 600);
        camera.position = Point3::new(0.0, 4.0, 40.0);
        let ray = camera.screen_ray(0.0, 0.0).unwrap();
        let expected = (camera.target - camera.position).normalize();
        assert!((ray.direction - expected).norm() < 1e-5);
        assert!((ray.origin - camera.position).norm() < 1e-6);
    }

    #[test]
    fn test_ray_passes_through_projected_point() {
        let mut camera = Camera::new(800, 600);
        camera.position = Point3::new(0.0, 0.0, 9.0);
        let point = Point3::new(1.6, 3.0, 0.0);
        let ndc = camera.world_to_ndc(&point);
        let ray = camera.screen_ray(ndc.x, ndc.y).unwrap();

        let t = (point - ray.origin).dot(&ray.direction);
        let closest = ray.at(t);
        assert!((closest - point).norm() < 1e-3);
    }

    #[test]
    fn test_project_to_screen_center() {
        let camera = Camera::new(800, 600);
        let screen = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((screen.0 - 400.0).abs() < 1e-3);
        assert!((screen.1 - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_project_to_screen_rejects_points_behind() {
        let camera = Camera::new(800, 600);
        let behind = Point3::new(0.0, 0.0, 50.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }
}
