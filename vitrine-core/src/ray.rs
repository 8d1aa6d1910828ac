/// Ray casting against triangle meshes
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Mesh;

const EPSILON: f32 = 1e-7;

/// A ray with a world-space origin and unit direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The point reached after travelling `t` units along the ray
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// A ray-mesh intersection with the distance measured in world units
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Triangles are treated as double sided. Returns the distance along the
/// ray, or None for misses and degenerate triangles.
pub fn intersect_triangle(
    ray: &Ray,
    v0: &Point3<f32>,
    v1: &Point3<f32>,
    v2: &Point3<f32>,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray.direction.cross(&edge2);
    let det = edge1.dot(&pvec);

    // Parallel rays and collapsed triangles never hit
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - v0;
    let u = tvec.dot(&pvec) * inv_det;
    if u < 0.0 || u > 1.0 {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = ray.direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest intersection between a ray and a mesh placed by a model matrix
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh, model_matrix: &Matrix4<f32>) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;

    for triangle in &mesh.triangles {
        let v0 = model_matrix.transform_point(&triangle.vertices[0].position);
        let v1 = model_matrix.transform_point(&triangle.vertices[1].position);
        let v2 = model_matrix.transform_point(&triangle.vertices[2].position);

        if let Some(t) = intersect_triangle(ray, &v0, &v1, &v2) {
            let closer = match &nearest {
                Some(hit) => t < hit.distance,
                None => true,
            };
            if closer {
                nearest = Some(RayHit {
                    distance: t,
                    point: ray.at(t),
                });
            }
        }
    }

    nearest
}
