/// Geometry primitives and procedural showcase meshes
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::PI;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append another mesh's triangles
    pub fn merge(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Copy of the mesh with a matrix baked into every vertex
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.triangles.len());
        for triangle in &self.triangles {
            let mut vertices = triangle.vertices;
            for vertex in &mut vertices {
                vertex.position = matrix.transform_point(&vertex.position);
                let normal = matrix.transform_vector(&vertex.normal);
                // A collapsing matrix leaves the old normal in place
                if normal.norm() > 1e-12 {
                    vertex.normal = normal.normalize();
                }
            }
            mesh.add_triangle(Triangle::new(vertices[0], vertices[1], vertices[2]));
        }
        mesh
    }

    /// Create a flat rectangle in the XY plane facing +Z, centered at the origin
    pub fn plane(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let mut mesh = Self::with_capacity(2);

        mesh.add_triangle(Triangle::new(
            Vertex::new(-hw, -hh, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hw, -hh, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hw, hh, 0.0, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hw, -hh, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hw, hh, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(-hw, hh, 0.0, 0.0, 0.0, 1.0),
        ));

        mesh
    }

    /// Create an axis-aligned box centered at the origin
    pub fn cuboid(sx: f32, sy: f32, sz: f32) -> Self {
        let hx = sx / 2.0;
        let hy = sy / 2.0;
        let hz = sz / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, hz, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(-hx, hy, hz, 0.0, 0.0, 1.0),
        ));

        // Back face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(-hx, hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, hy, -hz, 0.0, 0.0, -1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, -hy, -hz, 0.0, 0.0, -1.0),
        ));

        // Top face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, hy, -hz, 0.0, 1.0, 0.0),
            Vertex::new(-hx, hy, hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, hz, 0.0, 1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, hy, -hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, -hz, 0.0, 1.0, 0.0),
        ));

        // Bottom face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, hz, 0.0, -1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, hz, 0.0, -1.0, 0.0),
            Vertex::new(-hx, -hy, hz, 0.0, -1.0, 0.0),
        ));

        // Right face
        mesh.add_triangle(Triangle::new(
            Vertex::new(hx, -hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, hz, 1.0, 0.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(hx, -hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, -hy, hz, 1.0, 0.0, 0.0),
        ));

        // Left face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, -hy, hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, hz, -1.0, 0.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, -hz, -1.0, 0.0, 0.0),
        ));

        mesh
    }

    /// Create an upright cylinder around the Y axis, centered at the origin
    pub fn cylinder(radius: f32, height: f32, segments: usize) -> Self {
        let hh = height / 2.0;
        let mut mesh = Self::with_capacity(segments * 4);

        for i in 0..segments {
            let a0 = i as f32 / segments as f32 * 2.0 * PI;
            let a1 = (i + 1) as f32 / segments as f32 * 2.0 * PI;
            let (x0, z0) = (radius * a0.cos(), radius * a0.sin());
            let (x1, z1) = (radius * a1.cos(), radius * a1.sin());
            let n0 = Vector3::new(a0.cos(), 0.0, a0.sin());
            let n1 = Vector3::new(a1.cos(), 0.0, a1.sin());

            // Side wall
            let bottom0 = Point3::new(x0, -hh, z0);
            let bottom1 = Point3::new(x1, -hh, z1);
            let top0 = Point3::new(x0, hh, z0);
            let top1 = Point3::new(x1, hh, z1);
            mesh.add_triangle(Triangle::new(
                Vertex::from_parts(bottom0, n0),
                Vertex::from_parts(top0, n0),
                Vertex::from_parts(top1, n1),
            ));
            mesh.add_triangle(Triangle::new(
                Vertex::from_parts(bottom0, n0),
                Vertex::from_parts(top1, n1),
                Vertex::from_parts(bottom1, n1),
            ));

            // Caps
            let up = Vector3::new(0.0, 1.0, 0.0);
            let down = Vector3::new(0.0, -1.0, 0.0);
            mesh.add_triangle(Triangle::new(
                Vertex::new(0.0, hh, 0.0, 0.0, 1.0, 0.0),
                Vertex::from_parts(top1, up),
                Vertex::from_parts(top0, up),
            ));
            mesh.add_triangle(Triangle::new(
                Vertex::new(0.0, -hh, 0.0, 0.0, -1.0, 0.0),
                Vertex::from_parts(bottom0, down),
                Vertex::from_parts(bottom1, down),
            ));
        }

        mesh
    }

    /// Create an upright torus in the XY plane, centered at the origin.
    ///
    /// `radius` runs from the center to the middle of the tube,
    /// `tube` is the radius of the tube itself.
    pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Self {
        fn ring_vertex(radius: f32, tube: f32, u: f32, v: f32) -> Vertex {
            let position = Point3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let normal = Vector3::new(v.cos() * u.cos(), v.cos() * u.sin(), v.sin());
            Vertex::from_parts(position, normal)
        }

        let mut mesh = Self::with_capacity(radial_segments * tubular_segments * 2);
        for j in 0..tubular_segments {
            let u0 = j as f32 / tubular_segments as f32 * 2.0 * PI;
            let u1 = (j + 1) as f32 / tubular_segments as f32 * 2.0 * PI;
            for i in 0..radial_segments {
                let v0 = i as f32 / radial_segments as f32 * 2.0 * PI;
                let v1 = (i + 1) as f32 / radial_segments as f32 * 2.0 * PI;

                let a = ring_vertex(radius, tube, u0, v0);
                let b = ring_vertex(radius, tube, u1, v0);
                let c = ring_vertex(radius, tube, u1, v1);
                let d = ring_vertex(radius, tube, u0, v1);
                mesh.add_triangle(Triangle::new(a, b, c));
                mesh.add_triangle(Triangle::new(a, c, d));
            }
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal() {
        let triangle = Triangle::new(
            Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0),
        );
        let normal = triangle.calculate_normal();
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_generator_triangle_counts() {
        assert_eq!(Mesh::plane(2.0, 2.0).triangles.len(), 2);
        assert_eq!(Mesh::cuboid(1.0, 2.0, 3.0).triangles.len(), 12);
        assert_eq!(Mesh::cylinder(1.0, 1.0, 8).triangles.len(), 32);
        assert_eq!(Mesh::torus(2.5, 0.1, 8, 16).triangles.len(), 256);
    }

    #[test]
    fn test_cuboid_extents() {
        let mesh = Mesh::cuboid(2.0, 4.0, 6.0);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                assert!(vertex.position.x.abs() <= 1.0 + 1e-6);
                assert!(vertex.position.y.abs() <= 2.0 + 1e-6);
                assert!(vertex.position.z.abs() <= 3.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_torus_radius_bounds() {
        let mesh = Mesh::torus(2.5, 0.1, 8, 16);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                let planar = (vertex.position.x.powi(2) + vertex.position.y.powi(2)).sqrt();
                assert!(planar >= 2.4 - 1e-4);
                assert!(planar <= 2.6 + 1e-4);
                assert!(vertex.position.z.abs() <= 0.1 + 1e-4);
            }
        }
    }

    #[test]
    fn test_transformed_moves_positions_not_normals() {
        let matrix = Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0));
        let mesh = Mesh::plane(2.0, 2.0).transformed(&matrix);
        let vertex = mesh.triangles[0].vertices[0];
        assert!((vertex.position.x - (-1.0 + 5.0)).abs() < 1e-6);
        assert!((vertex.normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_merge() {
        let mut mesh = Mesh::plane(1.0, 1.0);
        mesh.merge(Mesh::plane(1.0, 1.0));
        assert_eq!(mesh.triangles.len(), 4);
    }
}
