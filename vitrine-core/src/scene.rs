/// Scene contents: named mesh instances and ray queries against them
use nalgebra::Point3;

use crate::geometry::Mesh;
use crate::ray::{intersect_mesh, Ray};
use crate::transform::ObjectTransform;

/// A named mesh instance with its own placement
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    pub transform: ObjectTransform,
    pub visible: bool,
}

impl SceneObject {
    pub fn new(name: &str, mesh: Mesh) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform: ObjectTransform::identity(),
            visible: true,
        }
    }

    pub fn with_transform(name: &str, mesh: Mesh, transform: ObjectTransform) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform,
            visible: true,
        }
    }
}

/// The nearest object hit by a ray
#[derive(Debug, Clone, Copy)]
pub struct SceneHit {
    /// Index into `Scene::objects`
    pub object: usize,
    pub distance: f32,
    pub point: Point3<f32>,
}

/// An ordered collection of scene objects
#[derive(Debug, Clone)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn get(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.name == name)
    }

    /// Nearest world-space intersection among visible objects.
    ///
    /// Hidden objects are skipped entirely; distances are world units
    /// regardless of per-object scaling.
    pub fn cast_ray(&self, ray: &Ray) -> Option<SceneHit> {
        let mut nearest: Option<SceneHit> = None;

        for (index, object) in self.objects.iter().enumerate() {
            if !object.visible {
                continue;
            }
            let model = object.transform.matrix();
            if let Some(hit) = intersect_mesh(ray, &object.mesh, &model) {
                let closer = match &nearest {
                    Some(best) => hit.distance < best.distance,
                    None => true,
                };
                if closer {
                    nearest = Some(SceneHit {
                        object: index,
                        distance: hit.distance,
                        point: hit.point,
                    });
                }
            }
        }

        nearest
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
