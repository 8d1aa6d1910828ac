/// Variant selection choreography driven by a pose table
use nalgebra::{Point3, Vector3};

use crate::scene::Scene;
use crate::transform::ObjectTransform;
use crate::tween::{Animator, Channel, Easing};

/// A complete pose for one variant object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantPose {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl VariantPose {
    pub fn new(position: Vector3<f32>, rotation: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// One selectable variant: the scene object it moves, its resting pose
/// and the world point its marker is anchored to
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub resting: VariantPose,
    pub anchor_position: Point3<f32>,
}

impl Variant {
    pub fn new(name: &str, resting: VariantPose, anchor_position: Point3<f32>) -> Self {
        Self {
            name: name.to_string(),
            resting,
            anchor_position,
        }
    }
}

/// The variant table plus the shared featured pose and tween timing.
///
/// Selecting moves one variant to the featured pose and shrinks the
/// rest away; resetting returns everything to the table's resting
/// poses. All motion goes through the animator, one choreography for
/// every variant.
pub struct Showcase {
    pub variants: Vec<Variant>,
    pub featured: VariantPose,
    pub duration: f32,
    pub easing: Easing,
    selected: Option<usize>,
}

impl Showcase {
    pub fn new(variants: Vec<Variant>, featured: VariantPose) -> Self {
        Self {
            variants,
            featured,
            duration: 0.5,
            easing: Easing::CubicOut,
            selected: None,
        }
    }

    /// The currently featured variant, if any
    pub fn selected(&self) -> Option<&Variant> {
        self.selected.map(|index| &self.variants[index])
    }

    /// Place every variant at its resting pose immediately, without tweens
    pub fn apply_resting(&self, scene: &mut Scene) {
        for variant in &self.variants {
            if let Some(object) = scene.get_mut(&variant.name) {
                object.transform.position = variant.resting.position;
                object.transform.rotation = variant.resting.rotation;
                object.transform.scale = variant.resting.scale;
            }
        }
    }

    /// Feature one variant: it glides to the featured pose while the
    /// others shrink to nothing. Returns false for unknown names.
    pub fn select(&mut self, name: &str, scene: &Scene, animator: &mut Animator) -> bool {
        let index = match self.variants.iter().position(|v| v.name == name) {
            Some(index) => index,
            None => return false,
        };

        for (i, variant) in self.variants.iter().enumerate() {
            let current = match scene.get(&variant.name) {
                Some(object) => object.transform,
                None => continue,
            };
            if i == index {
                self.tween_to_pose(animator, &variant.name, &current, &self.featured);
            } else {
                // The others only shrink; their place and pose stay put
                animator.animate(
                    &variant.name,
                    Channel::Scale,
                    current.scale,
                    Vector3::zeros(),
                    self.duration,
                    self.easing,
                );
            }
        }

        self.selected = Some(index);
        true
    }

    /// Return every variant to its resting pose
    pub fn reset(&mut self, scene: &Scene, animator: &mut Animator) {
        for variant in &self.variants {
            let current = match scene.get(&variant.name) {
                Some(object) => object.transform,
                None => continue,
            };
            self.tween_to_pose(animator, &variant.name, &current, &variant.resting);
        }
        self.selected = None;
    }

    fn tween_to_pose(
        &self,
        animator: &mut Animator,
        name: &str,
        current: &ObjectTransform,
        target: &VariantPose,
    ) {
        let channels = [
            (Channel::Position, current.position, target.position),
            (Channel::Rotation, current.rotation, target.rotation),
            (Channel::Scale, current.scale, target.scale),
        ];
        for (channel, from, to) in channels {
            animator.animate(name, channel, from, to, self.duration, self.easing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::scene::SceneObject;

    fn uniform(value: f32) -> Vector3<f32> {
        Vector3::new(value, value, value)
    }

    fn sample_showcase() -> (Showcase, Scene) {
        let resting_a = VariantPose::new(
            Vector3::new(-9.0, 4.0, 0.0),
            Vector3::new(2.0, 0.0, 0.2),
            uniform(1.5),
        );
        let resting_b = VariantPose::new(
            Vector3::new(-1.0, 4.0, 0.0),
            Vector3::new(2.0, 0.0, 0.6),
            uniform(1.5),
        );
        let featured = VariantPose::new(
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(2.0, 0.0, 0.6),
            uniform(1.5),
        );
        let showcase = Showcase::new(
            vec![
                Variant::new("boston", resting_a, Point3::new(-6.5, 3.0, 0.0)),
                Variant::new("oval", resting_b, Point3::new(1.6, 3.0, 0.0)),
            ],
            featured,
        );

        let mut scene = Scene::new();
        scene.add_object(SceneObject::new("boston", Mesh::cuboid(1.0, 1.0, 1.0)));
        scene.add_object(SceneObject::new("oval", Mesh::cuboid(1.0, 1.0, 1.0)));
        showcase.apply_resting(&mut scene);
        (showcase, scene)
    }

    #[test]
    fn test_apply_resting_places_objects() {
        let (_, scene) = sample_showcase();
        let boston = scene.get("boston").unwrap().transform;
        assert!((boston.position - Vector3::new(-9.0, 4.0, 0.0)).norm() < 1e-6);
        assert!((boston.scale - uniform(1.5)).norm() < 1e-6);
    }

    #[test]
    fn test_select_features_one_and_hides_the_rest() {
        let (mut showcase, mut scene) = sample_showcase();
        let mut animator = Animator::new();

        assert!(showcase.select("boston", &scene, &mut animator));
        assert_eq!(showcase.selected().unwrap().name, "boston");

        // Run the tweens to completion
        animator.step(&mut scene, 1.0);

        let boston = scene.get("boston").unwrap().transform;
        assert!((boston.position - Vector3::new(0.0, 0.0, 2.0)).norm() < 1e-5);
        assert!((boston.rotation - Vector3::new(2.0, 0.0, 0.6)).norm() < 1e-5);

        let oval = scene.get("oval").unwrap().transform;
        assert!(oval.scale.norm() < 1e-5);
        // Hidden variants keep their place, only their size collapses
        assert!((oval.position - Vector3::new(-1.0, 4.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_select_unknown_variant_changes_nothing() {
        let (mut showcase, scene) = sample_showcase();
        let mut animator = Animator::new();
        assert!(!showcase.select("aviator", &scene, &mut animator));
        assert!(animator.is_idle());
        assert!(showcase.selected().is_none());
    }

    #[test]
    fn test_reset_restores_resting_poses() {
        let (mut showcase, mut scene) = sample_showcase();
        let mut animator = Animator::new();

        showcase.select("oval", &scene, &mut animator);
        animator.step(&mut scene, 1.0);
        showcase.reset(&scene, &mut animator);
        animator.step(&mut scene, 1.0);

        assert!(showcase.selected().is_none());
        let boston = scene.get("boston").unwrap().transform;
        assert!((boston.position - Vector3::new(-9.0, 4.0, 0.0)).norm() < 1e-5);
        assert!((boston.scale - uniform(1.5)).norm() < 1e-5);
        let oval = scene.get("oval").unwrap().transform;
        assert!((oval.scale - uniform(1.5)).norm() < 1e-5);
    }

    #[test]
    fn test_reselect_mid_flight_retargets() {
        let (mut showcase, mut scene) = sample_showcase();
        let mut animator = Animator::new();

        showcase.select("boston", &scene, &mut animator);
        animator.step(&mut scene, 0.1);
        showcase.reset(&scene, &mut animator);
        animator.step(&mut scene, 1.0);

        // The half-shrunk variant recovers fully
        let oval = scene.get("oval").unwrap().transform;
        assert!((oval.scale - uniform(1.5)).norm() < 1e-5);
    }
}
