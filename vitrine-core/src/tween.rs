/// Time-based property animation with easing
use nalgebra::Vector3;

use crate::scene::Scene;

/// Linear interpolation between two values
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// Easing curves applied to normalized tween progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Fast start, gentle landing
    CubicOut,
    /// Slow start and landing, fast middle
    QuartInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }
}

/// A value a tween can drive
pub trait Interpolatable: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        lerp(a, b, t)
    }
}

impl Interpolatable for Vector3<f32> {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(&b, t)
    }
}

/// An in-flight interpolation from a start value to a target
#[derive(Debug, Clone)]
pub struct Tween<T: Interpolatable> {
    pub from: T,
    pub to: T,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl<T: Interpolatable> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds and return the current value
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed += dt;
        self.sample()
    }

    /// The value at the current elapsed time
    pub fn sample(&self) -> T {
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        };
        T::interpolate(self.from, self.to, self.easing.apply(progress))
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// The object property a tween writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

struct ActiveTween {
    object: String,
    channel: Channel,
    tween: Tween<Vector3<f32>>,
}

/// Drives the active tweens and writes their values into the scene.
///
/// One tween per (object, channel); retargeting a channel that is
/// already running replaces the old tween mid-flight.
pub struct Animator {
    active: Vec<ActiveTween>,
}

impl Animator {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Start or replace the tween on an object channel
    pub fn animate(
        &mut self,
        object: &str,
        channel: Channel,
        from: Vector3<f32>,
        to: Vector3<f32>,
        duration: f32,
        easing: Easing,
    ) {
        self.active
            .retain(|entry| !(entry.object == object && entry.channel == channel));
        self.active.push(ActiveTween {
            object: object.to_string(),
            channel,
            tween: Tween::new(from, to, duration, easing),
        });
    }

    /// Whether a tween is currently running on the channel
    pub fn is_animating(&self, object: &str, channel: Channel) -> bool {
        self.active
            .iter()
            .any(|entry| entry.object == object && entry.channel == channel)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance every tween by `dt` seconds and write the values through.
    ///
    /// Tweens whose object has left the scene tick along silently and
    /// expire on their own.
    pub fn step(&mut self, scene: &mut Scene, dt: f32) {
        for entry in &mut self.active {
            let value = entry.tween.advance(dt);
            if let Some(object) = scene.get_mut(&entry.object) {
                match entry.channel {
                    Channel::Position => object.transform.position = value,
                    Channel::Rotation => object.transform.rotation = value,
                    Channel::Scale => object.transform.scale = value,
                }
            }
        }
        self.active.retain(|entry| !entry.tween.finished());
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::scene::SceneObject;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicOut, Easing::QuartInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_easing_midpoints() {
        assert!((Easing::Linear.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicOut.apply(0.5) - 0.875).abs() < 1e-6);
        assert!((Easing::QuartInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tween_reaches_target() {
        let mut tween = Tween::new(0.0_f32, 10.0, 0.5, Easing::Linear);
        assert!((tween.advance(0.25) - 5.0).abs() < 1e-6);
        assert!(!tween.finished());
        assert!((tween.advance(0.25) - 10.0).abs() < 1e-6);
        assert!(tween.finished());
    }

    #[test]
    fn test_tween_clamps_past_end() {
        let mut tween = Tween::new(0.0_f32, 10.0, 0.5, Easing::CubicOut);
        let value = tween.advance(3.0);
        assert!((value - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_tween_is_instant() {
        let tween = Tween::new(0.0_f32, 4.0, 0.0, Easing::Linear);
        assert!((tween.sample() - 4.0).abs() < 1e-6);
        assert!(tween.finished());
    }

    fn scene_with_cube() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new("cube", Mesh::cuboid(1.0, 1.0, 1.0)));
        scene
    }

    #[test]
    fn test_animator_writes_through() {
        let mut scene = scene_with_cube();
        let mut animator = Animator::new();
        animator.animate(
            "cube",
            Channel::Position,
            Vector3::zeros(),
            Vector3::new(4.0, 0.0, 0.0),
            1.0,
            Easing::Linear,
        );

        animator.step(&mut scene, 0.5);
        let position = scene.get("cube").unwrap().transform.position;
        assert!((position.x - 2.0).abs() < 1e-6);
        assert!(animator.is_animating("cube", Channel::Position));

        animator.step(&mut scene, 0.6);
        let position = scene.get("cube").unwrap().transform.position;
        assert!((position.x - 4.0).abs() < 1e-6);
        assert!(!animator.is_animating("cube", Channel::Position));
        assert!(animator.is_idle());
    }

    #[test]
    fn test_retarget_replaces_running_tween() {
        let mut scene = scene_with_cube();
        let mut animator = Animator::new();
        animator.animate(
            "cube",
            Channel::Scale,
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(2.0, 2.0, 2.0),
            1.0,
            Easing::Linear,
        );
        animator.step(&mut scene, 0.5);

        // Retarget to zero before the first tween lands
        let current = scene.get("cube").unwrap().transform.scale;
        animator.animate(
            "cube",
            Channel::Scale,
            current,
            Vector3::zeros(),
            1.0,
            Easing::Linear,
        );
        animator.step(&mut scene, 1.0);

        let scale = scene.get("cube").unwrap().transform.scale;
        assert!(scale.norm() < 1e-6);
    }

    #[test]
    fn test_channels_do_not_collide() {
        let mut scene = scene_with_cube();
        let mut animator = Animator::new();
        animator.animate(
            "cube",
            Channel::Position,
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            1.0,
            Easing::Linear,
        );
        animator.animate(
            "cube",
            Channel::Rotation,
            Vector3::zeros(),
            Vector3::new(0.0, 2.0, 0.0),
            1.0,
            Easing::Linear,
        );

        animator.step(&mut scene, 1.0);
        let transform = scene.get("cube").unwrap().transform;
        assert!((transform.position.x - 1.0).abs() < 1e-6);
        assert!((transform.rotation.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_object_does_not_panic() {
        let mut scene = Scene::new();
        let mut animator = Animator::new();
        animator.animate(
            "ghost",
            Channel::Position,
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            0.1,
            Easing::Linear,
        );
        animator.step(&mut scene, 0.2);
        assert!(animator.is_idle());
    }
}
