/// Overlay anchors: screen placement and occlusion for marker elements
use nalgebra::Point3;
use tracing::debug;

use crate::camera::Camera;
use crate::scene::Scene;

/// Pixel offset from the viewport center. Positive x is right, positive y
/// is down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenOffset {
    pub x: f32,
    pub y: f32,
}

/// Output surface dimensions in pixels (terminal cells for the ASCII
/// frontend)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Handle to a marker element owned by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u32);

/// The UI surface owning the elements behind each `OverlayId`.
///
/// Frontends implement this once and hand it to the registry; the
/// registry never owns or creates elements itself.
pub trait OverlaySurface {
    /// Whether the element behind the handle still exists
    fn is_live(&self, id: OverlayId) -> bool;
    /// Move the element to an offset from the viewport center
    fn place(&mut self, id: OverlayId, offset: ScreenOffset);
    /// Show the element as reachable or hide it as occluded
    fn set_active(&mut self, id: OverlayId, active: bool);
}

/// A world-space point paired with the overlay element it drives
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub position: Point3<f32>,
    pub overlay: OverlayId,
}

impl Anchor {
    pub fn new(position: Point3<f32>, overlay: OverlayId) -> Self {
        Self { position, overlay }
    }
}

/// Everything the per-frame anchor pass reads: camera, viewport and the
/// occluding scene. Built fresh each frame; holds no state of its own.
pub struct RenderContext<'a> {
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub scene: &'a Scene,
}

impl<'a> RenderContext<'a> {
    pub fn new(camera: &'a Camera, viewport: Viewport, scene: &'a Scene) -> Self {
        Self {
            camera,
            viewport,
            scene,
        }
    }

    /// Screen offset of a world point, measured from the viewport center
    pub fn project(&self, point: &Point3<f32>) -> ScreenOffset {
        let ndc = self.camera.world_to_ndc(point);
        ScreenOffset {
            x: ndc.x * self.viewport.width * 0.5,
            y: -ndc.y * self.viewport.height * 0.5,
        }
    }

    /// Whether a world point is unobstructed from the camera.
    ///
    /// Casts a ray from the camera through the point's screen position.
    /// The point counts as occluded when something is hit at or before
    /// its own distance; an exact tie is occluded.
    pub fn is_visible(&self, point: &Point3<f32>) -> bool {
        let ndc = self.camera.world_to_ndc(point);
        let ray = match self.camera.screen_ray(ndc.x, ndc.y) {
            Some(ray) => ray,
            None => return true,
        };
        match self.scene.cast_ray(&ray) {
            Some(hit) => hit.distance > (point - self.camera.position).norm(),
            None => true,
        }
    }
}

/// One evaluated anchor: where its overlay goes and whether it shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPlacement {
    pub overlay: OverlayId,
    pub offset: ScreenOffset,
    pub visible: bool,
}

/// The set of anchors recomputed every frame
#[derive(Debug, Clone)]
pub struct AnchorRegistry {
    pub anchors: Vec<Anchor>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
        }
    }

    pub fn add(&mut self, anchor: Anchor) {
        self.anchors.push(anchor);
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Evaluate every anchor against the current frame state.
    ///
    /// Pure: reads the context, touches no surface. Anchors are
    /// independent, so the output order simply follows insertion order.
    pub fn evaluate(&self, context: &RenderContext) -> Vec<AnchorPlacement> {
        self.anchors
            .iter()
            .map(|anchor| AnchorPlacement {
                overlay: anchor.overlay,
                offset: context.project(&anchor.position),
                visible: context.is_visible(&anchor.position),
            })
            .collect()
    }

    /// Recompute and apply every anchor, dropping those whose overlay
    /// element no longer exists. Nothing carries over between frames.
    pub fn update(&mut self, context: &RenderContext, surface: &mut impl OverlaySurface) {
        self.anchors.retain(|anchor| {
            let live = surface.is_live(anchor.overlay);
            if !live {
                debug!("dropping anchor for dead overlay {}", anchor.overlay.0);
            }
            live
        });

        for anchor in &self.anchors {
            surface.place(anchor.overlay, context.project(&anchor.position));
            surface.set_active(anchor.overlay, context.is_visible(&anchor.position));
        }
    }
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::scene::SceneObject;
    use crate::transform::ObjectTransform;
    use nalgebra::Vector3;
    use std::collections::HashSet;

    /// Camera at the origin looking straight down -Z
    fn test_camera() -> Camera {
        let mut camera = Camera::new(100, 100);
        camera.position = Point3::origin();
        camera.target = Point3::new(0.0, 0.0, -1.0);
        camera
    }

    fn wall_at(z: f32) -> SceneObject {
        SceneObject::with_transform("wall", Mesh::plane(4.0, 4.0), ObjectTransform::at(0.0, 0.0, z))
    }

    struct RecordingSurface {
        live: HashSet<u32>,
        placed: Vec<(u32, ScreenOffset)>,
        activated: Vec<(u32, bool)>,
    }

    impl RecordingSurface {
        fn new(live: &[u32]) -> Self {
            Self {
                live: live.iter().copied().collect(),
                placed: Vec::new(),
                activated: Vec::new(),
            }
        }
    }

    impl OverlaySurface for RecordingSurface {
        fn is_live(&self, id: OverlayId) -> bool {
            self.live.contains(&id.0)
        }

        fn place(&mut self, id: OverlayId, offset: ScreenOffset) {
            self.placed.push((id.0, offset));
        }

        fn set_active(&mut self, id: OverlayId, active: bool) {
            self.activated.push((id.0, active));
        }
    }

    #[test]
    fn test_empty_scene_leaves_anchor_visible() {
        let camera = test_camera();
        let scene = Scene::new();
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);
        assert!(context.is_visible(&Point3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_wall_in_front_occludes() {
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_object(wall_at(-5.0));
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);
        assert!(!context.is_visible(&Point3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_wall_behind_does_not_occlude() {
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_object(wall_at(-15.0));
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);
        assert!(context.is_visible(&Point3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_exact_tie_counts_as_occluded() {
        // The wall passes exactly through the anchor point
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_object(wall_at(-10.0));
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);
        assert!(!context.is_visible(&Point3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_offset_scales_with_viewport() {
        let camera = test_camera();
        let scene = Scene::new();
        let point = Point3::new(1.0, 2.0, -10.0);

        let small = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);
        let wide = RenderContext::new(&camera, Viewport::new(200.0, 100.0), &scene);
        let a = small.project(&point);
        let b = wide.project(&point);

        assert!((b.x - 2.0 * a.x).abs() < 1e-4);
        assert!((b.y - a.y).abs() < 1e-6);
    }

    #[test]
    fn test_offset_flips_y() {
        // A point above the view center moves its overlay up (negative y)
        let camera = test_camera();
        let scene = Scene::new();
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);
        let offset = context.project(&Point3::new(0.0, 2.0, -10.0));
        assert!(offset.y < 0.0);
        assert!(offset.x.abs() < 1e-4);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_object(wall_at(-5.0));
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);

        let mut registry = AnchorRegistry::new();
        registry.add(Anchor::new(Point3::new(0.0, 0.0, -10.0), OverlayId(0)));
        registry.add(Anchor::new(Point3::new(1.5, 0.5, -3.0), OverlayId(1)));

        let first = registry.evaluate(&context);
        let second = registry.evaluate(&context);
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_places_and_activates() {
        let camera = test_camera();
        let mut scene = Scene::new();
        scene.add_object(wall_at(-5.0));
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);

        let mut registry = AnchorRegistry::new();
        registry.add(Anchor::new(Point3::new(0.0, 0.0, -10.0), OverlayId(7)));

        let mut surface = RecordingSurface::new(&[7]);
        registry.update(&context, &mut surface);

        assert_eq!(surface.placed.len(), 1);
        assert_eq!(surface.activated, vec![(7, false)]);
    }

    #[test]
    fn test_dead_overlay_is_pruned_without_panic() {
        let camera = test_camera();
        let scene = Scene::new();
        let context = RenderContext::new(&camera, Viewport::new(100.0, 100.0), &scene);

        let mut registry = AnchorRegistry::new();
        registry.add(Anchor::new(Point3::new(0.0, 1.0, -10.0), OverlayId(0)));
        registry.add(Anchor::new(Point3::new(0.0, -1.0, -10.0), OverlayId(1)));

        // Overlay 0 disappeared between frames
        let mut surface = RecordingSurface::new(&[1]);
        registry.update(&context, &mut surface);

        assert_eq!(registry.anchors.len(), 1);
        assert_eq!(registry.anchors[0].overlay, OverlayId(1));
        assert_eq!(surface.placed.len(), 1);
        assert_eq!(surface.placed[0].0, 1);

        // The next frame is back to normal
        registry.update(&context, &mut surface);
        assert_eq!(registry.anchors.len(), 1);
    }
}
