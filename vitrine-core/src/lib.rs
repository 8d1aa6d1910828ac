/// Vitrine Core Library - Showcase scenes with occlusion-aware overlay markers
///
/// This library provides the headless functionality for interactive 3D
/// showcases: geometry and transforms, camera projection, ray casting,
/// anchor tracking for overlay markers, tween choreography and OBJ loading.
/// Frontends own the actual output surface and drive everything per frame.

pub mod anchor;
pub mod camera;
pub mod geometry;
pub mod ray;
pub mod scene;
pub mod showcase;
pub mod throttle;
pub mod transform;
pub mod tween;
pub mod wavefront;

// Re-export commonly used types
pub use anchor::{
    Anchor, AnchorPlacement, AnchorRegistry, OverlayId, OverlaySurface, RenderContext,
    ScreenOffset, Viewport,
};
pub use camera::Camera;
pub use geometry::{Mesh, Triangle, Vertex};
pub use ray::{Ray, RayHit};
pub use scene::{Scene, SceneHit, SceneObject};
pub use showcase::{Showcase, Variant, VariantPose};
pub use throttle::EventThrottle;
pub use transform::ObjectTransform;
pub use tween::{lerp, Animator, Channel, Easing, Tween};
pub use wavefront::{load_obj, parse_obj, NamedMesh, ObjError};
