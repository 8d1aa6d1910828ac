/// Vitrine Web - DOM overlay frontend
///
/// The host page renders the scene however it likes; Vitrine owns the
/// choreography and keeps the page's marker elements glued to their
/// anchors, deactivating each one while geometry blocks its view.
use nalgebra::{Point3, Vector3};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use vitrine_core::{
    lerp, Anchor, AnchorRegistry, Animator, Camera, Channel, EventThrottle, Mesh,
    ObjectTransform, OverlayId, OverlaySurface, RenderContext, Scene, SceneObject, ScreenOffset,
    Showcase, Variant, VariantPose, Viewport,
};

/// Every frame style rests at this uniform scale
const FRAME_SCALE: f32 = 1.5;
/// How far the camera glides for a pointer at the viewport edge
const GLIDE_RANGE: f32 = 2.0;
/// Fraction of the remaining distance covered per frame
const GLIDE_RATE: f32 = 0.05;
/// How long a burst of resize events is coalesced for, in seconds
const RESIZE_THROTTLE: f64 = 0.1;

/// Idle sway per style: (object, position factor, rotation factor)
const BOB_MOTIONS: &[(&str, f32, f32)] = &[
    ("oval", 0.0015, 0.0005),
    ("boston", 0.0027, 0.0015),
    ("teardrop", 0.002, 0.0015),
    ("square", 0.0022, 0.0011),
    ("round", 0.0014, 0.0012),
    ("fox", 0.0016, 0.001),
];

struct DomMarker {
    id: OverlayId,
    element: HtmlElement,
}

/// Overlay surface backed by the page's own elements.
///
/// Placement writes a CSS translate relative to the viewport center and
/// reachability toggles the `is-active` class, leaving all styling to
/// the page. An element removed from the document turns its handle
/// stale, which the next anchor update prunes.
struct DomOverlay {
    markers: Vec<DomMarker>,
    next_id: u32,
    shown: bool,
}

impl DomOverlay {
    fn new() -> Self {
        Self {
            markers: Vec::new(),
            next_id: 0,
            shown: true,
        }
    }

    fn register(&mut self, element: HtmlElement) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.markers.push(DomMarker { id, element });
        id
    }
}

impl OverlaySurface for DomOverlay {
    fn is_live(&self, id: OverlayId) -> bool {
        match self.markers.iter().find(|marker| marker.id == id) {
            Some(marker) => marker.element.is_connected(),
            None => false,
        }
    }

    fn place(&mut self, id: OverlayId, offset: ScreenOffset) {
        if let Some(marker) = self.markers.iter().find(|marker| marker.id == id) {
            let transform = format!("translate({}px, {}px)", offset.x, offset.y);
            let _ = marker
                .element
                .style()
                .set_property("transform", &transform);
        }
    }

    fn set_active(&mut self, id: OverlayId, active: bool) {
        if let Some(marker) = self.markers.iter().find(|marker| marker.id == id) {
            let class_list = marker.element.class_list();
            let _ = if active && self.shown {
                class_list.add_1("is-active")
            } else {
                class_list.remove_1("is-active")
            };
        }
    }
}

fn shelf_variant(name: &str, position: [f32; 3], rotation: [f32; 3], anchor: [f32; 3]) -> Variant {
    Variant::new(
        name,
        VariantPose::new(
            Vector3::new(position[0], position[1], position[2]),
            Vector3::new(rotation[0], rotation[1], rotation[2]),
            Vector3::new(FRAME_SCALE, FRAME_SCALE, FRAME_SCALE),
        ),
        Point3::new(anchor[0], anchor[1], anchor[2]),
    )
}

/// The standard collection: six styles on a two-row shelf
fn catalog() -> Vec<Variant> {
    vec![
        shelf_variant("boston", [-9.0, 4.0, 0.0], [2.0, 0.0, 0.2], [-6.5, 3.0, 0.0]),
        shelf_variant("oval", [-1.0, 4.0, 0.0], [2.0, 0.0, 0.6], [1.6, 3.0, 0.0]),
        shelf_variant("teardrop", [8.0, 4.0, -1.0], [2.0, 0.0, 1.0], [10.0, 3.0, 0.0]),
        shelf_variant("square", [-10.0, -4.0, -1.0], [1.7, 0.0, 0.3], [-6.5, -2.5, 0.0]),
        shelf_variant("round", [-1.0, -4.0, 0.0], [1.7, 0.0, 0.6], [1.6, -2.5, 0.0]),
        shelf_variant("fox", [8.0, -4.0, -1.0], [1.7, 0.0, 1.0], [10.0, -2.5, 0.0]),
    ]
}

/// Two lenses joined by a bridge
fn eyewear_frame(lens: Mesh) -> Mesh {
    let mut frame = Mesh::new();
    frame.merge(lens.transformed(&ObjectTransform::at(-1.1, 0.0, 0.0).matrix()));
    frame.merge(lens.transformed(&ObjectTransform::at(1.1, 0.0, 0.0).matrix()));
    frame.merge(Mesh::cuboid(0.7, 0.12, 0.12));
    frame
}

fn variant_mesh(name: &str) -> Mesh {
    let lens = match name {
        "boston" => Mesh::torus(0.85, 0.14, 8, 24),
        "oval" => Mesh::torus(0.9, 0.12, 8, 24),
        "teardrop" => Mesh::torus(0.8, 0.12, 8, 20),
        "round" => Mesh::torus(0.95, 0.1, 8, 24),
        "fox" => Mesh::torus(0.75, 0.1, 8, 20),
        _ => Mesh::cuboid(1.5, 1.0, 0.12),
    };
    eyewear_frame(lens)
}

/// Showcase scene driven from the browser
#[wasm_bindgen]
pub struct WebShowcase {
    scene: Scene,
    camera: Camera,
    anchors: AnchorRegistry,
    animator: Animator,
    overlay: DomOverlay,
    showcase: Showcase,
    viewport: Viewport,
    resize_events: EventThrottle<(f32, f32)>,
    pointer: (f32, f32),
}

#[wasm_bindgen]
impl WebShowcase {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebShowcase, JsValue> {
        let variants = catalog();
        let featured = VariantPose::new(
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(2.0, 0.0, 0.6),
            Vector3::new(FRAME_SCALE, FRAME_SCALE, FRAME_SCALE),
        );

        let mut camera = Camera::new(width as u32, height as u32);
        camera.position = Point3::new(0.0, 0.0, 9.0);
        camera.fov = 75.0_f32.to_radians();

        let mut scene = Scene::new();
        for variant in &variants {
            scene.add_object(SceneObject::new(&variant.name, variant_mesh(&variant.name)));
        }

        let showcase = Showcase::new(variants, featured);
        showcase.apply_resting(&mut scene);

        Ok(WebShowcase {
            scene,
            camera,
            anchors: AnchorRegistry::new(),
            animator: Animator::new(),
            overlay: DomOverlay::new(),
            showcase,
            viewport: Viewport::new(width, height),
            resize_events: EventThrottle::new(RESIZE_THROTTLE),
            pointer: (0.0, 0.0),
        })
    }

    /// Glue a page element to a style's anchor point
    #[wasm_bindgen(js_name = bindMarker)]
    pub fn bind_marker(&mut self, name: &str, dom_id: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let element = document
            .get_element_by_id(dom_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {}", dom_id)))?;
        let element: HtmlElement = element
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("{} is not an HTML element", dom_id)))?;

        let position = self
            .showcase
            .variants
            .iter()
            .find(|variant| variant.name == name)
            .map(|variant| variant.anchor_position)
            .ok_or_else(|| JsValue::from_str(&format!("unknown style {}", name)))?;

        let overlay = self.overlay.register(element);
        self.anchors.add(Anchor::new(position, overlay));
        Ok(())
    }

    /// Advance one frame. `now` is in seconds, `dt` since the last frame.
    pub fn frame(&mut self, now: f64, dt: f32) {
        if let Some((width, height)) = self.resize_events.poll(now) {
            self.apply_resize(width, height);
        }

        // Ease the camera toward the pointer, panning rather than turning
        self.camera.position.x = lerp(self.camera.position.x, self.pointer.0 * GLIDE_RANGE, GLIDE_RATE);
        self.camera.target.x = self.camera.position.x;

        self.apply_bob(now);
        self.animator.step(&mut self.scene, dt);

        let context = RenderContext::new(&self.camera, self.viewport, &self.scene);
        self.anchors.update(&context, &mut self.overlay);
    }

    /// Pointer position in normalized device coordinates
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, ndc_x: f32, ndc_y: f32) {
        self.pointer = (ndc_x, ndc_y);
    }

    /// Viewport size change; bursts are coalesced to one per window
    pub fn resize(&mut self, width: f32, height: f32, now: f64) {
        if let Some((width, height)) = self.resize_events.offer((width, height), now) {
            self.apply_resize(width, height);
        }
    }

    /// Bring a style front and center; the others shrink away
    pub fn select(&mut self, name: &str) -> bool {
        let selected = self
            .showcase
            .select(name, &self.scene, &mut self.animator);
        if selected {
            self.overlay.shown = false;
        }
        selected
    }

    /// Send every style back to its resting pose
    pub fn reset(&mut self) {
        self.showcase.reset(&self.scene, &mut self.animator);
        self.overlay.shown = true;
    }

    /// Name of the featured style, if one is selected
    pub fn selected(&self) -> Option<String> {
        self.showcase.selected().map(|variant| variant.name.clone())
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }
}

impl WebShowcase {
    fn apply_resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.camera.aspect = width / height;
    }

    fn apply_bob(&mut self, now: f64) {
        let sway = now.sin() as f32;
        let turn = now.cos() as f32;
        for (name, position_factor, rotation_factor) in BOB_MOTIONS {
            // Leave objects alone while a select or reset tween owns them
            if self.animator.is_animating(name, Channel::Position)
                || self.animator.is_animating(name, Channel::Rotation)
            {
                continue;
            }
            if let Some(object) = self.scene.get_mut(name) {
                object.transform.position.y += sway * position_factor;
                object.transform.rotation.y += turn * rotation_factor;
            }
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_distinct_styles() {
        let variants = catalog();
        assert_eq!(variants.len(), 6);
        for (i, a) in variants.iter().enumerate() {
            for b in &variants[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.anchor_position, b.anchor_position);
            }
        }
    }

    #[test]
    fn test_catalog_styles_rest_at_uniform_scale() {
        for variant in catalog() {
            assert_eq!(variant.resting.scale.x, FRAME_SCALE);
            assert_eq!(variant.resting.scale.y, FRAME_SCALE);
            assert_eq!(variant.resting.scale.z, FRAME_SCALE);
        }
    }

    #[test]
    fn test_variant_meshes_are_nonempty() {
        for variant in catalog() {
            assert!(!variant_mesh(&variant.name).triangles.is_empty());
        }
    }
}
