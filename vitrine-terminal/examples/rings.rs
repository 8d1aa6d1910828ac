/// Vitrine Terminal Demo - Ring Gallery
///
/// Five rings rest on pedestals in front of a showroom wall. Each ring
/// carries a marker that hides whenever scenery blocks its anchor.
/// Controls:
///   - Mouse: Glide the camera, spin the ring under the pointer
///   - Z: Zoom the gallery in and out
///   - C: Cycle the display color
///   - Q/ESC: Quit
use anyhow::Result;
use crossterm::{event::KeyCode, style::Color};
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;
use vitrine_core::{
    lerp, Anchor, Camera, Channel, Easing, Mesh, ObjectTransform, SceneObject, Tween,
};
use vitrine_terminal::{Controller, Stage, ViewerApp};

const PEDESTAL_COUNT: usize = 5;
const PEDESTAL_SPACING: f32 = 12.0;
/// How far the camera glides for a pointer at the viewport edge
const GLIDE_RANGE: f32 = 2.0;
/// Fraction of the remaining distance covered per frame
const GLIDE_RATE: f32 = 0.05;
const SPIN_DURATION: f32 = 0.8;
const ZOOM_DURATION: f32 = 0.8;
const ZOOM_NEAR: f32 = 40.0;
const ZOOM_FAR: f32 = 70.0;
const TINTS: &[Color] = &[Color::Cyan, Color::Blue, Color::Magenta, Color::White];

/// Pedestal index for any of its parts, so hovering the base spins the ring
fn pedestal_index(name: &str) -> Option<usize> {
    let (kind, index) = name.split_once('-')?;
    match kind {
        "ring" | "base" | "top" => index.parse().ok(),
        _ => None,
    }
}

struct RingsController {
    pointer: Option<(f32, f32)>,
    glide_target: f32,
    zoom: Option<Tween<f32>>,
    zoomed_out: bool,
    tint_index: usize,
}

impl RingsController {
    fn new() -> Self {
        Self {
            pointer: None,
            glide_target: 0.0,
            zoom: None,
            zoomed_out: false,
            tint_index: 0,
        }
    }
}

impl Controller for RingsController {
    fn on_key(&mut self, code: KeyCode, stage: &mut Stage) {
        match code {
            KeyCode::Char('z') => {
                // The direction flips at the keypress, so mashing Z
                // retargets the same tween instead of queueing races
                self.zoomed_out = !self.zoomed_out;
                let target = if self.zoomed_out { ZOOM_FAR } else { ZOOM_NEAR };
                self.zoom = Some(Tween::new(
                    stage.camera.position.z,
                    target,
                    ZOOM_DURATION,
                    Easing::QuartInOut,
                ));
            }
            KeyCode::Char('c') => {
                self.tint_index = (self.tint_index + 1) % TINTS.len();
                stage.tint = TINTS[self.tint_index];
            }
            _ => {}
        }
    }

    fn on_pointer(&mut self, ndc_x: f32, ndc_y: f32, _stage: &mut Stage) {
        self.pointer = Some((ndc_x, ndc_y));
        self.glide_target = ndc_x * GLIDE_RANGE;
    }

    fn tick(&mut self, stage: &mut Stage, _elapsed: f64, dt: f32) {
        // Ease the camera toward the pointer, panning rather than turning
        stage.camera.position.x = lerp(stage.camera.position.x, self.glide_target, GLIDE_RATE);
        stage.camera.target.x = stage.camera.position.x;

        if let Some(tween) = &mut self.zoom {
            stage.camera.position.z = tween.advance(dt);
            if tween.finished() {
                self.zoom = None;
            }
        }

        // Spin the ring under the pointer
        if let Some((ndc_x, ndc_y)) = self.pointer {
            let ray = match stage.camera.screen_ray(ndc_x, ndc_y) {
                Some(ray) => ray,
                None => return,
            };
            if let Some(hit) = stage.scene.cast_ray(&ray) {
                let name = stage.scene.objects[hit.object].name.clone();
                if let Some(index) = pedestal_index(&name) {
                    let ring = format!("ring-{}", index);
                    if !stage.animator.is_animating(&ring, Channel::Rotation) {
                        if let Some(object) = stage.scene.get(&ring) {
                            let from = object.transform.rotation;
                            let to = from + Vector3::new(0.0, 2.0 * PI, 0.0);
                            stage.animator.animate(
                                &ring,
                                Channel::Rotation,
                                from,
                                to,
                                SPIN_DURATION,
                                Easing::QuartInOut,
                            );
                        }
                    }
                }
            }
        }
    }

    fn status(&self, _stage: &Stage) -> String {
        let zoom = if self.zoomed_out { "out" } else { "in" };
        format!("Hover=Spin | Z=Zoom ({}) C=Color", zoom)
    }
}

fn build_stage() -> Stage {
    let mut camera = Camera::new(80, 24);
    camera.position = Point3::new(0.0, 4.0, 40.0);
    camera.target = Point3::new(0.0, 4.0, 0.0);
    camera.fov = 45.0_f32.to_radians();
    camera.near = 0.1;
    camera.far = 100.0;

    let mut stage = Stage::new(camera);

    stage.scene.add_object(SceneObject::with_transform(
        "wall",
        Mesh::plane(256.0, 256.0),
        ObjectTransform::at(0.0, 0.0, -20.0),
    ));

    let half = (PEDESTAL_COUNT / 2) as f32;
    for index in 0..PEDESTAL_COUNT {
        let x = (index as f32 - half) * PEDESTAL_SPACING;

        stage.scene.add_object(SceneObject::with_transform(
            &format!("ring-{}", index),
            Mesh::torus(2.5, 0.1, 8, 24),
            ObjectTransform::at(x, -0.2, -14.0),
        ));
        stage.scene.add_object(SceneObject::with_transform(
            &format!("base-{}", index),
            Mesh::cylinder(3.0, 1.0, 24),
            ObjectTransform::at(x, -4.0, -14.0),
        ));
        stage.scene.add_object(SceneObject::with_transform(
            &format!("top-{}", index),
            Mesh::cylinder(2.7, 0.9, 24),
            ObjectTransform::at(x, -3.25, -14.0),
        ));

        let label = format!("ring {}", index + 1);
        let overlay = stage.overlay.register(&label);
        stage.anchors.add(Anchor::new(Point3::new(x, 3.0, -14.0), overlay));
    }

    stage
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("Vitrine Terminal - Ring Gallery (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let stage = build_stage();
    let mut app = ViewerApp::new("Vitrine Rings", stage, RingsController::new())?;
    app.run()?;

    Ok(())
}
