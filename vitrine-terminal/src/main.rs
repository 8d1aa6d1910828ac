/// Vitrine Terminal Demo - Eyewear Showcase
///
/// Six frame styles float on a virtual shelf, each tagged with a numbered
/// marker that hides whenever geometry blocks its anchor point.
/// Controls:
///   - 1-6: Bring a style front and center
///   - 0/R: Return everything to the shelf
///   - Q/ESC: Quit
use anyhow::Result;
use crossterm::event::KeyCode;
use nalgebra::{Point3, Vector3};
use tracing::info;
use vitrine_core::{
    load_obj, Anchor, Camera, Channel, Mesh, NamedMesh, ObjectTransform, SceneObject, Showcase,
    Variant, VariantPose,
};
use vitrine_terminal::{Controller, Stage, ViewerApp};

/// Every frame style rests at this uniform scale
const FRAME_SCALE: f32 = 1.5;

/// Gentle idle motion applied to one object while it is not tweening
struct BobMotion {
    object: String,
    position_factor: f32,
    rotation_factor: f32,
}

impl BobMotion {
    fn new(object: &str, position_factor: f32, rotation_factor: f32) -> Self {
        Self {
            object: object.to_string(),
            position_factor,
            rotation_factor,
        }
    }
}

struct EyewearController {
    showcase: Showcase,
    bob: Vec<BobMotion>,
}

impl Controller for EyewearController {
    fn on_key(&mut self, code: KeyCode, stage: &mut Stage) {
        match code {
            KeyCode::Char(digit @ '1'..='6') => {
                let index = digit as usize - '1' as usize;
                if index >= self.showcase.variants.len() {
                    return;
                }
                let name = self.showcase.variants[index].name.clone();
                if self.showcase.select(&name, &stage.scene, &mut stage.animator) {
                    stage.overlay.shown = false;
                }
            }
            KeyCode::Char('0') | KeyCode::Char('r') => {
                self.showcase.reset(&stage.scene, &mut stage.animator);
                stage.overlay.shown = true;
            }
            _ => {}
        }
    }

    fn tick(&mut self, stage: &mut Stage, elapsed: f64, _dt: f32) {
        let sway = elapsed.sin() as f32;
        let turn = elapsed.cos() as f32;
        for bob in &self.bob {
            // Leave objects alone while a select or reset tween owns them
            if stage.animator.is_animating(&bob.object, Channel::Position)
                || stage.animator.is_animating(&bob.object, Channel::Rotation)
            {
                continue;
            }
            if let Some(object) = stage.scene.get_mut(&bob.object) {
                object.transform.position.y += sway * bob.position_factor;
                object.transform.rotation.y += turn * bob.rotation_factor;
            }
        }
    }

    fn status(&self, _stage: &Stage) -> String {
        match self.showcase.selected() {
            Some(variant) => format!("Featured: {} | 0=Back", variant.name),
            None => String::from("1-6=Feature a style"),
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

/// Two lenses joined by a bridge
fn eyewear_frame(lens: Mesh) -> Mesh {
    let mut frame = Mesh::new();
    frame.merge(lens.transformed(&ObjectTransform::at(-1.1, 0.0, 0.0).matrix()));
    frame.merge(lens.transformed(&ObjectTransform::at(1.1, 0.0, 0.0).matrix()));
    frame.merge(Mesh::cuboid(0.7, 0.12, 0.12));
    frame
}

/// Mesh for one style: from the loaded OBJ when it names the style,
/// otherwise a procedural stand-in
fn variant_mesh(loaded: &[NamedMesh], name: &str) -> Mesh {
    if let Some(named) = loaded.iter().find(|named| named.name == name) {
        return named.mesh.clone();
    }
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

fn build_stage(obj_path: Option<&str>) -> Result<(Stage, EyewearController)> {
    let loaded = match obj_path {
        Some(path) => {
            info!("loading frame meshes from {}", path);
            load_obj(path)?
        }
        None => Vec::new(),
    };

    let variants = vec![
        shelf_variant("boston", [-9.0, 4.0, 0.0], [2.0, 0.0, 0.2], [-6.5, 3.0, 0.0]),
        shelf_variant("oval", [-1.0, 4.0, 0.0], [2.0, 0.0, 0.6], [1.6, 3.0, 0.0]),
        shelf_variant("teardrop", [8.0, 4.0, -1.0], [2.0, 0.0, 1.0], [10.0, 3.0, 0.0]),
        shelf_variant("square", [-10.0, -4.0, -1.0], [1.7, 0.0, 0.3], [-6.5, -2.5, 0.0]),
        shelf_variant("round", [-1.0, -4.0, 0.0], [1.7, 0.0, 0.6], [1.6, -2.5, 0.0]),
        shelf_variant("fox", [8.0, -4.0, -1.0], [1.7, 0.0, 1.0], [10.0, -2.5, 0.0]),
    ];
    let featured = VariantPose::new(
        Vector3::new(0.0, 0.0, 2.0),
        Vector3::new(2.0, 0.0, 0.6),
        Vector3::new(FRAME_SCALE, FRAME_SCALE, FRAME_SCALE),
    );

    let mut camera = Camera::new(80, 24);
    camera.position = Point3::new(0.0, 0.0, 9.0);
    camera.fov = 75.0_f32.to_radians();

    let mut stage = Stage::new(camera);
    for (index, variant) in variants.iter().enumerate() {
        stage.scene.add_object(SceneObject::new(
            &variant.name,
            variant_mesh(&loaded, &variant.name),
        ));
        let label = format!("[{}] {}", index + 1, variant.name);
        let overlay = stage.overlay.register(&label);
        stage.anchors.add(Anchor::new(variant.anchor_position, overlay));
    }

    let showcase = Showcase::new(variants, featured);
    showcase.apply_resting(&mut stage.scene);

    let bob = vec![
        BobMotion::new("oval", 0.0015, 0.0005),
        BobMotion::new("boston", 0.0027, 0.0015),
        BobMotion::new("teardrop", 0.002, 0.0015),
        BobMotion::new("square", 0.0022, 0.0011),
        BobMotion::new("round", 0.0014, 0.0012),
        BobMotion::new("fox", 0.0016, 0.001),
    ];

    Ok((stage, EyewearController { showcase, bob }))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    let obj_path = std::env::args().nth(1);

    println!("Vitrine Terminal - Loading...");
    let (stage, controller) = build_stage(obj_path.as_deref())?;

    println!("Starting terminal showcase (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = ViewerApp::new("Vitrine Eyewear", stage, controller)?;
    app.run()?;

    println!("Thank you for browsing the Vitrine collection!");
    Ok(())
}
