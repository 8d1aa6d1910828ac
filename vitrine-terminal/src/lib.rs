/// Terminal frontend for showcase scenes with anchored overlay markers
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;
use vitrine_core::{
    AnchorRegistry, Animator, Camera, EventThrottle, OverlayId, OverlaySurface, RenderContext,
    Scene, ScreenOffset, Viewport,
};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// How long a burst of terminal resize events is coalesced for, in seconds
const RESIZE_THROTTLE: f64 = 0.1;

/// A text label anchored near a scene position
struct OverlayLabel {
    id: OverlayId,
    text: String,
    offset: ScreenOffset,
    active: bool,
}

/// Overlay surface backed by terminal cells
///
/// Labels are addressed by the handle returned from `register` and drawn
/// relative to the viewport center once an anchor update activates them.
pub struct TermOverlay {
    labels: Vec<OverlayLabel>,
    next_id: u32,
    /// Master switch for the whole layer
    pub shown: bool,
}

impl TermOverlay {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            next_id: 0,
            shown: true,
        }
    }

    pub fn register(&mut self, text: &str) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.labels.push(OverlayLabel {
            id,
            text: text.to_string(),
            offset: ScreenOffset { x: 0.0, y: 0.0 },
            active: false,
        });
        id
    }

    /// Destroy a label; its handle becomes stale
    pub fn remove(&mut self, id: OverlayId) {
        self.labels.retain(|label| label.id != id);
    }

    pub fn draw<W: Write>(&self, writer: &mut W, width: u16, height: u16) -> io::Result<()> {
        if !self.shown {
            return Ok(());
        }
        for label in &self.labels {
            if !label.active {
                continue;
            }
            let col = (width as f32 / 2.0 + label.offset.x).round() as i32;
            let row = (height as f32 / 2.0 + label.offset.y).round() as i32;
            if col < 0 || col >= width as i32 || row < 0 || row >= height as i32 {
                continue;
            }
            queue!(
                writer,
                cursor::MoveTo(col as u16, row as u16),
                SetForegroundColor(Color::Yellow),
                Print(&label.text),
                ResetColor
            )?;
        }
        Ok(())
    }
}

impl OverlaySurface for TermOverlay {
    fn is_live(&self, id: OverlayId) -> bool {
        self.labels.iter().any(|label| label.id == id)
    }

    fn place(&mut self, id: OverlayId, offset: ScreenOffset) {
        if let Some(label) = self.labels.iter_mut().find(|label| label.id == id) {
            label.offset = offset;
        }
    }

    fn set_active(&mut self, id: OverlayId, active: bool) {
        if let Some(label) = self.labels.iter_mut().find(|label| label.id == id) {
            label.active = active;
        }
    }
}

impl Default for TermOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a frame operates on: the scene, its camera, the anchors
/// pinned into it and the overlay they project onto
pub struct Stage {
    pub scene: Scene,
    pub camera: Camera,
    pub anchors: AnchorRegistry,
    pub animator: Animator,
    pub overlay: TermOverlay,
    pub tint: Color,
}

impl Stage {
    pub fn new(camera: Camera) -> Self {
        Self {
            scene: Scene::new(),
            camera,
            anchors: AnchorRegistry::new(),
            animator: Animator::new(),
            overlay: TermOverlay::new(),
            tint: Color::Cyan,
        }
    }
}

/// Per-demo input handling and frame logic
pub trait Controller {
    fn on_key(&mut self, code: KeyCode, stage: &mut Stage);

    fn on_pointer(&mut self, _ndc_x: f32, _ndc_y: f32, _stage: &mut Stage) {}

    /// Called once per frame before the scene is drawn
    fn tick(&mut self, stage: &mut Stage, elapsed: f64, dt: f32);

    fn status(&self, _stage: &Stage) -> String {
        String::new()
    }
}

/// Main application struct for terminal showcase rendering
pub struct ViewerApp<C: Controller> {
    title: String,
    stage: Stage,
    controller: C,
    renderer: AsciiRenderer,
    resize_events: EventThrottle<(u16, u16)>,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl<C: Controller> ViewerApp<C> {
    pub fn new(title: &str, mut stage: Stage, controller: C) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        stage.camera.aspect = width as f32 / height as f32;

        Ok(Self {
            title: title.to_string(),
            stage,
            controller,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            resize_events: EventThrottle::new(RESIZE_THROTTLE),
            running: true,
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = (frame_start - last_tick).as_secs_f32();
            last_tick = frame_start;

            // Handle input, draining bursts of pointer events
            while event::poll(Duration::from_millis(0))? {
                self.handle_event()?;
            }

            // Release a resize held back by the throttle window
            let now = self.started.elapsed().as_secs_f64();
            if let Some((width, height)) = self.resize_events.poll(now) {
                self.apply_resize(width, height);
            }

            // Update
            let elapsed = self.started.elapsed().as_secs_f64();
            self.controller.tick(&mut self.stage, elapsed, dt);
            self.stage.animator.step(&mut self.stage.scene, dt);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let spent = frame_start.elapsed();
            if spent < target_frame_time {
                std::thread::sleep(target_frame_time - spent);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                other => self.controller.on_key(other, &mut self.stage),
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column,
                row,
                ..
            }) => {
                let ndc_x = (column as f32 / self.renderer.width() as f32) * 2.0 - 1.0;
                let ndc_y = -((row as f32 / self.renderer.height() as f32) * 2.0 - 1.0);
                self.controller.on_pointer(ndc_x, ndc_y, &mut self.stage);
            }
            Event::Resize(width, height) => {
                let now = self.started.elapsed().as_secs_f64();
                if let Some((width, height)) = self.resize_events.offer((width, height), now) {
                    self.apply_resize(width, height);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_resize(&mut self, width: u16, height: u16) {
        debug!("resizing viewport to {}x{}", width, height);
        self.renderer.resize(width as usize, height as usize);
        self.stage.camera.aspect = width as f32 / height as f32;
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.set_tint(self.stage.tint);
        self.renderer.clear();

        // Render scene
        self.renderer.render_scene(&self.stage.scene, &self.stage.camera);

        // Re-anchor the overlay against the frame that was just drawn
        let viewport = Viewport::new(
            self.renderer.width() as f32,
            self.renderer.height() as f32,
        );
        let context = RenderContext::new(&self.stage.camera, viewport, &self.stage.scene);
        self.stage.anchors.update(&context, &mut self.stage.overlay);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;
        self.stage.overlay.draw(
            &mut stdout,
            self.renderer.width() as u16,
            self.renderer.height() as u16,
        )?;

        // Draw UI overlay
        let status = self.controller.status(&self.stage);
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("{} | FPS: {:.1} | {}", self.title, self.fps, status)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
