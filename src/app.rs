use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::color::Color;
use crate::error::{Error, RenderError};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::material::MaterialId;
use crate::physics::{EARTH_GRAVITY, Physics};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::time::FixedTimestep;

/// Context provided during app setup.
///
/// Build the initial scene here and load the materials shapes will use.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    pub scene: &'a mut Scene,
    pub physics: &'a mut Physics,
    renderer: &'a mut Renderer,
}

impl SetupContext<'_> {
    /// Compile a material from a vertex and fragment WGSL file.
    ///
    /// The files are watched and recompiled when they change on disk.
    pub fn material(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<MaterialId, RenderError> {
        self.renderer
            .load_material(self.gpu, vertex_path, fragment_path)
    }

    /// Set the color the surface is cleared to each frame.
    pub fn background_color(&mut self, color: Color) -> &mut Self {
        self.renderer.clear_color = color;
        self
    }
}

/// Context provided to the step closure once per fixed step.
pub struct Step<'a> {
    /// The scene, before this step's physics update.
    pub scene: &'a mut Scene,
    /// Key state for this step.
    pub input: &'a Input,
    /// Clock time of this step in seconds since the loop started.
    ///
    /// Advances by exactly `dt` from one step to the next, including between
    /// the catch-up steps of a single frame.
    pub time: f64,
    /// Fixed step length in seconds.
    pub dt: f32,
}

impl Step<'_> {
    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.input.key_down(key)
    }
}

/// Configuration for the app window and simulation.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub steps_per_second: u32,
    pub max_catch_up_steps: u32,
    pub gravity: Vec3,
    pub clear_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Flatland".to_string(),
            width: 800,
            height: 600,
            steps_per_second: 30,
            max_catch_up_steps: FixedTimestep::DEFAULT_MAX_STEPS,
            gravity: EARTH_GRAVITY,
            clear_color: Color::BLACK,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Fixed update rate. The step length is `1 / steps_per_second`.
    pub fn steps_per_second(mut self, steps: u32) -> Self {
        self.steps_per_second = steps;
        self
    }

    /// Most fixed steps run in one frame before the backlog is dropped.
    pub fn max_catch_up_steps(mut self, steps: u32) -> Self {
        self.max_catch_up_steps = steps;
        self
    }

    pub fn gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}

/// Run a Flatland application with setup and step closures.
///
/// `setup` runs once the window and GPU exist and returns the closure called
/// on every fixed step. Physics runs right after it, then the scene is drawn
/// once per frame.
///
/// # Example
/// ```no_run
/// use flatland::{KeyCode, Shape, Vec3};
///
/// flatland::run(|ctx| {
///     let material = ctx.material("shaders/world-position-color.vert.wgsl",
///                                 "shaders/vertex-color.frag.wgsl")?;
///     let player = ctx.scene.add(Shape::triangle(material));
///
///     Ok(move |step: &mut flatland::Step| {
///         if step.key_down(KeyCode::KeyW) {
///             if let Some(shape) = step.scene.get_mut(player) {
///                 shape.transform.move_by(Vec3::Y * step.dt);
///             }
///         }
///     })
/// })
/// .unwrap();
/// ```
pub fn run<S, F>(setup: S) -> Result<(), Error>
where
    S: FnOnce(&mut SetupContext) -> Result<F, Error> + 'static,
    F: FnMut(&mut Step) + 'static,
{
    run_with_config(AppConfig::default(), setup)
}

/// Run a Flatland application with custom configuration.
///
/// Returns when the window is closed, or with the first fatal error.
pub fn run_with_config<S, F>(config: AppConfig, setup: S) -> Result<(), Error>
where
    S: FnOnce(&mut SetupContext) -> Result<F, Error> + 'static,
    F: FnMut(&mut Step) + 'static,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FlatlandApp {
        state: AppState::Pending {
            config,
            setup: Some(Box::new(move |ctx: &mut SetupContext| -> Result<StepFn, Error> {
                let step_fn = setup(ctx)?;
                Ok(Box::new(step_fn) as StepFn)
            })),
        },
        error: None,
    };

    event_loop.run_app(&mut app)?;
    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

type StepFn = Box<dyn FnMut(&mut Step)>;
type SetupFn = Box<dyn FnOnce(&mut SetupContext) -> Result<StepFn, Error>>;

struct FlatlandApp {
    state: AppState,
    /// First fatal error; handed back from `run_with_config`.
    error: Option<Error>,
}

enum AppState {
    Pending {
        config: AppConfig,
        setup: Option<SetupFn>,
    },
    Running(Box<Running>),
    Stopped,
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    scene: Scene,
    physics: Physics,
    input: Input,
    clock: FixedTimestep,
    step_fn: StepFn,
    start_time: Instant,
}

impl Running {
    fn start(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
        setup: SetupFn,
    ) -> Result<Self, Error> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let mut renderer = Renderer::new(&gpu);
        renderer.clear_color = config.clear_color;
        let mut scene = Scene::new();
        let mut physics = Physics::new(config.gravity);

        let step_fn = {
            let mut ctx = SetupContext {
                gpu: &gpu,
                scene: &mut scene,
                physics: &mut physics,
                renderer: &mut renderer,
            };
            setup(&mut ctx)?
        };
        log::info!(
            "running with {} shapes at {} steps/s",
            scene.len(),
            config.steps_per_second
        );

        Ok(Self {
            window,
            gpu,
            renderer,
            scene,
            physics,
            input: Input::new(),
            clock: FixedTimestep::new(config.steps_per_second)
                .with_max_steps(config.max_catch_up_steps),
            step_fn,
            start_time: Instant::now(),
        })
    }

    /// Runs every due fixed step, then draws once.
    fn frame(&mut self) -> Result<(), RenderError> {
        let now = self.start_time.elapsed().as_secs_f64();
        let steps = self.clock.advance(now);
        let dt = self.clock.dt();

        for index in 0..steps {
            let mut step = Step {
                scene: &mut self.scene,
                input: &self.input,
                time: self.clock.step_time(index),
                dt,
            };
            (self.step_fn)(&mut step);
            self.physics.update(&mut self.scene, dt);
            self.input.end_step();
        }

        match self.renderer.render(&self.gpu, &self.scene) {
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                Ok(())
            }
            Err(RenderError::Surface(wgpu::SurfaceError::Timeout)) => {
                log::debug!("surface timed out, skipping frame");
                Ok(())
            }
            other => other,
        }
    }
}

impl FlatlandApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.state = AppState::Stopped;
        event_loop.exit();
    }
}

impl ApplicationHandler for FlatlandApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending { config, setup } = &mut self.state else {
            return;
        };
        let Some(setup) = setup.take() else {
            return;
        };

        match Running::start(event_loop, config, setup) {
            Ok(running) => {
                running.window.request_redraw();
                self.state = AppState::Running(Box::new(running));
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };

        running.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = running.frame() {
                    self.fail(event_loop, e.into());
                    return;
                }
                running.window.request_redraw();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_steps_thirty_times_a_second() {
        let config = AppConfig::default();
        assert_eq!(config.steps_per_second, 30);
        assert_eq!(config.max_catch_up_steps, 8);
        assert_eq!(config.gravity, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(config.clear_color, Color::BLACK);
    }

    #[test]
    fn config_builder_chains() {
        let config = AppConfig::new()
            .title("Demo")
            .size(1280, 720)
            .steps_per_second(60)
            .gravity(Vec3::ZERO);
        assert_eq!(config.title, "Demo");
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.steps_per_second, 60);
        assert_eq!(config.gravity, Vec3::ZERO);
    }
}
