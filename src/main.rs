use std::f32::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flatland::{
    AppConfig, Color, KeyCode, LoggingConfig, Shape, ShapeKind, Step, Transform, Vec3, Vertex,
    init_logging, math,
};

const MOVEMENT_SPEED: f32 = 0.5;
const DEBRIS_COUNT: usize = 10;
/// Height falling debris respawns at once it reaches the ground.
const RESPAWN_HEIGHT: f32 = 1.2;

#[derive(Parser)]
#[command(
    name = "flatland",
    about = "Flatland demo: WASD moves the triangle, Q/E rotate it"
)]
struct Cli {
    /// Log at debug level instead of RUST_LOG / info
    #[arg(short, long)]
    verbose: bool,
    /// Directory holding the WGSL shaders
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))]
    shader_dir: PathBuf,
    /// Fixed update rate
    #[arg(long, default_value_t = 30)]
    steps_per_second: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(if cli.verbose {
        LoggingConfig::with_filter("debug,wgpu_core=warn,wgpu_hal=warn,naga=warn")
    } else {
        LoggingConfig::default()
    });

    let config = AppConfig::new()
        .title("Flatland")
        .size(800, 800)
        .steps_per_second(cli.steps_per_second);
    let shader_dir = cli.shader_dir;

    flatland::run_with_config(config, move |ctx| {
        let material = ctx.material(
            shader_dir.join("world-position-color.vert.wgsl"),
            shader_dir.join("vertex-color.frag.wgsl"),
        )?;

        let mut player = Shape::triangle(material);
        player.transform.scale = Vec3::new(0.5, 1.0, 1.0);
        player.body.gravity_scale = 0.0;
        let player = ctx.scene.add(player);

        let mut ground = Shape::rectangle(material);
        ground.transform = Transform::from_position(Vec3::new(0.0, -1.0, 0.0))
            .scale(Vec3::new(20.0, 1.0, 1.0));
        ground.set_mass(f32::INFINITY)?;
        let ground = ctx.scene.add(ground);

        let mut enemy = Shape::rectangle(material);
        enemy.transform.position = Vec3::new(0.5, 0.5, 0.0);
        enemy.body.gravity_scale = 0.0;
        let enemy = ctx.scene.add(enemy);

        let mut circle = Shape::circle(material);
        circle.transform.position = Vec3::new(0.0, 0.7, 0.0);
        circle.body.gravity_scale = 0.0;
        let circle_direction = math::normalize(circle.transform.position);
        let circle = ctx.scene.add(circle);

        let mut debris = Vec::with_capacity(DEBRIS_COUNT);
        for i in 0..DEBRIS_COUNT {
            let mut shape = Shape::from_vertices(
                ShapeKind::Triangle,
                vec![
                    Vertex::new(Vec3::new(-0.1, 0.0, 0.0), Color::RED),
                    Vertex::new(Vec3::new(0.1, 0.0, 0.0), Color::GREEN),
                    Vertex::new(Vec3::new(0.0, 0.133, 0.0), Color::BLUE),
                ],
                material,
            )?;
            let t = i as f32 / DEBRIS_COUNT as f32;
            shape.transform = Transform::from_position(Vec3::new(-0.9 + 1.8 * t, 0.3 + t, 0.0))
                .rotation(t * 2.0 * PI)
                .uniform_scale(0.5);
            shape.set_mass(1.0 + t)?;
            debris.push(ctx.scene.add(shape));
        }

        Ok(move |step: &mut Step| {
            let Some(ground_top) = step
                .scene
                .get(ground)
                .and_then(|g| g.max_bounds().ok())
                .map(|max| max.y)
            else {
                return;
            };
            for &id in &debris {
                let Some(shape) = step.scene.get_mut(id) else {
                    continue;
                };
                if shape.min_bounds().is_ok_and(|min| min.y <= ground_top) {
                    shape.transform.position.y = RESPAWN_HEIGHT;
                    shape.body.velocity = Vec3::ZERO;
                }
            }

            let Some(shape) = step.scene.get(player) else {
                return;
            };
            let forward = shape.transform.forward();
            let position = shape.transform.position;

            if let Some(enemy) = step.scene.get_mut(enemy) {
                let to_enemy = enemy.transform.position - position;
                enemy.set_color(if to_enemy.dot(forward) > 0.0 {
                    Color::GREEN
                } else {
                    Color::RED
                });
            }

            let mut walk = Vec3::ZERO;
            let mut turn = 0.0;
            if step.key_down(KeyCode::KeyW) {
                walk += forward;
            }
            if step.key_down(KeyCode::KeyS) {
                walk -= forward;
            }
            if step.key_down(KeyCode::KeyA) {
                walk += math::LEFT;
            }
            if step.key_down(KeyCode::KeyD) {
                walk += math::RIGHT;
            }
            if step.key_down(KeyCode::KeyQ) {
                turn += PI * step.dt;
            }
            if step.key_down(KeyCode::KeyE) {
                turn -= PI * step.dt;
            }

            let Some(shape) = step.scene.get_mut(player) else {
                return;
            };
            shape.transform.rotate(turn);
            shape
                .transform
                .move_by(math::normalize(walk) * MOVEMENT_SPEED * step.dt);
            let forward = math::normalize(shape.transform.forward());

            // Brighter the further the player faces away from the circle.
            let angle = forward.dot(circle_direction).clamp(-1.0, 1.0).acos();
            if let Some(circle) = step.scene.get_mut(circle) {
                circle.set_color(Color::grey(angle / PI));
            }
        })
    })
    .context("flatland demo failed")?;

    Ok(())
}
