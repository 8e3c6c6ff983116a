use clap::{Parser, Subcommand, ValueEnum};
use deskscene_common::Uniform;
use deskscene_input::{HeldKeys, ViewAction};
use deskscene_render::RecordingBackend;
use deskscene_scene::{LampRig, SceneComposer, scene_materials};
use deskscene_view::ViewController;
use glam::Vec3;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deskscene-cli", about = "Headless inspection of the desk scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compose one frame and print its draw list
    Frame {
        /// View preset applied before the frame
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,
        /// Print the draw list as JSON
        #[arg(long)]
        json: bool,
        /// Texture directory
        #[arg(long, default_value = "textures")]
        textures: PathBuf,
    },
    /// Print the material presets
    Materials,
    /// Print the lamp joint chain
    Lamp,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Perspective,
    Ortho,
    Front,
    Top,
    Side,
}

impl From<Preset> for ViewAction {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Perspective => ViewAction::Perspective,
            Preset::Ortho => ViewAction::Orthographic,
            Preset::Front => ViewAction::FrontView,
            Preset::Top => ViewAction::TopView,
            Preset::Side => ViewAction::SideView,
        }
    }
}

/// One row of the JSON frame dump.
#[derive(Serialize)]
struct DrawSummary {
    index: usize,
    name: &'static str,
    primitive: &'static str,
    translation: Vec3,
    texture_slot: Option<i32>,
    shininess: Option<f32>,
}

fn dump_frame(preset: Option<Preset>, json: bool, textures: PathBuf) -> anyhow::Result<()> {
    let mut backend = RecordingBackend::new();
    let mut scene = SceneComposer::new(textures);
    let loaded = scene.prepare_scene(&mut backend);

    let now = Instant::now();
    let mut view = ViewController::new(now);
    if let Some(preset) = preset {
        view.apply_action(preset.into());
    }
    view.prepare_frame(now, &HeldKeys::new(), &mut backend);
    let draws = scene.render_scene(&mut backend);
    tracing::info!(draws, loaded, "frame composed");

    if !json {
        print!("{}", backend.describe());
        println!("{draws} draws, {loaded} textures loaded");
        return Ok(());
    }

    let rows: Vec<DrawSummary> = backend
        .draws()
        .iter()
        .zip(scene.placements())
        .enumerate()
        .map(|(index, (draw, placement))| DrawSummary {
            index,
            name: placement.name,
            primitive: draw.kind.name(),
            translation: placement.transform.translation,
            texture_slot: draw
                .uses_texture()
                .then(|| draw.uniforms.int(Uniform::ObjectTexture))
                .flatten(),
            shininess: draw.uniforms.float(Uniform::MaterialShininess),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("deskscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", deskscene_common::crate_info());
            println!("input: {}", deskscene_input::crate_info());
            println!("render: {}", deskscene_render::crate_info());
            println!("view: {}", deskscene_view::crate_info());
            println!("scene: {}", deskscene_scene::crate_info());
        }
        Commands::Frame {
            preset,
            json,
            textures,
        } => dump_frame(preset, json, textures)?,
        Commands::Materials => {
            println!(
                "{:<12} {:>8} {:>8} {:>8} {:>8} {:>9}",
                "tag", "amb_str", "ambient", "diffuse", "specular", "shininess"
            );
            for m in scene_materials() {
                println!(
                    "{:<12} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>9.1}",
                    m.tag,
                    m.ambient_strength,
                    m.ambient_color.x,
                    m.diffuse_color.x,
                    m.specular_color.x,
                    m.shininess
                );
            }
        }
        Commands::Lamp => {
            let pose = LampRig::default().solve();
            for (joint, p) in [
                ("shoulder", pose.shoulder),
                ("elbow", pose.elbow),
                ("head", pose.head),
                ("shade", pose.shade),
                ("bulb", pose.bulb),
            ] {
                println!("{joint:<8} ({:>8.4}, {:>8.4}, {:>8.4})", p.x, p.y, p.z);
            }
        }
    }

    Ok(())
}
