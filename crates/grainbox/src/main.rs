//! Grainbox - falling-sand sandbox

use std::path::PathBuf;

use clap::Parser;
use grainbox::stress::PerfMonitor;
use grainbox::{snapshot, BrushSettings, GrainboxConfig, PaintSpec, Script, Session};
use grainbox_core::simulation::Material;
use grainbox_core::world::World;
use web_time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (RON); defaults to ./grainbox.ron when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// World width in cells
    #[arg(long)]
    width: Option<usize>,

    /// World height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Number of frames to simulate
    #[arg(long)]
    frames: Option<u64>,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Spawn random materials every frame and report frame rates
    #[arg(long)]
    stress: bool,

    /// Paint a blob before the first frame: x,y,radius,material (repeatable)
    #[arg(long, value_name = "X,Y,RADIUS,MATERIAL")]
    paint: Vec<PaintSpec>,

    /// RON script of commands to replay
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the final world to this PNG file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pixels per cell in the PNG snapshot
    #[arg(long)]
    scale: Option<u32>,
}

impl Args {
    /// Command-line flags win over file and environment settings
    fn apply_to(&self, config: &mut GrainboxConfig) {
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(frames) = self.frames {
            config.run.frames = frames;
        }
        if self.stress {
            config.run.stress = true;
        }
        if let Some(scale) = self.scale {
            config.snapshot.scale = scale;
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = GrainboxConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate()?;

    log::info!("Starting Grainbox");

    let seed = args.seed.unwrap_or_else(rand::random);
    let world = World::new(config.world.width, config.world.height)?;
    let brush = BrushSettings::from_config(&config.brush)?;

    let mut session = Session::new(world, brush, seed);
    if config.run.stress {
        log::info!("Stress mode enabled");
        session = session.with_stress();
    }

    for spec in &args.paint {
        session.paint_spec(spec);
    }

    let script = match &args.script {
        Some(path) => Script::from_file(path)?,
        None => Script::default(),
    };

    if let Some(last) = script.last_frame() {
        if last >= config.run.frames {
            log::warn!(
                "Script has steps up to frame {} but only {} frames will run",
                last,
                config.run.frames
            );
        }
    }

    let started = Instant::now();
    let summary = session.run(config.run.frames, &script);
    let elapsed = started.elapsed();

    log::info!(
        "Ran {} frames ({} ticks, {} idle) in {:.2?}: {} moved, {} erased, {} cloned",
        summary.frames,
        summary.ticks,
        summary.idle_ticks,
        elapsed,
        summary.cells_moved,
        summary.cells_erased,
        summary.cells_cloned
    );
    for material in Material::ALL.into_iter().filter(|m| !m.is_empty()) {
        log::info!("  {}: {} cells", material, session.world().count(material));
    }
    log::info!("{}", session.status_line());
    if let Some(perf) = session.perf().and_then(PerfMonitor::summary) {
        log::info!("Performance: {}", perf);
    }

    if let Some(output) = &args.output {
        snapshot::save_png(session.world(), output, config.snapshot.scale)?;
    }

    Ok(())
}
