// Headless front end: builds a grid, seeds it, runs it and saves it.
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use torus_life::{PatternLibrary, Preferences, Simulator, SizePreset, SpeedPreset};

/// Run Conway's Game of Life on a wrap-around grid.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Preferences file (JSON); defaults are used if it does not exist
    #[arg(long, value_name = "PATH", default_value = "preferences.json")]
    prefs: PathBuf,

    /// Grid width in cells (overrides preferences)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides preferences)
    #[arg(long)]
    height: Option<usize>,

    /// Pattern stamped at the grid centre (overrides preferences)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Saved game to load instead of stamping a pattern
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Write the final state here
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Generations to step one at a time
    #[arg(short = 'n', long, default_value_t = 0)]
    generations: u64,

    /// Run the clock for this many seconds after stepping
    #[arg(long, value_name = "SECONDS")]
    run_for: Option<f64>,

    /// Clock speed preset: Slow, Normal or Fast
    #[arg(long)]
    speed: Option<SpeedPreset>,

    /// Clock interval in milliseconds (overrides --speed)
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Cell size preset reported to the display: Small, Medium or Big
    #[arg(long)]
    size: Option<SizePreset>,

    /// Print the final grid
    #[arg(long)]
    print: bool,

    /// List the available patterns and exit
    #[arg(long)]
    list_patterns: bool,

    /// Write the effective settings back to the preferences file
    #[arg(long)]
    save_prefs: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_patterns {
        for (name, pattern) in PatternLibrary::global().patterns_by_name() {
            println!("{:<20} {}x{}", name, pattern.cols(), pattern.rows());
        }
        return Ok(());
    }

    let mut prefs = Preferences::load(&args.prefs)
        .with_context(|| format!("reading {}", args.prefs.display()))?;
    if let Some(width) = args.width {
        prefs.grid_width = width;
    }
    if let Some(height) = args.height {
        prefs.grid_height = height;
    }
    if let Some(pattern) = &args.pattern {
        prefs.default_pattern = pattern.clone();
    }
    if let Some(speed) = args.speed {
        prefs.speed = speed;
    }
    if let Some(size) = args.size {
        prefs.size = size;
    }

    let sim = Simulator::new(prefs.grid_width, prefs.grid_height)?;
    sim.set_speed(prefs.speed);
    if let Some(ms) = args.interval_ms {
        sim.set_interval(Duration::from_millis(ms))?;
    }
    log::info!(
        "Grid: {}x{}, cell size {}px, interval {:?}",
        prefs.grid_width,
        prefs.grid_height,
        prefs.size.cell_size(),
        sim.interval()
    );

    match &args.load {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            sim.load(&text)
                .with_context(|| format!("loading {}", path.display()))?;
        }
        None => sim.stamp(&prefs.default_pattern)?,
    }

    for _ in 0..args.generations {
        sim.step_once();
    }

    if let Some(secs) = args.run_for {
        let duration = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid run time {}", secs))?;
        sim.start();
        thread::sleep(duration);
        sim.stop();
    }

    log::info!(
        "Generation {}: {} live cells",
        sim.generation(),
        sim.live_count()
    );

    if args.print {
        sim.with_grid(|grid| print!("{}", grid));
    }

    if let Some(path) = &args.save {
        fs::write(path, sim.save()).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved to {}", path.display());
    }

    if args.save_prefs {
        prefs
            .save(&args.prefs)
            .with_context(|| format!("writing {}", args.prefs.display()))?;
    }

    Ok(())
}
