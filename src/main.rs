//! Star Catcher entry point
//!
//! Native builds run a headless autopilot game on a virtual clock. The browser
//! build is driven from JavaScript through `star_catcher::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use clap::Parser;

    use star_catcher::Driver;
    use star_catcher::settings::Settings;
    use star_catcher::sim::{Engine, ManualClock, SeededSpawner, Snapshot};

    /// Star Catcher - headless autopilot run
    #[derive(Parser, Debug)]
    #[command(name = "star-catcher")]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Spawn seed (default: from settings, else random)
        #[arg(short, long)]
        pub seed: Option<u64>,

        /// Stop after this many ticks even if the game is still running
        #[arg(short = 't', long, default_value = "20000")]
        pub max_ticks: u64,

        /// Settings JSON file
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        pub json: bool,
    }

    pub fn run(args: &Args) -> Result<Snapshot, Box<dyn Error>> {
        let mut settings = match &args.settings {
            Some(path) => Settings::load_from(path)?,
            None => Settings::default(),
        };
        settings.autopilot = true;
        let spawner = SeededSpawner::new(args.seed.unwrap_or_else(|| settings.resolve_seed()));
        log::info!("Headless run with seed {}", spawner.seed());

        let clock = ManualClock::new(0);
        let engine = Engine::new(clock.clone(), spawner);
        let mut driver = Driver::new(engine, settings);

        let mut ticks = 0u64;
        while ticks < args.max_ticks && !driver.engine().is_over() {
            let Some(due) = driver.next_due_ms() else {
                break;
            };
            clock.set(due);
            let summary = driver.pump();
            ticks += u64::from(summary.ticks);
            if summary.ticks > 0 && ticks % 1_000 == 0 {
                let state = driver.engine().state();
                log::info!(
                    "{} ticks at {}ms: score {}, level {}, misses {}",
                    ticks,
                    due,
                    state.score,
                    state.level,
                    state.misses
                );
            }
        }

        driver.stop();
        Ok(driver.snapshot())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    log::info!("Star Catcher (native) starting...");

    let args = native::Args::parse();
    let snapshot = match native::run(&args) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return std::process::ExitCode::FAILURE;
            }
        }
    } else {
        let status = if snapshot.game_over { "Game Over!" } else { "Stopped" };
        println!("{status}");
        println!("Final Score: {}", snapshot.score);
        println!("Reached Level: {}", snapshot.level);
        println!("Misses: {}/{}", snapshot.misses, snapshot.max_misses);
    }

    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is star_catcher::web::start, this is just to satisfy the compiler
}
