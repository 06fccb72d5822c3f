//! Path Defense headless runner
//!
//! Plays waves automatically with a simple build strategy and prints the
//! status messages a UI would show. Useful for balance checks.
//!
//! Usage: `path-defense [--waves N] [--settings FILE] [--catalog FILE] [--store FILE]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Path Defense (headless) starting...");

    if let Err(message) = headless::run(std::env::args().skip(1).collect()) {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library is embedded by a web shell; no standalone entry point
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use path_defense::clamp_frame_dt;
    use path_defense::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use path_defense::sim::{Catalog, PathModel, Phase, Simulation, StepOutcome};
    use path_defense::Settings;

    /// Fixed 60 Hz frame clock
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a wave after this much simulated time
    const MAX_WAVE_SECONDS: f32 = 600.0;

    /// Zig-zag route across the default arena
    const ROUTE: [[f32; 2]; 6] = [
        [0.0, 120.0],
        [720.0, 120.0],
        [720.0, 320.0],
        [200.0, 320.0],
        [200.0, 520.0],
        [960.0, 520.0],
    ];

    struct Options {
        waves: u32,
        settings: Option<String>,
        catalog: Option<String>,
        store: Option<String>,
    }

    fn parse(args: Vec<String>) -> Result<Options, String> {
        let mut options = Options {
            waves: 10,
            settings: None,
            catalog: None,
            store: None,
        };
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{} needs a value", flag));
            match flag.as_str() {
                "--waves" => {
                    options.waves = value()?
                        .parse()
                        .map_err(|e| format!("bad --waves: {}", e))?
                }
                "--settings" => options.settings = Some(value()?),
                "--catalog" => options.catalog = Some(value()?),
                "--store" => options.store = Some(value()?),
                other => return Err(format!("unknown argument `{}`", other)),
            }
        }
        Ok(options)
    }

    pub fn run(args: Vec<String>) -> Result<(), String> {
        let options = parse(args)?;

        let settings = match &options.settings {
            Some(file) => Settings::load_from(file).map_err(|e| e.to_string())?,
            None => Settings::default(),
        };
        let catalog = match &options.catalog {
            Some(file) => Catalog::load_from(file).map_err(|e| e.to_string())?,
            None => Catalog::standard(),
        };
        let path = PathModel::from_points(&ROUTE).map_err(|e| e.to_string())?;
        let store: Box<dyn KeyValueStore> = match &options.store {
            Some(file) => Box::new(JsonFileStore::new(file)),
            None => Box::new(MemoryStore::new()),
        };

        let mut sim = Simulation::new(settings, catalog, path, store);
        let spots = build_spots(&sim);
        println!("Best wave so far: {}", sim.snapshot().best_wave);

        for _ in 0..options.waves {
            buy_towers(&mut sim, &spots);
            if let Err(e) = sim.start_wave() {
                println!("{}", e);
                break;
            }
            print_messages(&mut sim);

            let mut elapsed = 0.0;
            while sim.phase() == Phase::Running && elapsed < MAX_WAVE_SECONDS {
                let outcome = sim.step(clamp_frame_dt(FRAME_DT));
                elapsed += FRAME_DT;
                if outcome != StepOutcome::Continue {
                    break;
                }
            }
            print_messages(&mut sim);

            let snap = sim.snapshot();
            println!(
                "  money {}  lives {}  towers {}",
                snap.money,
                snap.lives,
                sim.state().towers.len()
            );
            if snap.phase != Phase::Build {
                break;
            }
        }

        let snap = sim.snapshot();
        println!("Finished at wave {} (best {})", snap.wave, snap.best_wave);
        Ok(())
    }

    /// Candidate tower spots flanking the path, nearest to the entrance first
    fn build_spots(sim: &Simulation) -> Vec<Vec2> {
        let offset = sim.settings().path_keep_out() + 28.0;
        let mut spots = Vec::new();
        for segment in sim.path().segments() {
            let normal = segment.unit.perp();
            let mut along = 40.0;
            while along < segment.length {
                let base = segment.point_at(along);
                spots.push(base + normal * offset);
                spots.push(base - normal * offset);
                along += 70.0;
            }
        }
        spots
    }

    /// Spend money round-robin over the catalog until nothing fits
    fn buy_towers(sim: &mut Simulation, spots: &[Vec2]) {
        let kinds: Vec<(String, u32)> = sim
            .catalog()
            .towers
            .iter()
            .map(|t| (t.id.clone(), t.cost))
            .collect();
        if kinds.is_empty() {
            return;
        }

        let mut next_kind = sim.state().towers.len();
        for &spot in spots {
            let affordable = kinds.iter().any(|(_, cost)| *cost <= sim.snapshot().money);
            if !affordable {
                break;
            }
            let (type_id, cost) = &kinds[next_kind % kinds.len()];
            if *cost > sim.snapshot().money || !sim.can_place(type_id, spot) {
                continue;
            }
            if sim.place_tower(type_id, spot).is_ok() {
                next_kind += 1;
            }
        }
        // Placement events are noise here
        let _ = sim.drain_events();
    }

    fn print_messages(sim: &mut Simulation) {
        for event in sim.drain_events() {
            if let Some(message) = event.message() {
                println!("{}", message);
            }
        }
    }
}
