//! level-runner: load a level file and play it headless.
//!
//! Usage:
//!   level-runner run --level demos/level1.json --ticks 600 --seed 7
//!   level-runner check --level demos/level1.json

use std::path::PathBuf;
use std::process;

use log::info;

use valsrevenge_core::commands::{TouchEvent, TouchId};
use valsrevenge_core::config::LevelSpec;
use valsrevenge_core::enums::ComponentKind;
use valsrevenge_core::types::EntityId;
use valsrevenge_sim::persistence;
use valsrevenge_sim::{SimConfig, SimulationEngine};

/// Host frame length used for headless runs (seconds).
const FRAME_SECS: f64 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "level-runner: headless Val's Revenge level player\n\
         \n\
         Commands:\n\
         \n\
         run    Load a level, start play and print every event as JSON\n\
         \n\
           --level <path>     Level JSON file\n\
           --ticks <N>        Frames to run at 60 Hz (default: 600)\n\
           --seed <N>         RNG seed (default: 42)\n\
           --save-dir <path>  Read and write gamedata.json here (optional)\n\
         \n\
         check  Validate a level file without running it\n\
         \n\
           --level <path>     Level JSON file\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Error: {flag} expects a number, got {raw}");
            process::exit(1);
        }),
        None => default,
    }
}

fn read_level(args: &[String]) -> LevelSpec {
    let Some(path) = flag_value(args, "--level").map(PathBuf::from) else {
        eprintln!("Error: --level <path> is required");
        process::exit(1);
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match LevelSpec::from_json(&json) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        }
    }
}

// --- Check command ---

fn cmd_check(args: &[String]) {
    let level = read_level(args);
    match level.resolve() {
        Ok(entities) => eprintln!(
            "OK: {} entities, {} patrol nodes",
            entities.len(),
            level.patrol_path.len()
        ),
        Err(e) => {
            eprintln!("Invalid level: {e}");
            process::exit(1);
        }
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let level = read_level(args);
    let ticks: u64 = parse_number(args, "--ticks", 600);
    let seed: u64 = parse_number(args, "--seed", 42);
    let save_dir = flag_value(args, "--save-dir").map(PathBuf::from);

    let save = match &save_dir {
        Some(dir) => match persistence::resume_saved_game(dir) {
            Ok(save) => save,
            Err(e) => {
                eprintln!("Error loading save: {e}");
                process::exit(1);
            }
        },
        None => Default::default(),
    };

    let mut engine = SimulationEngine::new(
        SimConfig {
            seed,
            save_dir,
            ..Default::default()
        },
        save,
    );
    engine
        .registry_mut()
        .subscribe(|id: EntityId, kinds: &[ComponentKind]| {
            info!("destroyed {id} carrying {kinds:?}");
        });
    if let Err(e) = engine.load_level(&level) {
        eprintln!("Invalid level: {e}");
        process::exit(1);
    }

    // A tap away from both joysticks starts play.
    engine.handle_input(TouchEvent::Down {
        touch: TouchId(0),
        position: Default::default(),
    });
    engine.handle_input(TouchEvent::Up {
        touch: TouchId(0),
        position: Default::default(),
    });

    for tick in 0..ticks {
        for event in engine.update(tick as f64 * FRAME_SECS) {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{{\"tick\":{tick},\"event\":{line}}}"),
                Err(e) => eprintln!("Error encoding event: {e}"),
            }
        }
    }

    let save = engine.save_data();
    eprintln!(
        "Done: {} ticks, {:.2}s simulated, {} entities left, level {} keys {} treasure {}",
        ticks,
        engine.time().elapsed_secs,
        engine.registry().len(),
        save.level,
        save.keys,
        save.treasure
    );
}
