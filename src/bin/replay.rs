// Standalone replay tool for analyzing Flip debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --match <id>           Replay a single match (default: every match in the log)
//   --turns <turn1,turn2>  Only report specific turns (comma-separated)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Flip.toml (default: Flip.toml)

use std::env;
use std::process;
use std::time::Instant;

use flip_agent::config::Config;
use flip_agent::replay::ReplayEngine;
use flip_agent::simple_profiler;

fn print_usage() {
    eprintln!("Flip Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --match <ID>            Replay only the given match");
    eprintln!("  --turns <T1,T2,...>     Only report specific turns (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Flip.toml (default: Flip.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay every match");
    eprintln!("  replay flip_debug.jsonl");
    eprintln!();
    eprintln!("  # Replay one match, reporting turns 5 and 10");
    eprintln!("  replay flip_debug.jsonl --match m42 --turns 5,10 --verbose");
    eprintln!();
    eprintln!("  # Profile the decision phases while replaying");
    eprintln!("  FLIP_PROFILE=1 replay flip_debug.jsonl");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn main() {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Flip.toml".to_string();
    let mut verbose = false;
    let mut match_id: Option<String> = None;
    let mut turns: Option<Vec<u32>> = None;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--match" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --match requires an argument");
                    process::exit(1);
                }
                match_id = Some(args[i + 1].clone());
                i += 1;
            }
            "--turns" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --turns requires an argument");
                    process::exit(1);
                }
                match parse_turns(&args[i + 1]) {
                    Ok(t) => turns = Some(t),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown argument '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    // Load configuration
    let config = match Config::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: Failed to load config from {}: {}", config_path, e);
            eprintln!("Using default hardcoded configuration");
            Config::default_hardcoded()
        }
    };

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    simple_profiler::reset();
    let start = Instant::now();

    let replayed = match &match_id {
        Some(id) => engine.replay_match(&entries, id),
        None => engine.replay_all(&entries),
    };
    let mut results = match replayed {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    simple_profiler::merge_thread_local();

    if let Some(turns) = &turns {
        results.retain(|r| turns.contains(&r.turn));
    }

    engine.print_report(&results);
    simple_profiler::print_report(elapsed_ms);

    if results.iter().any(|r| !r.violations.is_empty()) {
        process::exit(2);
    }
}
