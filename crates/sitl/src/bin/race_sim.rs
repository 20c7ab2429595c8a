//! Sail a race file through the controller and print the result.
//!
//! Usage:
//!   cargo run -p sailnav_sitl --bin race_sim -- <RACE.json> [OPTIONS]
//!
//! Options:
//!   --steps <N>   Override the step limit from the race file
//!   --seed <S>    Override the RNG seed from the race file

use std::env;
use std::process;

use sailnav_sitl::{RaceFile, RaceRunner};

struct Args {
    path: String,
    steps: Option<u32>,
    seed: Option<u64>,
}

fn parse_args() -> Args {
    let mut path = None;
    let mut steps = None;
    let mut seed = None;

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--steps" => {
                i += 1;
                steps = Some(parse_arg(&raw, i, "steps"));
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_arg(&raw, i, "seed"));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
            other => {
                if path.is_some() {
                    eprintln!("Error: only one race file may be given");
                    process::exit(1);
                }
                path = Some(other.to_string());
            }
        }
        i += 1;
    }

    let Some(path) = path else {
        print_usage();
        process::exit(1);
    };

    Args { path, steps, seed }
}

fn parse_arg<V: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> V {
    raw.get(i)
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires a value");
            process::exit(1);
        })
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Error: invalid value for --{name}");
            process::exit(1);
        })
}

fn print_usage() {
    eprintln!(
        "Usage: race_sim <RACE.json> [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --steps <N>   Override the step limit from the race file\n\
         \x20 --seed <S>    Override the RNG seed from the race file\n\
         \x20 -h, --help    Show this help"
    );
}

fn main() {
    let args = parse_args();

    let mut file = match RaceFile::load(&args.path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: {}: {e}", args.path);
            process::exit(1);
        }
    };
    if let Some(steps) = args.steps {
        file.sim.max_steps = steps;
    }
    if let Some(seed) = args.seed {
        file.sim.seed = Some(seed);
    }

    let summary = file
        .validate()
        .and_then(RaceRunner::new)
        .and_then(|runner| runner.run());
    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    println!("=== {} ===", if file.name.is_empty() { &args.path } else { &file.name });
    println!("Finished:        {}", summary.finished);
    println!("Steps:           {} ({} skipped)", summary.steps, summary.skipped);
    println!("Elapsed:         {:.1} s", summary.elapsed_s);
    println!("Marks reached:   {}", summary.waypoints_reached);
    println!("Tacks:           {} ({} at the boundary)", summary.tacks, summary.boundary_tacks);
    println!(
        "Mode ticks:      fore {} / side {} / aft {}",
        summary.mode_ticks[0], summary.mode_ticks[1], summary.mode_ticks[2]
    );

    if !summary.finished {
        process::exit(2);
    }
}
