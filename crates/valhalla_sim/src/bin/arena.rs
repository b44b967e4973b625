//! # Arena Benchmark Harness
//!
//! Runs the combat simulation for a fixed number of ticks and reports
//! per-tick timing plus the final state digest. Two invocations with the
//! same configuration must print the same digest.
//!
//! ## Usage
//!
//! ```bash
//! arena --population 10000 --ticks 600
//! arena --config arena.toml --quiet
//! ```

use std::time::Instant;

use valhalla_sim::{SimConfig, Simulation};

fn main() {
    // Parse command line arguments (simple parsing, no external deps)
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut population: Option<u32> = None;
    let mut ticks = 600u64;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--population" | "-n" => {
                if i + 1 < args.len() {
                    population = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--ticks" | "-t" => {
                if i + 1 < args.len() {
                    ticks = args[i + 1].parse().unwrap_or(600);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--quiet" | "-q" => {
                quiet = true;
            }
            "--help" | "-h" => {
                println!("Usage: arena [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --population <NUM>   Units to simulate (default: 1024)");
                println!("  -t, --ticks <NUM>        Ticks to run (default: 600)");
                println!("  -c, --config <PATH>      Load settings from a TOML file");
                println!("  -q, --quiet              Suppress progress logging");
                println!("  -h, --help               Show this help");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    if !quiet {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let mut config = match config_path {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(population) = population {
        config.population = population;
    }
    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {e}");
        std::process::exit(1);
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         VALHALLA ARENA                                           ║");
    println!("║         DETERMINISTIC COMBAT BENCHMARK                           ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Population:         {}", config.population);
    println!("│ Ticks:              {ticks}");
    println!("│ Respawn Delay:      {}", config.respawn_delay);
    println!("│ Projectile Speed:   {}", config.projectile_speed);
    println!(
        "│ Arena:              {}x{}",
        config.arena_width, config.arena_height
    );
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let setup_start = Instant::now();
    let mut sim = Simulation::with_defaults(&config);
    let setup_us = setup_start.elapsed().as_micros();

    let mut min_us = u128::MAX;
    let mut max_us = 0u128;
    let mut total_us = 0u128;

    let run_start = Instant::now();
    for _ in 0..ticks {
        let tick_start = Instant::now();
        sim.tick();
        let elapsed = tick_start.elapsed().as_micros();
        min_us = min_us.min(elapsed);
        max_us = max_us.max(elapsed);
        total_us += elapsed;
    }
    let wall = run_start.elapsed();

    let digest = sim.state_digest();
    let avg_us = total_us / u128::from(ticks.max(1));
    #[allow(clippy::cast_precision_loss)]
    let ticks_per_sec = ticks as f64 / wall.as_secs_f64().max(f64::EPSILON);

    println!("┌─ RESULTS ───────────────────────────────────────────────────────┐");
    println!("│ Setup:              {setup_us} μs");
    println!("│ Wall Time:          {:.3} s", wall.as_secs_f64());
    println!("│ Ticks/sec:          {ticks_per_sec:.1}");
    println!("│ Tick Time:          min {min_us} μs / avg {avg_us} μs / max {max_us} μs");
    println!("│ Live Entities:      {}", sim.world().alive_count());
    println!("│ State Digest:       {digest:#018x}");
    println!("└──────────────────────────────────────────────────────────────────┘");
}
