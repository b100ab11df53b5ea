//! datagen-runner: headless dataset generator for OmniBanque.
//!
//! Usage:
//!   datagen-runner --customers 500 --seed 12345 --db fictional_bank.db
//!   datagen-runner --config tuning.json --json

use anyhow::{bail, Result};
use omnibanque_core::{config::SimConfig, driver::SimulationDriver, store::SqliteStore};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or("fictional_bank.db");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());
    let json_output = args.iter().any(|a| a == "--json");

    let mut config = match config_path {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    config.customers = parse_arg(&args, "--customers", config.customers);

    if !json_output {
        println!("OmniBanque — datagen-runner");
        println!("  seed:      {seed}");
        println!("  customers: {}", config.customers);
        println!("  db:        {db}");
        println!();
    }

    let store = SqliteStore::open(db)?;
    store.migrate()?;

    let driver = SimulationDriver::new(config, seed);
    let summary = driver.run(&store)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("=== RUN SUMMARY ===");
        println!("  requested:    {}", summary.requested);
        println!("  completed:    {}", summary.completed);
        println!("  flagged:      {}", summary.flagged);
        println!("  aborted:      {}", summary.aborted);
        println!("  transactions: {}", summary.transactions);
    }

    if !summary.fully_simulated() {
        bail!(
            "{} of {} customer runs aborted",
            summary.aborted,
            summary.requested
        );
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
