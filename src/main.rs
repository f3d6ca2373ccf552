mod config;
mod game;
mod ui;

use config::GameConfig;
use game::Game;
use std::env;

fn main()
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()>
{
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    let config = GameConfig::from_args(&args)?;
    log::info!(
        "starting magic match (seed: {:?}, reveal delay: {}ms)",
        config.seed,
        config.reveal_delay.as_millis()
    );
    ui::run(Game::new(config.seed, config.reveal_delay))
}

fn print_help()
{
    println!("magic-match");
    println!("\nUsage:");
    println!("  magic-match [--seed=<n>] [--reveal-ms=<ms>]");
    println!("\nOptions:");
    println!("  --seed=<n>        Deal reproducible shuffles");
    println!("  --reveal-ms=<ms>  How long a mismatched pair stays face-up (default 1000)");
    println!("\nNotes:");
    println!("  Set MAGIC_MATCH_SEED to pick a seed without the flag.");
    println!("  Set RUST_LOG=debug to trace choices and turns on stderr.");
}
