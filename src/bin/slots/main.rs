use std::{
    io::{self, Write},
    time::Duration,
};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use framecast::games::slots::{spawn_spin, Fruit, Outcome, SpinEvent, SpinTiming, REELS};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Spins a three-reel fruit machine")]
pub struct CommandLineSlotsOptions {
    #[clap(long, default_value = "100")]
    flicker_interval: u64,

    #[clap(long, default_value = "10")]
    flickers: usize,

    #[clap(long)]
    seed: Option<u64>,
}

fn render(reels: &[Option<Fruit>; REELS]) -> String {
    reels
        .iter()
        .map(|fruit| match fruit {
            Some(fruit) => format!("[{:^8}]", fruit.to_string()),
            None => format!("[{:^8}]", "?"),
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let options = CommandLineSlotsOptions::parse();

    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let timing = SpinTiming {
        flicker_interval: Duration::from_millis(options.flicker_interval),
        flickers_per_reel: options.flickers,
    };

    let mut reels = [None; REELS];
    let (mut events, _spin) = spawn_spin(timing, rng);
    let mut stdout = io::stdout();

    while let Some(event) = events.recv().await {
        match event {
            SpinEvent::Flicker { reel, fruit } | SpinEvent::ReelStopped { reel, fruit } => {
                reels[reel] = Some(fruit);
                print!("\r{}", render(&reels));
            }
            SpinEvent::Finished { outcome, .. } => match outcome {
                Outcome::Win => println!("\nJackpot!"),
                Outcome::Lose => println!("\nTry again"),
            },
        }
        stdout.flush()?;
    }

    Ok(())
}
