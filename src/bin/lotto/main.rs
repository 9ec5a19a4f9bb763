use std::{
    io::{self, Write},
    time::Duration,
};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use framecast::games::lottery::{games_for_amount, spawn_draw, DrawEvent, DrawTiming};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Draws one lottery ticket per 1000 units spent")]
pub struct CommandLineLottoOptions {
    /// Amount to spend, asked on stdin when missing
    #[clap(short, long)]
    amount: Option<String>,

    #[clap(long, default_value = "500")]
    reveal_interval: u64,

    #[clap(long, default_value = "1000")]
    game_interval: u64,

    /// Seed for reproducible draws
    #[clap(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let options = CommandLineLottoOptions::parse();

    let games = match &options.amount {
        Some(amount) => match games_for_amount(amount) {
            Ok(games) => games,
            Err(error) => {
                eprintln!("{}", error);
                return Ok(());
            }
        },
        None => match prompt_games().await? {
            Some(games) => games,
            None => return Ok(()),
        },
    };

    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let timing = DrawTiming {
        reveal_interval: Duration::from_millis(options.reveal_interval),
        game_interval: Duration::from_millis(options.game_interval),
    };

    let (mut events, _draw) = spawn_draw(games, timing, rng);
    let mut stdout = io::stdout();

    while let Some(event) = events.recv().await {
        match event {
            DrawEvent::GameStarted { game } => print!("Game {}:", game),
            DrawEvent::NumberRevealed { revealed, .. } => {
                if let Some(number) = revealed.last() {
                    print!(" {}", number);
                }
            }
            DrawEvent::GameFinished { .. } => println!(),
            DrawEvent::Completed { tickets } => println!("{} tickets drawn", tickets.len()),
        }
        stdout.flush()?;
    }

    Ok(())
}

/// Asks for an amount until a valid one is typed. `None` on end of input.
async fn prompt_games() -> io::Result<Option<u64>> {
    let mut lines = BufReader::new(stdin()).lines();

    loop {
        print!("Amount: ");
        io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };

        match games_for_amount(&line) {
            Ok(games) => return Ok(Some(games)),
            Err(error) => println!("{}", error),
        }
    }
}
