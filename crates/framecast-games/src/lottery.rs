use std::time::Duration;

use log::debug;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};

pub const TICKET_PRICE: u64 = 1000;
pub const NUMBERS_PER_GAME: usize = 6;
pub const HIGHEST_NUMBER: u8 = 45;

pub type Ticket = [u8; NUMBERS_PER_GAME];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LottoError {
    #[error("Amount must be a whole number, got '{0}'")]
    InvalidAmount(String),

    #[error("At least 1000 is needed for one game, got {0}")]
    InsufficientAmount(i64),
}

/// Six distinct numbers in `1..=45`, ascending.
pub fn draw_numbers<R: Rng + ?Sized>(rng: &mut R) -> Ticket {
    let mut numbers: Vec<u8> = (1..=HIGHEST_NUMBER).collect();
    numbers.shuffle(rng);

    let mut ticket = [0u8; NUMBERS_PER_GAME];
    ticket.copy_from_slice(&numbers[..NUMBERS_PER_GAME]);
    ticket.sort_unstable();
    ticket
}

/// One game per full ticket price contained in `input`. Negative amounts are
/// insufficient rather than malformed.
pub fn games_for_amount(input: &str) -> Result<u64, LottoError> {
    let amount: i64 = input
        .trim()
        .parse()
        .map_err(|_| LottoError::InvalidAmount(input.trim().to_string()))?;

    match u64::try_from(amount) {
        Ok(amount) if amount >= TICKET_PRICE => Ok(amount / TICKET_PRICE),
        _ => Err(LottoError::InsufficientAmount(amount)),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DrawTiming {
    pub reveal_interval: Duration,
    pub game_interval: Duration,
}

impl Default for DrawTiming {
    fn default() -> Self {
        Self {
            reveal_interval: Duration::from_millis(500),
            game_interval: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawEvent {
    GameStarted { game: u64 },
    NumberRevealed { game: u64, revealed: Vec<u8> },
    GameFinished { game: u64, ticket: Ticket },
    Completed { tickets: Vec<Ticket> },
}

/// Draws `games` tickets on a background task, revealing numbers one at a time.
/// Dropping the receiver stops the draw at its next event.
pub fn spawn_draw<R>(games: u64, timing: DrawTiming, mut rng: R) -> (UnboundedReceiver<DrawEvent>, JoinHandle<()>)
where
    R: Rng + Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut tickets = Vec::new();

        for game in 1..=games {
            if sender.send(DrawEvent::GameStarted { game }).is_err() {
                return;
            }

            let ticket = draw_numbers(&mut rng);

            for revealed_count in 1..=NUMBERS_PER_GAME {
                let revealed = ticket[..revealed_count].to_vec();
                if sender.send(DrawEvent::NumberRevealed { game, revealed }).is_err() {
                    return;
                }
                tokio::time::sleep(timing.reveal_interval).await;
            }

            if sender.send(DrawEvent::GameFinished { game, ticket }).is_err() {
                return;
            }
            tickets.push(ticket);

            tokio::time::sleep(timing.game_interval).await;
        }

        debug!("Draw of {} games completed", games);
        let _ = sender.send(DrawEvent::Completed { tickets });
    });

    (receiver, handle)
}
