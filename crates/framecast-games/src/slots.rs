use std::{fmt::Display, time::Duration};

use log::debug;
use rand::Rng;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};

pub const REELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fruit {
    Apple,
    Banana,
    Cherry,
}

impl Fruit {
    pub const ALL: [Fruit; 3] = [Fruit::Apple, Fruit::Banana, Fruit::Cherry];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl Display for Fruit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Fruit::Apple => "apple",
            Fruit::Banana => "banana",
            Fruit::Cherry => "cherry",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

pub fn outcome(reels: &[Fruit; REELS]) -> Outcome {
    if reels.iter().all(|fruit| *fruit == reels[0]) {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpinTiming {
    pub flicker_interval: Duration,
    pub flickers_per_reel: usize,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            flicker_interval: Duration::from_millis(100),
            flickers_per_reel: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinEvent {
    Flicker { reel: usize, fruit: Fruit },
    ReelStopped { reel: usize, fruit: Fruit },
    Finished { reels: [Fruit; REELS], outcome: Outcome },
}

/// Spins the reels left to right on a background task. Each reel flickers through
/// random fruits before settling on its final one. Dropping the receiver stops the spin
/// at its next event.
pub fn spawn_spin<R>(timing: SpinTiming, mut rng: R) -> (UnboundedReceiver<SpinEvent>, JoinHandle<()>)
where
    R: Rng + Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut reels = [Fruit::Apple; REELS];

        for (reel, slot) in reels.iter_mut().enumerate() {
            for _ in 0..timing.flickers_per_reel {
                let fruit = Fruit::random(&mut rng);
                if sender.send(SpinEvent::Flicker { reel, fruit }).is_err() {
                    return;
                }
                tokio::time::sleep(timing.flicker_interval).await;
            }

            *slot = Fruit::random(&mut rng);
            if sender
                .send(SpinEvent::ReelStopped { reel, fruit: *slot })
                .is_err()
            {
                return;
            }
        }

        let outcome = outcome(&reels);
        debug!("Spin finished: {:?} -> {:?}", reels, outcome);
        let _ = sender.send(SpinEvent::Finished { reels, outcome });
    });

    (receiver, handle)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::{rngs::StdRng, SeedableRng};

    use super::{outcome, spawn_spin, Fruit, Outcome, SpinEvent, SpinTiming, REELS};

    #[test]
    fn only_three_matching_fruits_win() {
        assert_eq!(outcome(&[Fruit::Cherry; 3]), Outcome::Win);
        assert_eq!(outcome(&[Fruit::Apple, Fruit::Apple, Fruit::Banana]), Outcome::Lose);
        assert_eq!(outcome(&[Fruit::Banana, Fruit::Apple, Fruit::Apple]), Outcome::Lose);
        assert_eq!(outcome(&[Fruit::Apple, Fruit::Banana, Fruit::Cherry]), Outcome::Lose);
    }

    #[test]
    fn fruits_display_lowercase() {
        assert_eq!(Fruit::Banana.to_string(), "banana");
    }

    #[tokio::test]
    async fn spin_flickers_each_reel_then_reports_outcome() {
        let timing = SpinTiming {
            flicker_interval: Duration::ZERO,
            flickers_per_reel: 4,
        };
        let (mut events, _spin) = spawn_spin(timing, StdRng::seed_from_u64(3));

        let mut received = Vec::new();
        while let Some(event) = events.recv().await {
            received.push(event);
        }

        assert_eq!(received.len(), REELS * (4 + 1) + 1);

        let stopped: Vec<Fruit> = received
            .iter()
            .filter_map(|event| match event {
                SpinEvent::ReelStopped { fruit, .. } => Some(*fruit),
                _ => None,
            })
            .collect();
        assert_eq!(stopped.len(), REELS);

        match received.last() {
            Some(SpinEvent::Finished { reels, outcome: result }) => {
                assert_eq!(reels.to_vec(), stopped);
                assert_eq!(*result, outcome(reels));
            }
            other => panic!("unexpected last event {:?}", other),
        }

        for (index, event) in received[..4].iter().enumerate() {
            assert!(
                matches!(event, SpinEvent::Flicker { reel: 0, .. }),
                "event {} was {:?}",
                index,
                event
            );
        }
    }

    #[tokio::test]
    async fn dropping_the_receiver_stops_the_spin() {
        let timing = SpinTiming {
            flicker_interval: Duration::from_millis(100),
            flickers_per_reel: 1000,
        };
        let (events, spin) = spawn_spin(timing, StdRng::seed_from_u64(0));
        drop(events);

        let finished = tokio::time::timeout(Duration::from_secs(5), spin).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}
