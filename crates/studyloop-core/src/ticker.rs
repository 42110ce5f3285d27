//! Cancellable one-second clock for the timed modes.
//!
//! [`Ticker::spawn`] starts a tokio task that sends a numbered tick every
//! period. The returned [`TickerGuard`] owns the task: dropping it or calling
//! [`TickerGuard::stop`] aborts the task, so the clock ends with whatever scope
//! holds the guard.
//!
//! ## Usage
//!
//! ```ignore
//! let (guard, mut ticks) = Ticker::every_second();
//! while let Some(_) = ticks.recv().await {
//!     session.tick();
//! }
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const CHANNEL_CAPACITY: usize = 16;

pub struct Ticker;

impl Ticker {
    /// Start ticking every `period`. The first tick arrives after one period.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(period: Duration) -> (TickerGuard, mpsc::Receiver<u64>) {
        let period = period.max(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut count: u64 = 0;
            loop {
                interval.tick().await;
                count += 1;
                if tx.send(count).await.is_err() {
                    tracing::debug!(count, "tick receiver dropped, ticker exiting");
                    break;
                }
            }
        });
        (TickerGuard { handle }, rx)
    }

    pub fn every_second() -> (TickerGuard, mpsc::Receiver<u64>) {
        Self::spawn(Duration::from_secs(1))
    }
}

/// Owner of a running ticker task.
#[derive(Debug)]
pub struct TickerGuard {
    handle: JoinHandle<()>,
}

impl TickerGuard {
    pub fn stop(self) {
        // Drop aborts.
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::FlashcardDeck;
    use crate::question::QuestionItem;

    fn cards(n: usize) -> Vec<QuestionItem> {
        (0..n)
            .map(|k| QuestionItem::new(format!("q{k}"), "A", vec![format!("a{k}")], ""))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_numbered() {
        let (_guard, mut ticks) = Ticker::every_second();
        assert_eq!(ticks.recv().await, Some(1));
        assert_eq!(ticks.recv().await, Some(2));
        assert_eq!(ticks.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let start = Instant::now();
        let (_guard, mut ticks) = Ticker::every_second();
        ticks.recv().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_closes_the_channel() {
        let (guard, mut ticks) = Ticker::every_second();
        assert_eq!(ticks.recv().await, Some(1));
        guard.stop();
        // Buffered ticks may still drain; the channel then closes.
        while ticks.recv().await.is_some() {}
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_aborts_the_task() {
        let (guard, mut ticks) = Ticker::every_second();
        drop(guard);
        while ticks.recv().await.is_some() {}
        assert!(ticks.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn deck_clock_follows_wall_time() {
        let mut deck = FlashcardDeck::new(&cards(2));
        let start = Instant::now();
        let (_guard, mut ticks) = Ticker::every_second();
        while start.elapsed() < Duration::from_secs(120) {
            ticks.recv().await;
            deck.tick();
        }
        assert_eq!(deck.elapsed_secs(), 120);

        deck.flip();
        deck.next();
        deck.flip();
        // 5 + 2 minutes * 2 + 10
        assert_eq!(deck.take_reward(), Some(19));
    }
}
