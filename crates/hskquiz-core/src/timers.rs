//! Cancellable session timers.
//!
//! Auto-advance (after revealing round correctness) and auto-play (before an
//! audio round speaks) run as spawned sleep tasks that send a `TimerFire`
//! back over a channel. Every fire carries the session id and round index it
//! was scheduled for; the engine drops fires that no longer match its
//! current state, so a stale callback can never mutate a superseded session.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Which delayed action a fire requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Speak the current audio round's prompt.
    AutoPlay,
    /// Present the next round after the feedback interval.
    AutoAdvance,
}

/// A timer expiry, tagged with the state it was scheduled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub kind: TimerKind,
    pub session: Uuid,
    pub round: usize,
}

/// Owns the pending timer tasks for the engine.
pub struct TimerSet {
    tx: UnboundedSender<TimerFire>,
    pending: Vec<JoinHandle<()>>,
}

impl TimerSet {
    /// Create a timer set and the receiver the front-end drains.
    pub fn new() -> (Self, UnboundedReceiver<TimerFire>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: Vec::new(),
            },
            rx,
        )
    }

    /// Schedule a fire after `delay`. Requires a tokio runtime.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration, session: Uuid, round: usize) {
        let tx = self.tx.clone();
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver being gone just means nobody is listening anymore.
            let _ = tx.send(TimerFire {
                kind,
                session,
                round,
            });
        }));
    }

    /// Abort every pending timer task.
    pub fn cancel_all(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn scheduled_timer_fires_with_its_tag() {
        let (mut timers, mut fires) = TimerSet::new();
        let session = Uuid::new_v4();

        timers.schedule(TimerKind::AutoPlay, Duration::from_millis(500), session, 2);

        let fire = fires.recv().await.expect("timer should fire");
        assert_eq!(fire.kind, TimerKind::AutoPlay);
        assert_eq!(fire.session, session);
        assert_eq!(fire.round, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timers_never_fire() {
        let (mut timers, mut fires) = TimerSet::new();
        let session = Uuid::new_v4();

        timers.schedule(TimerKind::AutoAdvance, Duration::from_millis(10), session, 0);
        timers.cancel_all();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fires.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn multiple_timers_all_fire() {
        let (mut timers, mut fires) = TimerSet::new();
        let session = Uuid::new_v4();

        timers.schedule(TimerKind::AutoPlay, Duration::from_millis(5), session, 0);
        timers.schedule(TimerKind::AutoAdvance, Duration::from_millis(10), session, 0);

        let first = fires.recv().await.unwrap();
        let second = fires.recv().await.unwrap();
        assert_eq!(first.kind, TimerKind::AutoPlay);
        assert_eq!(second.kind, TimerKind::AutoAdvance);
    }
}
