//! Autonomous opponent: keeps firing random shots after a delay until one
//! of them misses.

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::domain::{GameId, PlayerId};

use super::battle::Outcome;
use super::registry::{Aim, SessionRegistry};

pub struct OpponentDriver {
    registry: Arc<SessionRegistry>,
    game: GameId,
    bot: PlayerId,
    delay: Duration,
    cancelled: watch::Receiver<bool>,
}

impl OpponentDriver {
    pub fn new(
        registry: Arc<SessionRegistry>,
        game: GameId,
        bot: PlayerId,
        delay: Duration,
        cancelled: watch::Receiver<bool>,
    ) -> Self {
        Self {
            registry,
            game,
            bot,
            delay,
            cancelled,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drive the bot's streak. Stops on a miss, a finished game, a rejected
    /// shot, or when the session signals cancellation during the delay.
    pub async fn run(mut self) {
        loop {
            if *self.cancelled.borrow() {
                debug!("[{}] bot driver cancelled", self.game);
                return;
            }
            tokio::select! {
                _ = sleep(self.delay) => {}
                _ = self.cancelled.changed() => {
                    debug!("[{}] bot driver cancelled while thinking", self.game);
                    return;
                }
            }
            match self.registry.fire(&self.game, &self.bot, Aim::Random).await {
                Some((report, _)) if matches!(report.outcome, Outcome::Shot | Outcome::Killed) => {
                    continue
                }
                Some(_) | None => return,
            }
        }
    }
}
