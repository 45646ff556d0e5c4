use std::collections::HashMap;

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::{ConnId, PlayerId};
use crate::protocol::Outgoing;

struct Connection {
    outbound: UnboundedSender<Outgoing>,
    player: Option<PlayerId>,
}

/// Live client connections and the player each one is registered as.
#[derive(Default)]
pub struct Connections {
    next_id: u64,
    open: HashMap<ConnId, Connection>,
}

impl Connections {
    /// Register a new connection and hand back its outbound queue.
    pub fn open(&mut self) -> (ConnId, UnboundedReceiver<Outgoing>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        self.next_id += 1;
        let id = ConnId(self.next_id);
        self.open.insert(
            id,
            Connection {
                outbound,
                player: None,
            },
        );
        (id, rx)
    }

    /// Forget the connection; returns the player it was bound to.
    pub fn close(&mut self, conn: ConnId) -> Option<PlayerId> {
        self.open.remove(&conn).and_then(|c| c.player)
    }

    /// Bind `conn` to `player`, unbinding any older connection of theirs.
    pub fn bind(&mut self, conn: ConnId, player: PlayerId) {
        for (id, c) in self.open.iter_mut() {
            if *id != conn && c.player.as_ref() == Some(&player) {
                c.player = None;
            }
        }
        if let Some(c) = self.open.get_mut(&conn) {
            c.player = Some(player);
        }
    }

    pub fn player_of(&self, conn: ConnId) -> Option<&PlayerId> {
        self.open.get(&conn).and_then(|c| c.player.as_ref())
    }

    pub fn is_online(&self, player: &PlayerId) -> bool {
        self.open.values().any(|c| c.player.as_ref() == Some(player))
    }

    pub fn send(&self, conn: ConnId, message: Outgoing) {
        match self.open.get(&conn) {
            // A closed receiver means the connection task is already gone.
            Some(c) => {
                let _ = c.outbound.send(message);
            }
            None => debug!("drop {} for closed {}", message.kind(), conn),
        }
    }

    pub fn send_to_player(&self, player: &PlayerId, message: Outgoing) {
        match self
            .open
            .values()
            .find(|c| c.player.as_ref() == Some(player))
        {
            Some(c) => {
                let _ = c.outbound.send(message);
            }
            None => debug!("drop {} for offline player {}", message.kind(), player),
        }
    }

    /// Send to every open connection, registered or not.
    pub fn broadcast(&self, message: &Outgoing) {
        for c in self.open.values() {
            let _ = c.outbound.send(message.clone());
        }
    }
}
