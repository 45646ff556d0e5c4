//! Lobby
//!
//! Everything around the battle engine that a client sees before and
//! after a match: registration, rooms, the winners table, and delivery of
//! outbound messages to live connections.

pub mod connections;
pub mod leaderboard;
pub mod rooms;
pub mod users;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

use crate::domain::{ConnId, GameId, PlayerId};
use crate::protocol::{Outgoing, RegReply, RegRequest, RoomView, WinnerView};
use crate::session::{Outbox, ScoreBoard};

pub use connections::Connections;
pub use leaderboard::Leaderboard;
pub use rooms::Rooms;
pub use users::{LoginError, User, Users};

pub const LOGIN_ERROR_TEXT: &str = "Invalid login or password!";

/// Two players seated against each other, both already bound to `game`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub owner: PlayerId,
    pub joiner: PlayerId,
    pub game: GameId,
}

#[derive(Default)]
struct LobbyState {
    connections: Connections,
    users: Users,
    rooms: Rooms,
    leaderboard: Leaderboard,
}

impl LobbyState {
    fn broadcast_rooms(&self) {
        self.connections
            .broadcast(&Outgoing::UpdateRoom(self.rooms.views()));
    }

    fn broadcast_winners(&self) {
        self.connections
            .broadcast(&Outgoing::UpdateWinners(self.leaderboard.view()));
    }
}

/// Shared lobby state. Every method takes the lock only for its own
/// duration, so callers never hold it across session work.
#[derive(Default)]
pub struct Lobby {
    state: Mutex<LobbyState>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self) -> (ConnId, UnboundedReceiver<Outgoing>) {
        let (conn, rx) = self.state.lock().await.connections.open();
        debug!("{} connected", conn);
        (conn, rx)
    }

    /// Log `conn` in as `request.name`. The reply goes to `conn`, followed
    /// by the room list and the winners table on success.
    pub async fn register(&self, conn: ConnId, request: &RegRequest) -> RegReply {
        let mut state = self.state.lock().await;
        let reply = match state.users.login(&request.name, &request.password) {
            Ok(user) => RegReply {
                name: user.name.clone(),
                index: user.id.to_string(),
                error: false,
                error_text: String::new(),
            },
            Err(LoginError::WrongPassword) => RegReply {
                name: request.name.clone(),
                index: String::new(),
                error: true,
                error_text: LOGIN_ERROR_TEXT.to_string(),
            },
        };
        state.connections.send(conn, Outgoing::Reg(reply.clone()));
        if reply.error {
            warn!("{} failed to log in as {}", conn, request.name);
            return reply;
        }

        let player = PlayerId::new(reply.index.clone());
        state.connections.bind(conn, player);
        info!("{} registered as {}", conn, reply.name);
        state
            .connections
            .send(conn, Outgoing::UpdateRoom(state.rooms.views()));
        state
            .connections
            .send(conn, Outgoing::UpdateWinners(state.leaderboard.view()));
        reply
    }

    /// Open a room for the player behind `conn` and announce it.
    pub async fn create_room(&self, conn: ConnId) -> Option<String> {
        let mut state = self.state.lock().await;
        let player = state.connections.player_of(conn)?.clone();
        let user = state.users.by_id(&player)?;
        if let Some(game) = &user.game {
            debug!("{} is still playing {}", user.name, game);
            return None;
        }
        let name = user.name.clone();
        let Some(room) = state.rooms.create(player, &name) else {
            debug!("{} already has an open room", name);
            return None;
        };
        info!("{} opened room {}", name, room);
        state.broadcast_rooms();
        Some(room)
    }

    /// Seat the player behind `conn` in `room_id` and bind both players to
    /// a fresh game id. Refused while either of them is still playing or
    /// the owner has gone offline. The room list is not broadcast yet.
    pub async fn join_room(&self, conn: ConnId, room_id: &str) -> Option<Pairing> {
        let mut state = self.state.lock().await;
        let joiner = state.connections.player_of(conn)?.clone();
        let owner = state.rooms.owner_of(room_id)?.clone();
        let busy = [&owner, &joiner]
            .into_iter()
            .any(|p| state.users.game_of(p).is_some());
        if owner == joiner || busy || !state.connections.is_online(&owner) {
            debug!("{} cannot join room {}", joiner, room_id);
            return None;
        }
        let (owner, joiner) = state.rooms.join(room_id, &joiner)?;
        let game = GameId::generate();
        state.users.bind_game(&owner, game.clone());
        state.users.bind_game(&joiner, game.clone());
        Some(Pairing {
            owner,
            joiner,
            game,
        })
    }

    /// Bind the player behind `conn` to a fresh game id for a match
    /// against the bot, closing their open room. `None` while unregistered
    /// or still playing.
    pub async fn claim_single_play(&self, conn: ConnId) -> Option<(PlayerId, GameId)> {
        let mut state = self.state.lock().await;
        let player = state.connections.player_of(conn)?.clone();
        let game = GameId::generate();
        if !state.users.bind_game(&player, game.clone()) {
            debug!("{} is still playing", player);
            return None;
        }
        if state.rooms.remove_by_player(&player) {
            state.broadcast_rooms();
        }
        Some((player, game))
    }

    pub async fn broadcast_rooms(&self) {
        self.state.lock().await.broadcast_rooms();
    }

    pub async fn rooms(&self) -> Vec<RoomView> {
        self.state.lock().await.rooms.views()
    }

    pub async fn winners(&self) -> Vec<WinnerView> {
        self.state.lock().await.leaderboard.view()
    }

    pub async fn player_of(&self, conn: ConnId) -> Option<PlayerId> {
        self.state.lock().await.connections.player_of(conn).cloned()
    }

    /// Whether `player` is still online and bound to `game`.
    pub async fn holds(&self, player: &PlayerId, game: &GameId) -> bool {
        let state = self.state.lock().await;
        state.connections.is_online(player) && state.users.game_of(player) == Some(game)
    }

    pub async fn release_game(&self, player: &PlayerId, game: &GameId) {
        self.state.lock().await.users.release_game(player, game);
    }

    /// Drop `conn`. Closes the player's open room and returns the player
    /// with the session they were in, if any.
    pub async fn disconnect(&self, conn: ConnId) -> Option<(PlayerId, Option<GameId>)> {
        let mut state = self.state.lock().await;
        let player = state.connections.close(conn);
        debug!("{} disconnected", conn);
        let player = player?;
        if state.rooms.remove_by_player(&player) {
            state.broadcast_rooms();
        }
        let game = state.users.take_game(&player);
        Some((player, game))
    }
}

#[async_trait::async_trait]
impl Outbox for Lobby {
    async fn send(&self, to: &PlayerId, message: Outgoing) {
        let mut state = self.state.lock().await;
        // A finish frees the player for their next game.
        if let Outgoing::Finish(_) = &message {
            state.users.take_game(to);
        }
        state.connections.send_to_player(to, message);
    }
}

#[async_trait::async_trait]
impl ScoreBoard for Lobby {
    async fn record_win(&self, winner: &PlayerId) {
        let mut state = self.state.lock().await;
        let Some(name) = state.users.by_id(winner).map(|u| u.name.clone()) else {
            debug!("win by unregistered {} not counted", winner);
            return;
        };
        let wins = state.leaderboard.record(&name);
        info!("{} now has {} win(s)", name, wins);
        state.broadcast_winners();
    }
}
