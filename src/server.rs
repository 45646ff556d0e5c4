//! Connection handling and message dispatch.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::net::TcpListener;

use crate::config::EngineConfig;
use crate::core::Position;
use crate::domain::{ConnId, GameId, PlayerId};
use crate::lobby::Lobby;
use crate::protocol::{Envelope, Incoming};
use crate::session::SessionRegistry;
use crate::transport::{TcpTransport, Transport};

pub struct GameServer {
    lobby: Arc<Lobby>,
    sessions: Arc<SessionRegistry>,
}

impl GameServer {
    pub fn new(config: EngineConfig) -> Self {
        let lobby = Arc::new(Lobby::new());
        let sessions = Arc::new(SessionRegistry::new(
            config,
            lobby.clone(),
            lobby.clone(),
        ));
        Self { lobby, sessions }
    }

    pub fn lobby(&self) -> &Arc<Lobby> {
        &self.lobby
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Accept TCP clients forever, one task per connection.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        info!("listening on {}", listener.local_addr()?);
        loop {
            let (stream, addr) = listener.accept().await?;
            info!("client connected from {}", addr);
            let server = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = server.run_connection(TcpTransport::new(stream)).await {
                    info!("connection from {} ended: {}", addr, e);
                }
            });
        }
    }

    /// Pump one client until its transport fails, then clean up after it.
    pub async fn run_connection<T: Transport>(&self, mut transport: T) -> anyhow::Result<()> {
        let (conn, mut outbound) = self.lobby.connect().await;
        let result = loop {
            tokio::select! {
                incoming = transport.recv() => match incoming {
                    Ok(envelope) => self.handle(conn, envelope).await,
                    Err(e) => break Err(e),
                },
                Some(message) = outbound.recv() => {
                    let sent = match message.to_envelope() {
                        Ok(envelope) => transport.send(envelope).await,
                        Err(e) => Err(e.into()),
                    };
                    if let Err(e) = sent {
                        break Err(e);
                    }
                }
            }
        };
        self.disconnect(conn).await;
        result
    }

    /// Dispatch one envelope from `conn`. Anything unparsable, from an
    /// unregistered connection, or rejected by the engine changes nothing.
    pub async fn handle(&self, conn: ConnId, envelope: Envelope) {
        let request = match Incoming::from_envelope(&envelope) {
            Ok(request) => request,
            Err(e) => {
                warn!("{}: {}", conn, e);
                return;
            }
        };

        match request {
            Incoming::Reg(request) => {
                self.lobby.register(conn, &request).await;
            }
            Incoming::CreateRoom => {
                self.lobby.create_room(conn).await;
            }
            Incoming::AddUserToRoom(request) => {
                let Some(pairing) = self.lobby.join_room(conn, &request.index_room).await else {
                    return;
                };
                let game = self
                    .sessions
                    .open_duel(pairing.game, pairing.owner.clone(), pairing.joiner.clone())
                    .await;
                self.lobby.broadcast_rooms().await;
                self.settle(&game, &[pairing.owner, pairing.joiner]).await;
            }
            Incoming::AddShips(request) => {
                if !self.acts_as(conn, &request.index_player).await {
                    return;
                }
                if let Err(e) = self
                    .sessions
                    .add_fleet(&request.game_id, &request.index_player, &request.ships)
                    .await
                {
                    warn!("[{}] fleet from {} rejected: {}", request.game_id, request.index_player, e);
                }
            }
            Incoming::Attack(request) => {
                if !self.acts_as(conn, &request.index_player).await {
                    return;
                }
                let target = Position::new(request.x, request.y);
                self.sessions
                    .attack(&request.game_id, &request.index_player, target)
                    .await;
            }
            Incoming::RandomAttack(request) => {
                if !self.acts_as(conn, &request.index_player).await {
                    return;
                }
                self.sessions
                    .random_attack(&request.game_id, &request.index_player)
                    .await;
            }
            Incoming::SinglePlay => {
                let Some((player, game)) = self.lobby.claim_single_play(conn).await else {
                    debug!("{}: single play refused", conn);
                    return;
                };
                match self.sessions.open_versus_bot(game.clone(), player.clone()).await {
                    Ok(game) => self.settle(&game, &[player]).await,
                    Err(e) => {
                        warn!("{}: single play failed: {}", conn, e);
                        self.lobby.release_game(&player, &game).await;
                    }
                }
            }
        }
    }

    // Finish `game` for any player who went offline while it was being
    // set up; `disconnect` ran before the session existed.
    async fn settle(&self, game: &GameId, players: &[PlayerId]) {
        for player in players {
            if !self.lobby.holds(player, game).await {
                self.sessions
                    .finish_when_participant_leaves(game, player)
                    .await;
            }
        }
    }

    // Requests naming a player must come from that player's connection.
    async fn acts_as(&self, conn: ConnId, player: &PlayerId) -> bool {
        let bound = self.lobby.player_of(conn).await;
        if bound.as_ref() != Some(player) {
            debug!("{} may not act as {}", conn, player);
            return false;
        }
        true
    }

    /// Forget `conn`; a session it was playing in ends with the opponent
    /// as the winner.
    pub async fn disconnect(&self, conn: ConnId) {
        let Some((player, game)) = self.lobby.disconnect(conn).await else {
            return;
        };
        info!("player {} left", player);
        if let Some(game) = game {
            self.sessions
                .finish_when_participant_leaves(&game, &player)
                .await;
        }
    }
}
