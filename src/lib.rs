pub mod config;
pub mod core;
pub mod domain;
pub mod lobby;
mod logging;
pub mod protocol;
pub mod server;
pub mod session;
pub mod sim;
pub mod transport;

pub use config::{EngineConfig, ServerConfig};
pub use domain::{ConnId, GameId, PlayerId};
pub use lobby::Lobby;
pub use logging::init_logging;
pub use protocol::{Envelope, Incoming, Outgoing, ProtocolError};
pub use server::GameServer;
pub use session::{BattleSession, SessionError, SessionRegistry};
pub use sim::{simulate_duel, SimulationReport};
pub use transport::{InMemoryTransport, TcpTransport, Transport};
