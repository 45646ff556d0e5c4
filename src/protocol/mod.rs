//! Wire protocol: JSON envelopes `{type, data, id}` whose `data` field is
//! itself a JSON-encoded payload string.

pub mod messages;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use messages::*;

/// Errors raised while decoding or encoding protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),
    #[error("malformed payload for '{kind}': {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Outer frame of every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub id: u32,
}

impl Envelope {
    fn encode<T: Serialize>(kind: &str, payload: &T) -> Result<Self, ProtocolError> {
        Ok(Self {
            kind: kind.to_string(),
            data: serde_json::to_string(payload).map_err(ProtocolError::Encode)?,
            id: 0,
        })
    }

    fn empty(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            data: String::new(),
            id: 0,
        }
    }

    fn payload<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_str(&self.data).map_err(|source| ProtocolError::InvalidPayload {
            kind: self.kind.clone(),
            source,
        })
    }

    /// Parse one frame of text.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::InvalidEnvelope)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// Requests a client may send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Reg(RegRequest),
    CreateRoom,
    AddUserToRoom(JoinRoomRequest),
    AddShips(AddShipsRequest),
    Attack(AttackRequest),
    RandomAttack(RandomAttackRequest),
    SinglePlay,
}

impl Incoming {
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError> {
        Ok(match envelope.kind.as_str() {
            "reg" => Incoming::Reg(envelope.payload()?),
            "create_room" => Incoming::CreateRoom,
            "add_user_to_room" => Incoming::AddUserToRoom(envelope.payload()?),
            "add_ships" => Incoming::AddShips(envelope.payload()?),
            "attack" => Incoming::Attack(envelope.payload()?),
            "randomAttack" => Incoming::RandomAttack(envelope.payload()?),
            "single_play" => Incoming::SinglePlay,
            other => return Err(ProtocolError::UnknownType(other.to_string())),
        })
    }

    pub fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        match self {
            Incoming::Reg(p) => Envelope::encode("reg", p),
            Incoming::CreateRoom => Ok(Envelope::empty("create_room")),
            Incoming::AddUserToRoom(p) => Envelope::encode("add_user_to_room", p),
            Incoming::AddShips(p) => Envelope::encode("add_ships", p),
            Incoming::Attack(p) => Envelope::encode("attack", p),
            Incoming::RandomAttack(p) => Envelope::encode("randomAttack", p),
            Incoming::SinglePlay => Ok(Envelope::empty("single_play")),
        }
    }
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Reg(RegReply),
    UpdateRoom(Vec<RoomView>),
    CreateGame(CreateGame),
    StartGame(StartGame),
    Turn(Turn),
    Attack(AttackFeedback),
    Finish(Finish),
    UpdateWinners(Vec<WinnerView>),
}

impl Outgoing {
    pub fn kind(&self) -> &'static str {
        match self {
            Outgoing::Reg(_) => "reg",
            Outgoing::UpdateRoom(_) => "update_room",
            Outgoing::CreateGame(_) => "create_game",
            Outgoing::StartGame(_) => "start_game",
            Outgoing::Turn(_) => "turn",
            Outgoing::Attack(_) => "attack",
            Outgoing::Finish(_) => "finish",
            Outgoing::UpdateWinners(_) => "update_winners",
        }
    }

    pub fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        let kind = self.kind();
        match self {
            Outgoing::Reg(p) => Envelope::encode(kind, p),
            Outgoing::UpdateRoom(p) => Envelope::encode(kind, p),
            Outgoing::CreateGame(p) => Envelope::encode(kind, p),
            Outgoing::StartGame(p) => Envelope::encode(kind, p),
            Outgoing::Turn(p) => Envelope::encode(kind, p),
            Outgoing::Attack(p) => Envelope::encode(kind, p),
            Outgoing::Finish(p) => Envelope::encode(kind, p),
            Outgoing::UpdateWinners(p) => Envelope::encode(kind, p),
        }
    }

    /// Client-side decoding of a server message.
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError> {
        Ok(match envelope.kind.as_str() {
            "reg" => Outgoing::Reg(envelope.payload()?),
            "update_room" => Outgoing::UpdateRoom(envelope.payload()?),
            "create_game" => Outgoing::CreateGame(envelope.payload()?),
            "start_game" => Outgoing::StartGame(envelope.payload()?),
            "turn" => Outgoing::Turn(envelope.payload()?),
            "attack" => Outgoing::Attack(envelope.payload()?),
            "finish" => Outgoing::Finish(envelope.payload()?),
            "update_winners" => Outgoing::UpdateWinners(envelope.payload()?),
            other => return Err(ProtocolError::UnknownType(other.to_string())),
        })
    }
}
