//! Typed payloads carried inside the `data` field of an envelope.

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::ship::{Position, ShipPlacement};
use crate::domain::{GameId, PlayerId};

/// Per-cell result reported in an `attack` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackStatus {
    Miss,
    Shot,
    Killed,
}

// Clients may echo identifiers back as numbers.
fn flexible_id<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(de)? {
        Raw::Text(s) => T::from(s),
        Raw::Number(n) => T::from(n.to_string()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    #[serde(deserialize_with = "flexible_id")]
    pub index_room: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddShipsRequest {
    #[serde(deserialize_with = "flexible_id")]
    pub game_id: GameId,
    pub ships: Vec<ShipPlacement>,
    #[serde(deserialize_with = "flexible_id")]
    pub index_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRequest {
    #[serde(deserialize_with = "flexible_id")]
    pub game_id: GameId,
    pub x: u8,
    pub y: u8,
    #[serde(deserialize_with = "flexible_id")]
    pub index_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomAttackRequest {
    #[serde(deserialize_with = "flexible_id")]
    pub game_id: GameId,
    #[serde(deserialize_with = "flexible_id")]
    pub index_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegReply {
    pub name: String,
    pub index: String,
    pub error: bool,
    pub error_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUser {
    pub name: String,
    pub index: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub room_id: String,
    pub room_users: Vec<RoomUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGame {
    pub id_game: GameId,
    pub id_player: PlayerId,
}

/// Sent to each participant with their own fleet only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGame {
    pub current_player_index: PlayerId,
    pub ships: Vec<ShipPlacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub current_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackFeedback {
    pub status: AttackStatus,
    pub position: Position,
    pub current_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finish {
    pub win_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerView {
    pub name: String,
    pub wins: u32,
}
