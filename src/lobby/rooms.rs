use uuid::Uuid;

use crate::domain::PlayerId;
use crate::protocol::{RoomUser, RoomView};

#[derive(Debug, Clone)]
struct Room {
    id: String,
    owner: RoomUser,
}

/// Open rooms, each waiting for a second player.
#[derive(Default)]
pub struct Rooms {
    open: Vec<Room>,
}

impl Rooms {
    pub fn room_of(&self, player: &PlayerId) -> Option<&str> {
        self.open
            .iter()
            .find(|r| &r.owner.index == player)
            .map(|r| r.id.as_str())
    }

    pub fn owner_of(&self, room_id: &str) -> Option<&PlayerId> {
        self.open
            .iter()
            .find(|r| r.id == room_id)
            .map(|r| &r.owner.index)
    }

    /// Open a room for `owner`. `None` if they already have one.
    pub fn create(&mut self, owner: PlayerId, name: &str) -> Option<String> {
        if self.room_of(&owner).is_some() {
            return None;
        }
        let id = Uuid::new_v4().to_string();
        self.open.push(Room {
            id: id.clone(),
            owner: RoomUser {
                name: name.to_string(),
                index: owner,
            },
        });
        Some(id)
    }

    /// `joiner` takes the seat in `room_id`. The room closes and so does
    /// any room the joiner had open. Returns `(owner, joiner)`.
    pub fn join(&mut self, room_id: &str, joiner: &PlayerId) -> Option<(PlayerId, PlayerId)> {
        let index = self.open.iter().position(|r| r.id == room_id)?;
        if &self.open[index].owner.index == joiner {
            return None;
        }
        let room = self.open.remove(index);
        self.remove_by_player(joiner);
        Some((room.owner.index, joiner.clone()))
    }

    /// Close the room owned by `player`, if any.
    pub fn remove_by_player(&mut self, player: &PlayerId) -> bool {
        let before = self.open.len();
        self.open.retain(|r| &r.owner.index != player);
        self.open.len() != before
    }

    pub fn views(&self) -> Vec<RoomView> {
        self.open
            .iter()
            .map(|r| RoomView {
                room_id: r.id.clone(),
                room_users: vec![r.owner.clone()],
            })
            .collect()
    }
}
