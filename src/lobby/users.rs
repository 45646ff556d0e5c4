use std::collections::HashMap;

use crate::domain::{GameId, PlayerId};

#[derive(Debug, Clone)]
pub struct User {
    pub name: String,
    password: String,
    pub id: PlayerId,
    /// Session the user is playing in. At most one at a time.
    pub game: Option<GameId>,
}

/// Why a registration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    WrongPassword,
}

/// Registered users keyed by name.
#[derive(Default)]
pub struct Users {
    by_name: HashMap<String, User>,
    names: HashMap<PlayerId, String>,
}

impl Users {
    /// Create the user on first sight of `name`, otherwise check the
    /// password of the existing account.
    pub fn login(&mut self, name: &str, password: &str) -> Result<&User, LoginError> {
        if !self.by_name.contains_key(name) {
            let user = User {
                name: name.to_string(),
                password: password.to_string(),
                id: PlayerId::generate(),
                game: None,
            };
            self.names.insert(user.id.clone(), user.name.clone());
            self.by_name.insert(user.name.clone(), user);
        }
        match self.by_name.get(name) {
            Some(user) if user.password == password => Ok(user),
            _ => Err(LoginError::WrongPassword),
        }
    }

    pub fn by_id(&self, id: &PlayerId) -> Option<&User> {
        self.names.get(id).and_then(|name| self.by_name.get(name))
    }

    fn by_id_mut(&mut self, id: &PlayerId) -> Option<&mut User> {
        let name = self.names.get(id)?;
        self.by_name.get_mut(name)
    }

    pub fn game_of(&self, id: &PlayerId) -> Option<&GameId> {
        self.by_id(id).and_then(|u| u.game.as_ref())
    }

    /// Place `id` in `game` unless they are already playing.
    pub fn bind_game(&mut self, id: &PlayerId, game: GameId) -> bool {
        match self.by_id_mut(id) {
            Some(user) if user.game.is_none() => {
                user.game = Some(game);
                true
            }
            _ => false,
        }
    }

    /// Unbind `id` from `game`; a binding to another game stays.
    pub fn release_game(&mut self, id: &PlayerId, game: &GameId) {
        if let Some(user) = self.by_id_mut(id) {
            if user.game.as_ref() == Some(game) {
                user.game = None;
            }
        }
    }

    /// Forget the session binding of `id` and return it.
    pub fn take_game(&mut self, id: &PlayerId) -> Option<GameId> {
        self.by_id_mut(id).and_then(|u| u.game.take())
    }
}
