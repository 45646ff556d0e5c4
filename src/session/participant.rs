use crate::domain::PlayerId;

/// One side of a battle session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Participant {
    /// A registered player reachable through a live connection.
    Human(PlayerId),
    /// The autonomous opponent; it has no connection to send to.
    Bot(PlayerId),
}

impl Participant {
    pub fn bot() -> Self {
        Participant::Bot(PlayerId::bot())
    }

    pub fn id(&self) -> &PlayerId {
        match self {
            Participant::Human(id) | Participant::Bot(id) => id,
        }
    }

    /// Whether outbound messages for this participant should be delivered.
    pub fn has_connection(&self) -> bool {
        matches!(self, Participant::Human(_))
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Participant::Bot(_))
    }
}
