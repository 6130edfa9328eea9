use crate::sink::{Sink, SinkId};
use shared::Hand;
use std::fmt;

/// A joined member of the session and their per-round state
#[derive(Clone)]
pub struct Player {
    /// Alias as typed by the client; compared case-insensitively
    pub name: String,
    /// Fixed at admission
    pub is_host: bool,
    pub score: u32,
    /// `None` until the player commits a hand for the current round
    pub hand: Option<Hand>,
    pub sink: Sink,
}

impl Player {
    pub fn new(name: &str, is_host: bool, sink: Sink) -> Self {
        Self {
            name: name.to_string(),
            is_host,
            score: 0,
            hand: None,
            sink,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.to_uppercase() == name.to_uppercase()
    }

    pub fn is_locked_in(&self) -> bool {
        self.hand.is_some()
    }

    pub fn sink_id(&self) -> SinkId {
        self.sink.id()
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("is_host", &self.is_host)
            .field("score", &self.score)
            .field("hand", &self.hand)
            .field("sink", &self.sink_id())
            .finish()
    }
}
