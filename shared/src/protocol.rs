//! Messages exchanged between a connected client and the session server

use crate::Hand;
use serde::{Deserialize, Serialize};

/// Operations a connected peer may invoke on the session
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Request {
    IdentifyCallerAsHost,
    InProgress,
    IsFull,
    Join { name: String },
    Leave { name: String },
    SelectHand { name: String, hand: Hand },
    SetPointLimit { limit: i64 },
    StartGame,
    ValidPlayerCount,
    ResetScores,
    ReturnToLobby,
}

/// State pushed by the server to every registered client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Notification {
    ReadyToStart,
    TieRound,
    WinRound,
    LossRound,
    LockedInBoard(Vec<String>),
    LobbyBoard(Vec<String>),
    ScoreBoard(Vec<String>),
    StartingGame {
        scoreboard: Vec<String>,
        win_threshold: u32,
    },
    EndGame(Vec<String>),
    HostDisconnected,
    /// The host abandoned the match; followed by the lobby listing
    ReturnedToLobby,
}

/// Answer to a single `Request`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Reply {
    Flag(bool),
    Done,
    Rejected { reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ClientPacket {
    Call(Request),
}

/// Replies and notifications share one ordered stream per connection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ServerPacket {
    Reply(Reply),
    Notify(Notification),
}
