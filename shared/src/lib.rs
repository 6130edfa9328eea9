//! Protocol vocabulary shared by the rock-paper-scissors server and client
//!
//! Both ends agree on the hands a player can throw, the win threshold the host
//! configures, the calls a client may make, the notifications the server pushes
//! and the framing used to carry them over a TCP stream.

pub mod codec;
pub mod protocol;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

pub use codec::{read_frame, write_frame, ProtocolError, MAX_FRAME_LEN};
pub use protocol::{ClientPacket, Notification, Reply, Request, ServerPacket};

/// Maximum number of players admitted to one session
pub const MAX_PLAYERS: usize = 4;
/// Minimum number of players needed before the host may start
pub const MIN_PLAYERS: usize = 2;
/// Longest alias, in characters, the server will admit
pub const MAX_NAME_LEN: usize = 32;

/// A hand a player can commit for a round
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// Rock beats Scissors, Scissors beats Paper, Paper beats Rock
    pub fn beats(self, other: Hand) -> bool {
        other.beaten_by() == self
    }

    /// The single hand that beats this one
    pub fn beaten_by(self) -> Hand {
        match self {
            Hand::Rock => Hand::Paper,
            Hand::Paper => Hand::Scissors,
            Hand::Scissors => Hand::Rock,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hand::Rock => "Rock",
            Hand::Paper => "Paper",
            Hand::Scissors => "Scissors",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown hand '{0}', expected rock, paper or scissors")]
pub struct ParseHandError(pub String);

impl FromStr for Hand {
    type Err = ParseHandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Hand::Rock),
            "paper" | "p" => Ok(Hand::Paper),
            "scissors" | "s" => Ok(Hand::Scissors),
            _ => Err(ParseHandError(s.to_string())),
        }
    }
}

/// Invalid host-supplied configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("point limit must be a positive integer, got '{0}'")]
    InvalidPointLimit(String),
    #[error("no point limit has been set")]
    PointLimitUnset,
}

/// Score a player must reach to win the match
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointLimit(NonZeroU32);

impl PointLimit {
    pub fn new(limit: i64) -> Result<Self, ConfigError> {
        u32::try_from(limit)
            .ok()
            .and_then(NonZeroU32::new)
            .map(PointLimit)
            .ok_or_else(|| ConfigError::InvalidPointLimit(limit.to_string()))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl FromStr for PointLimit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPointLimit(s.to_string()))?;
        PointLimit::new(value).map_err(|_| ConfigError::InvalidPointLimit(s.to_string()))
    }
}

impl fmt::Display for PointLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
