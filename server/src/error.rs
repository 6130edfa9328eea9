use crate::sink::SinkId;
use shared::ConfigError;
use thiserror::Error;

/// Reasons a host-only session operation is refused
///
/// Admission problems are not errors; `join` answers them with `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0} is not the host")]
    NotHost(SinkId),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("{0} players present, need between {min} and {max}", min = shared::MIN_PLAYERS, max = shared::MAX_PLAYERS)]
    InvalidPlayerCount(usize),
}
