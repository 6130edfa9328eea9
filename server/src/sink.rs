//! Push targets for session notifications
//!
//! The session never talks to a socket directly. Each connected client is
//! represented by a `NotificationSink`, and the session only ever compares
//! sinks by `SinkId` or hands them notifications to deliver.

use log::warn;
use shared::{Notification, ServerPacket};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Identity of one connected client, assigned by the host process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(pub u64);

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink#{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("{0} is no longer connected")]
    Disconnected(SinkId),
}

/// A client that can receive pushed state
///
/// Implementors only need `id` and `deliver`; the named helpers mirror the
/// outbound operations a client understands.
pub trait NotificationSink: Send + Sync {
    fn id(&self) -> SinkId;

    /// Hands the notification off without waiting on the client
    fn deliver(&self, notification: Notification) -> Result<(), SinkError>;

    fn ready_to_start(&self) -> Result<(), SinkError> {
        self.deliver(Notification::ReadyToStart)
    }

    fn tie_round(&self) -> Result<(), SinkError> {
        self.deliver(Notification::TieRound)
    }

    fn win_round(&self) -> Result<(), SinkError> {
        self.deliver(Notification::WinRound)
    }

    fn loss_round(&self) -> Result<(), SinkError> {
        self.deliver(Notification::LossRound)
    }

    fn locked_in_board(&self, entries: Vec<String>) -> Result<(), SinkError> {
        self.deliver(Notification::LockedInBoard(entries))
    }

    fn lobby_board(&self, entries: Vec<String>) -> Result<(), SinkError> {
        self.deliver(Notification::LobbyBoard(entries))
    }

    fn score_board(&self, entries: Vec<String>) -> Result<(), SinkError> {
        self.deliver(Notification::ScoreBoard(entries))
    }

    fn starting_game(&self, scoreboard: Vec<String>, win_threshold: u32) -> Result<(), SinkError> {
        self.deliver(Notification::StartingGame {
            scoreboard,
            win_threshold,
        })
    }

    fn end_game(&self, final_scoreboard: Vec<String>) -> Result<(), SinkError> {
        self.deliver(Notification::EndGame(final_scoreboard))
    }

    fn host_disconnected(&self) -> Result<(), SinkError> {
        self.deliver(Notification::HostDisconnected)
    }

    fn returned_to_lobby(&self) -> Result<(), SinkError> {
        self.deliver(Notification::ReturnedToLobby)
    }
}

/// Shared handle to a client's sink
pub type Sink = Arc<dyn NotificationSink>;

/// Sink backed by the outbound queue of a network connection
#[derive(Debug, Clone)]
pub struct ChannelSink {
    id: SinkId,
    sender: mpsc::UnboundedSender<ServerPacket>,
}

impl ChannelSink {
    pub fn new(id: SinkId, sender: mpsc::UnboundedSender<ServerPacket>) -> Self {
        Self { id, sender }
    }
}

impl NotificationSink for ChannelSink {
    fn id(&self) -> SinkId {
        self.id
    }

    fn deliver(&self, notification: Notification) -> Result<(), SinkError> {
        self.sender
            .send(ServerPacket::Notify(notification))
            .map_err(|_| SinkError::Disconnected(self.id))
    }
}

/// One pending call on a sink's outbound interface
type Delivery = Box<dyn FnOnce(&dyn NotificationSink) -> Result<(), SinkError> + Send>;

/// Notifications queued under the session lock, sent after it is released
#[derive(Default)]
pub struct Outbox {
    pending: Vec<(Sink, Delivery)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `send` to run against `sink` on dispatch
    pub fn push<F>(&mut self, sink: &Sink, send: F)
    where
        F: FnOnce(&dyn NotificationSink) -> Result<(), SinkError> + Send + 'static,
    {
        self.pending.push((Arc::clone(sink), Box::new(send)));
    }

    /// Delivers everything in order
    ///
    /// A failing recipient is logged and skipped; the remaining recipients
    /// still get their notifications.
    pub fn dispatch(self) {
        for (sink, send) in self.pending {
            if let Err(e) = send(sink.as_ref()) {
                warn!("Dropping notification: {}", e);
            }
        }
    }
}
