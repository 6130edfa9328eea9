//! # Rock-Paper-Scissors Session Server
//!
//! This library provides the authoritative server for a small multiplayer
//! rock-paper-scissors match. Clients join a shared lobby, the first client to
//! identify itself becomes host, and once two to four players are present the
//! host sets a win threshold and starts a round-based match.
//!
//! ## Core Responsibilities
//!
//! ### Lobby Admission
//! Players join under a case-insensitively unique alias. Joins are refused
//! once the room holds four players or while a game is running.
//!
//! ### Round Synchronization
//! A round resolves only when every player has committed a hand. Resolution
//! is a pure function of which hands were thrown: one distinct hand or all
//! three is a tie, exactly two distinct hands means everyone holding the
//! stronger one scores a point.
//!
//! ### State Broadcasting
//! Every state change is pushed to all joined clients as a board update. There
//! is no polling; clients learn about the rest of the table purely through
//! these notifications.
//!
//! ## Module Organization
//!
//! ### Session Module (`session`)
//! The single lock-protected session: roster, host binding, point limit,
//! hands and scores, and every operation a client can invoke.
//!
//! ### Round Module (`round`)
//! Hand presence tracking and the tie/win/loss rule.
//!
//! ### Board Module (`board`)
//! Text layouts for the lobby, score, final and locked-in boards.
//!
//! ### Sink Module (`sink`)
//! The `NotificationSink` abstraction the session pushes through, and the
//! outbox that delivers notifications after the session lock is released.
//!
//! ### Network Module (`network`)
//! TCP accept loop and per-connection request dispatch.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("127.0.0.1:8080").await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod error;
pub mod network;
pub mod player;
pub mod round;
pub mod session;
pub mod sink;

pub use error::SessionError;
pub use session::Session;
pub use sink::{NotificationSink, SinkId};
