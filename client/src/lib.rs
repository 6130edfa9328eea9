//! # Rock-Paper-Scissors Terminal Client
//!
//! A thin client for the session server. It forwards typed commands as
//! requests and keeps a local view of the session built purely from the
//! notifications the server pushes.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! TCP connection with request/reply calls, and the interactive `Client`
//! loop that multiplexes terminal input with pushed notifications.
//!
//! ### Game Module (`game`)
//! The `ClientView`: latest boards, win threshold, host flag and the locally
//! counted round number.
//!
//! ### Input Module (`input`)
//! Parsing of terminal lines into commands.
//!
//! ### Rendering Module (`rendering`)
//! Plain-text rendering of boards and round results.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new("127.0.0.1:8080").await?;
//!     client.join("Alice").await?;
//!     client.run().await?;
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
