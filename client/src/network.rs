use crate::game::ClientView;
use crate::input::{parse_command, Command, HELP};
use crate::rendering::{print_lines, render_notification, render_status};
use log::{debug, error, info, warn};
use shared::{
    read_frame, write_frame, ClientPacket, Hand, Notification, ProtocolError, Reply, Request,
    ServerPacket,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("connection to server closed")]
    ConnectionClosed,
    #[error("server rejected request: {0}")]
    Rejected(String),
    #[error("unexpected reply {0:?}")]
    UnexpectedReply(Reply),
}

/// Request/reply channel to the server
///
/// A background task reads the socket, forwarding replies to `call` and
/// notifications to the receiver returned by `connect`.
pub struct Connection {
    writer: OwnedWriteHalf,
    replies: mpsc::UnboundedReceiver<Reply>,
    reader_task: JoinHandle<()>,
}

impl Connection {
    pub async fn connect(
        server_addr: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Notification>), ClientError> {
        let stream = TcpStream::connect(server_addr)
            .await
            .map_err(ProtocolError::from)?;
        stream.set_nodelay(true).map_err(ProtocolError::from)?;
        let (mut reader, writer) = stream.into_split();

        let (reply_tx, replies) = mpsc::unbounded_channel();
        let (notify_tx, notifications) = mpsc::unbounded_channel();

        let reader_task = tokio::spawn(async move {
            loop {
                match read_frame::<_, ServerPacket>(&mut reader).await {
                    Ok(Some(ServerPacket::Reply(reply))) => {
                        if reply_tx.send(reply).is_err() {
                            break;
                        }
                    }
                    Ok(Some(ServerPacket::Notify(notification))) => {
                        debug!("Notification: {:?}", notification);
                        if notify_tx.send(notification).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Server closed the connection");
                        break;
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        break;
                    }
                }
            }
        });

        Ok((
            Connection {
                writer,
                replies,
                reader_task,
            },
            notifications,
        ))
    }

    /// Sends a request and waits for its reply
    pub async fn call(&mut self, request: Request) -> Result<Reply, ClientError> {
        write_frame(&mut self.writer, &ClientPacket::Call(request)).await?;
        self.replies.recv().await.ok_or(ClientError::ConnectionClosed)
    }

    pub async fn call_flag(&mut self, request: Request) -> Result<bool, ClientError> {
        match self.call(request).await? {
            Reply::Flag(flag) => Ok(flag),
            Reply::Rejected { reason } => Err(ClientError::Rejected(reason)),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    pub async fn call_unit(&mut self, request: Request) -> Result<(), ClientError> {
        match self.call(request).await? {
            Reply::Done => Ok(()),
            Reply::Rejected { reason } => Err(ClientError::Rejected(reason)),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

/// Interactive terminal client
pub struct Client {
    connection: Connection,
    notifications: mpsc::UnboundedReceiver<Notification>,
    view: ClientView,
}

impl Client {
    pub async fn new(server_addr: &str) -> Result<Self, ClientError> {
        info!("Connecting to {}", server_addr);
        let (mut connection, notifications) = Connection::connect(server_addr).await?;

        let is_host = connection.call_flag(Request::IdentifyCallerAsHost).await?;
        info!("Connected{}", if is_host { " as host" } else { "" });

        Ok(Client {
            connection,
            notifications,
            view: ClientView::new(is_host),
        })
    }

    pub fn view(&self) -> &ClientView {
        &self.view
    }

    /// Tries to join under `name`, explaining why if the server refuses
    pub async fn join(&mut self, name: &str) -> Result<bool, ClientError> {
        let accepted = self
            .connection
            .call_flag(Request::Join {
                name: name.to_string(),
            })
            .await?;

        if accepted {
            self.view.name = Some(name.to_string());
            if self.view.is_host {
                println!("Lobby - waiting for players. Set a score with 'limit <n>'.");
            } else {
                println!("Lobby - waiting on the host to start...");
            }
        } else if self.connection.call_flag(Request::InProgress).await? {
            println!("Game is in progress, please wait for the next game...");
        } else if self.connection.call_flag(Request::IsFull).await? {
            println!("Lobby is full, please wait for the next game...");
        } else {
            println!("Alias '{}' is not available. Please try another.", name);
        }
        Ok(accepted)
    }

    async fn execute(&mut self, command: Command) -> Result<bool, ClientError> {
        match command {
            Command::Join(name) => {
                if let Some(current) = &self.view.name {
                    println!("Already joined as {}", current);
                } else {
                    self.join(&name).await?;
                }
            }
            Command::Limit(limit) => {
                self.connection
                    .call_unit(Request::SetPointLimit {
                        limit: i64::from(limit.get()),
                    })
                    .await?;
                println!("First to {} wins.", limit);
                if self.connection.call_flag(Request::ValidPlayerCount).await? {
                    println!("Type 'start' when ready.");
                }
            }
            Command::Start => self.connection.call_unit(Request::StartGame).await?,
            Command::Throw(hand) => self.throw(hand).await?,
            Command::Lobby => self.connection.call_unit(Request::ReturnToLobby).await?,
            Command::Status => print_lines(&render_status(&self.view)),
            Command::Help => println!("{}", HELP),
            Command::Leave => {
                self.leave().await?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Commits `hand` for the current round
    ///
    /// The hand only counts as locked in once the server has accepted it.
    pub async fn throw(&mut self, hand: Hand) -> Result<(), ClientError> {
        let Some(name) = self.view.name.clone() else {
            println!("Join the lobby first");
            return Ok(());
        };
        if !self.view.in_game() {
            println!("The game has not started yet");
        } else if let Some(locked) = self.view.locked_hand {
            println!("Already locked in {} this round", locked);
        } else {
            self.connection
                .call_unit(Request::SelectHand { name, hand })
                .await?;
            self.view.locked_hand = Some(hand);
            println!("Round {} - {} locked in! Waiting...", self.view.round, hand);
        }
        Ok(())
    }

    pub async fn leave(&mut self) -> Result<(), ClientError> {
        if let Some(name) = self.view.name.take() {
            self.connection.call_unit(Request::Leave { name }).await?;
        }
        Ok(())
    }

    fn show(&mut self, notification: Notification) {
        self.view.apply(&notification);
        print_lines(&render_notification(&self.view, &notification));
    }

    /// Main loop: terminal commands in, notifications out
    pub async fn run(&mut self) -> Result<(), ClientError> {
        println!("{}", HELP);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(e) => {
                            error!("Error reading input: {}", e);
                            break;
                        }
                    };

                    match parse_command(&line) {
                        Ok(command) => match self.execute(command).await {
                            Ok(true) => {}
                            Ok(false) => return Ok(()),
                            Err(ClientError::Rejected(reason)) => println!("{}", reason),
                            Err(e) => return Err(e),
                        },
                        Err(e) => println!("{}", e),
                    }
                },

                notification = self.notifications.recv() => {
                    match notification {
                        Some(notification) => self.show(notification),
                        None => {
                            warn!("Lost connection to server");
                            return Err(ClientError::ConnectionClosed);
                        }
                    }
                },
            }
        }

        self.leave().await
    }
}
