//! Server network layer: TCP accept loop and per-connection request handling

use crate::session::Session;
use crate::sink::{ChannelSink, Sink, SinkId};
use log::{debug, error, info, warn};
use shared::{read_frame, write_frame, ClientPacket, ProtocolError, Reply, Request, ServerPacket};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// One connected client as seen by the server
///
/// Tracks which aliases this connection joined with so they can be released
/// when the connection drops without an explicit leave.
pub struct Peer {
    sink: Sink,
    aliases: Vec<String>,
}

impl Peer {
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            aliases: Vec::new(),
        }
    }

    pub fn id(&self) -> SinkId {
        self.sink.id()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Runs one request against the session and builds the reply
    pub async fn handle_request(&mut self, session: &Session, request: Request) -> Reply {
        debug!("{} -> {:?}", self.id(), request);

        match request {
            Request::IdentifyCallerAsHost => Reply::Flag(session.identify_caller(self.id()).await),
            Request::InProgress => Reply::Flag(session.in_progress().await),
            Request::IsFull => Reply::Flag(session.is_full().await),
            Request::ValidPlayerCount => Reply::Flag(session.valid_player_count().await),
            Request::Join { name } => {
                let accepted = session.join(&name, &self.sink).await;
                if accepted {
                    self.aliases.push(name);
                }
                Reply::Flag(accepted)
            }
            Request::Leave { name } => {
                session.leave(self.id(), &name).await;
                self.aliases
                    .retain(|alias| alias.to_uppercase() != name.to_uppercase());
                Reply::Done
            }
            Request::SelectHand { name, hand } => {
                session.select_hand(&name, hand).await;
                Reply::Done
            }
            Request::SetPointLimit { limit } => {
                Self::done_or_rejected(session.set_point_limit(self.id(), limit).await)
            }
            Request::StartGame => Self::done_or_rejected(session.start_game(self.id()).await),
            Request::ResetScores => Self::done_or_rejected(session.reset_scores(self.id()).await),
            Request::ReturnToLobby => {
                Self::done_or_rejected(session.return_to_lobby(self.id()).await)
            }
        }
    }

    /// Releases every alias still held by this connection
    pub async fn disconnect(&mut self, session: &Session) {
        for alias in std::mem::take(&mut self.aliases) {
            session.leave(self.id(), &alias).await;
        }
    }

    fn done_or_rejected<E: std::fmt::Display>(result: Result<(), E>) -> Reply {
        match result {
            Ok(()) => Reply::Done,
            Err(e) => {
                warn!("Request rejected: {}", e);
                Reply::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Accepts client connections and feeds them into one shared session
pub struct Server {
    listener: TcpListener,
    session: Arc<Session>,
    next_sink_id: AtomicU64,
}

impl Server {
    pub async fn bind(addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            session: Arc::new(Session::new()),
            next_sink_id: AtomicU64::new(1),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// Accept loop; each connection gets its own task
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Server started successfully");

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    continue;
                }
            };

            let id = SinkId(self.next_sink_id.fetch_add(1, Ordering::Relaxed));
            let session = Arc::clone(&self.session);
            tokio::spawn(async move {
                handle_connection(stream, addr, id, session).await;
            });
        }
    }
}

async fn handle_connection(stream: TcpStream, addr: SocketAddr, id: SinkId, session: Arc<Session>) {
    info!("Client {} connected from {}", id, addr);

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
    }
    let (mut reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerPacket>();

    // Replies and notifications leave through the same queue, in order
    let writer_task = tokio::spawn(async move {
        write_packets(&mut writer, &mut rx, id).await;
    });

    let mut peer = Peer::new(Arc::new(ChannelSink::new(id, tx.clone())));

    loop {
        match read_frame::<_, ClientPacket>(&mut reader).await {
            Ok(Some(ClientPacket::Call(request))) => {
                let reply = peer.handle_request(&session, request).await;
                if tx.send(ServerPacket::Reply(reply)).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Dropping client {}: {}", id, e);
                break;
            }
        }
    }

    peer.disconnect(&session).await;
    drop(peer);
    drop(tx);
    if let Err(e) = writer_task.await {
        error!("Writer for client {} panicked: {}", id, e);
    }
    info!("Client {} disconnected", id);
}

/// Drains `rx` onto the socket until the queue closes or the socket fails
///
/// A packet too large to frame is dropped on its own; the connection stays up.
async fn write_packets<W>(
    writer: &mut W,
    rx: &mut mpsc::UnboundedReceiver<ServerPacket>,
    id: SinkId,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(packet) = rx.recv().await {
        match write_frame(writer, &packet).await {
            Ok(()) => {}
            Err(ProtocolError::FrameTooLarge(len)) => {
                warn!("Skipping {}-byte packet for client {}", len, id);
            }
            Err(e) => {
                error!("Failed to send to client {}: {}", id, e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Hand, Notification};

    fn test_peer(id: u64) -> (Peer, mpsc::UnboundedReceiver<ServerPacket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Peer::new(Arc::new(ChannelSink::new(SinkId(id), tx))), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerPacket>) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(ServerPacket::Notify(n)) = rx.try_recv() {
            received.push(n);
        }
        received
    }

    #[tokio::test]
    async fn test_join_records_alias_and_replies_with_flag() {
        let session = Session::new();
        let (mut host, mut host_rx) = test_peer(1);

        let reply = host
            .handle_request(&session, Request::IdentifyCallerAsHost)
            .await;
        assert_eq!(reply, Reply::Flag(true));

        let reply = host
            .handle_request(&session, Request::Join { name: "Ann".to_string() })
            .await;
        assert_eq!(reply, Reply::Flag(true));
        assert_eq!(host.aliases(), ["Ann".to_string()]);
        assert_eq!(
            drain(&mut host_rx),
            vec![Notification::LobbyBoard(vec!["Ann - Host".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_guest_cannot_start() {
        let session = Session::new();
        let (mut host, _host_rx) = test_peer(1);
        let (mut guest, _guest_rx) = test_peer(2);

        host.handle_request(&session, Request::IdentifyCallerAsHost).await;
        let reply = guest.handle_request(&session, Request::StartGame).await;

        assert!(matches!(reply, Reply::Rejected { .. }));
        assert!(!session.in_progress().await);
    }

    #[tokio::test]
    async fn test_bad_point_limit_is_rejected() {
        let session = Session::new();
        let (mut host, _rx) = test_peer(1);
        host.handle_request(&session, Request::IdentifyCallerAsHost).await;

        let reply = host
            .handle_request(&session, Request::SetPointLimit { limit: 0 })
            .await;
        assert!(matches!(reply, Reply::Rejected { ref reason } if reason.contains("point limit")));

        let reply = host
            .handle_request(&session, Request::SetPointLimit { limit: 3 })
            .await;
        assert_eq!(reply, Reply::Done);
    }

    #[tokio::test]
    async fn test_disconnect_releases_aliases() {
        let session = Session::new();
        let (mut host, _host_rx) = test_peer(1);
        let (mut guest, mut guest_rx) = test_peer(2);

        host.handle_request(&session, Request::IdentifyCallerAsHost).await;
        host.handle_request(&session, Request::Join { name: "Ann".to_string() })
            .await;
        guest
            .handle_request(&session, Request::Join { name: "Bob".to_string() })
            .await;
        drain(&mut guest_rx);

        host.disconnect(&session).await;

        assert!(host.aliases().is_empty());
        assert_eq!(session.players().await.len(), 1);
        assert!(drain(&mut guest_rx).contains(&Notification::HostDisconnected));
    }

    #[tokio::test]
    async fn test_explicit_leave_forgets_alias() {
        let session = Session::new();
        let (mut guest, _rx) = test_peer(2);

        guest
            .handle_request(&session, Request::Join { name: "Bob".to_string() })
            .await;
        let reply = guest
            .handle_request(&session, Request::Leave { name: "bob".to_string() })
            .await;

        assert_eq!(reply, Reply::Done);
        assert!(guest.aliases().is_empty());
        assert!(session.players().await.is_empty());
    }

    #[tokio::test]
    async fn test_select_hand_replies_done() {
        let session = Session::new();
        let (mut guest, _rx) = test_peer(2);

        let reply = guest
            .handle_request(
                &session,
                Request::SelectHand {
                    name: "Nobody".to_string(),
                    hand: Hand::Rock,
                },
            )
            .await;
        assert_eq!(reply, Reply::Done);
    }

    #[tokio::test]
    async fn test_writer_skips_oversized_packet_and_keeps_going() {
        let (mut near, mut far) = tokio::io::duplex(1024);
        let (tx, mut rx) = mpsc::unbounded_channel();

        tx.send(ServerPacket::Notify(Notification::LobbyBoard(vec![
            "a".repeat(40_000),
            "b".repeat(40_000),
        ])))
        .unwrap();
        tx.send(ServerPacket::Reply(Reply::Flag(false))).unwrap();
        drop(tx);

        write_packets(&mut near, &mut rx, SinkId(1)).await;
        drop(near);

        let first: Option<ServerPacket> = read_frame(&mut far).await.unwrap();
        assert_eq!(first, Some(ServerPacket::Reply(Reply::Flag(false))));
        let end: Option<ServerPacket> = read_frame(&mut far).await.unwrap();
        assert!(end.is_none());
    }

    #[tokio::test]
    async fn test_server_binds_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();

        assert_ne!(addr.port(), 0);
        assert!(!server.session().in_progress().await);
    }
}
