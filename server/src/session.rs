//! Authoritative lobby and match state
//!
//! A `Session` owns the roster, the host binding, the win threshold and every
//! player's hand and score. All of it lives behind one lock so that "has every
//! player committed a hand" is always judged against a consistent roster, and
//! a round can never resolve twice.
//!
//! Mutating operations queue their notifications in an [`Outbox`] while the
//! lock is held and deliver them only after it is released, so a slow client
//! never holds up the session.

use crate::board;
use crate::error::SessionError;
use crate::player::Player;
use crate::round::{self, RoundResult};
use crate::sink::{NotificationSink, Outbox, Sink, SinkError, SinkId};
use log::{debug, info, warn};
use shared::{ConfigError, Hand, PointLimit, MAX_NAME_LEN, MAX_PLAYERS, MIN_PLAYERS};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct SessionState {
    /// Join order, except the host is always first
    players: Vec<Player>,
    /// Bound by the first `identify_caller`; never rebound
    host: Option<SinkId>,
    point_limit: Option<PointLimit>,
    game_started: bool,
}

impl SessionState {
    fn find(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.matches(name))
    }

    fn is_host(&self, sink: SinkId) -> bool {
        self.host == Some(sink)
    }

    fn require_host(&self, caller: SinkId) -> Result<(), SessionError> {
        if self.is_host(caller) {
            Ok(())
        } else {
            Err(SessionError::NotHost(caller))
        }
    }

    fn valid_player_count(&self) -> bool {
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players.len())
    }

    fn all_locked_in(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(Player::is_locked_in)
    }

    fn clear_hands(&mut self) {
        for player in &mut self.players {
            player.hand = None;
        }
    }

    fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
            player.hand = None;
        }
    }

    fn game_over(&self) -> bool {
        match self.point_limit {
            Some(limit) => self.players.iter().any(|p| p.score >= limit.get()),
            None => false,
        }
    }

    fn broadcast<F>(&self, outbox: &mut Outbox, send: F)
    where
        F: Fn(&dyn NotificationSink) -> Result<(), SinkError> + Clone + Send + 'static,
    {
        for player in &self.players {
            outbox.push(&player.sink, send.clone());
        }
    }

    fn broadcast_lobby(&self, outbox: &mut Outbox) {
        let entries = board::lobby_board(&self.players);
        self.broadcast(outbox, move |s| s.lobby_board(entries.clone()));
    }

    fn broadcast_scores(&self, outbox: &mut Outbox) {
        let entries = board::score_board(&self.players);
        self.broadcast(outbox, move |s| s.score_board(entries.clone()));
    }

    fn broadcast_locked_in(&self, outbox: &mut Outbox) {
        let entries = board::locked_in_board(&self.players);
        self.broadcast(outbox, move |s| s.locked_in_board(entries.clone()));
    }

    /// Compares every committed hand, scores the round and checks for a winner
    fn resolve_round(&mut self, outbox: &mut Outbox) {
        let outcome = round::resolve(self.players.iter().filter_map(|p| p.hand));
        debug!("Round resolved as {:?}", outcome);

        for player in &mut self.players {
            let Some(hand) = player.hand else {
                continue;
            };

            match outcome.result_for(hand) {
                RoundResult::Tie => outbox.push(&player.sink, |s| s.tie_round()),
                RoundResult::Win => {
                    player.score += 1;
                    outbox.push(&player.sink, |s| s.win_round());
                }
                RoundResult::Loss => outbox.push(&player.sink, |s| s.loss_round()),
            }
        }

        self.clear_hands();

        if outcome == round::RoundOutcome::Tie {
            info!("Round tied");
            self.broadcast_locked_in(outbox);
            return;
        }

        self.broadcast_scores(outbox);
        self.broadcast_locked_in(outbox);

        if self.game_over() {
            let final_board = board::final_board(&self.players, self.point_limit);
            info!("Game over: {:?}", final_board);
            self.broadcast(outbox, move |s| s.end_game(final_board.clone()));
        }
    }
}

/// One lobby and its match, shared by every connection handler
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `caller` as host if nobody is bound yet, then reports whether
    /// `caller` is the host
    pub async fn identify_caller(&self, caller: SinkId) -> bool {
        let mut state = self.state.write().await;
        match state.host {
            None => {
                info!("{} bound as host", caller);
                state.host = Some(caller);
                true
            }
            Some(host) => host == caller,
        }
    }

    /// Admits `name` unless the alias is taken, the game is running or the
    /// room is full
    pub async fn join(&self, name: &str, sink: &Sink) -> bool {
        let mut outbox = Outbox::new();
        {
            let mut state = self.state.write().await;

            if name.trim().is_empty() {
                warn!("Rejected join with empty alias from {}", sink.id());
                return false;
            }
            if name.chars().count() > MAX_NAME_LEN {
                warn!(
                    "Rejected join from {}: alias longer than {} characters",
                    sink.id(),
                    MAX_NAME_LEN
                );
                return false;
            }
            if state.find(name).is_some() {
                info!("Rejected join for '{}': alias in use", name);
                return false;
            }
            if state.game_started {
                info!("Rejected join for '{}': game in progress", name);
                return false;
            }
            if state.players.len() >= MAX_PLAYERS {
                info!("Rejected join for '{}': lobby is full", name);
                return false;
            }

            let is_host = state.is_host(sink.id());
            let player = Player::new(name, is_host, sink.clone());
            if is_host {
                state.players.insert(0, player);
            } else {
                state.players.push(player);
            }
            info!(
                "{} joined as '{}'{} ({} players)",
                sink.id(),
                name,
                if is_host { " (host)" } else { "" },
                state.players.len()
            );

            state.broadcast_lobby(&mut outbox);

            if state.valid_player_count() {
                for player in state.players.iter().filter(|p| p.is_host) {
                    outbox.push(&player.sink, |s| s.ready_to_start());
                }
            }
        }
        outbox.dispatch();
        true
    }

    /// Removes `name` from the roster and tells everyone else
    ///
    /// If the departing player was the host, or `caller` is the host, the
    /// remaining players are told the host disconnected. Nobody is promoted.
    pub async fn leave(&self, caller: SinkId, name: &str) {
        let mut outbox = Outbox::new();
        {
            let mut state = self.state.write().await;

            let removed = state.find(name).map(|index| state.players.remove(index));
            let host_left =
                removed.as_ref().map_or(false, |p| p.is_host) || state.is_host(caller);

            match &removed {
                Some(player) => info!("'{}' ({}) left the session", player.name, player.sink_id()),
                None => debug!("Leave for unknown player '{}' ignored", name),
            }

            state.broadcast_lobby(&mut outbox);
            state.broadcast_scores(&mut outbox);
            state.broadcast_locked_in(&mut outbox);

            if host_left {
                warn!("Host disconnected");
                state.broadcast(&mut outbox, |s| s.host_disconnected());
            }
        }
        outbox.dispatch();
    }

    pub async fn is_full(&self) -> bool {
        self.state.read().await.players.len() >= MAX_PLAYERS
    }

    pub async fn in_progress(&self) -> bool {
        self.state.read().await.game_started
    }

    pub async fn valid_player_count(&self) -> bool {
        self.state.read().await.valid_player_count()
    }

    pub async fn set_point_limit(&self, caller: SinkId, limit: i64) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        state.require_host(caller)?;

        let limit = PointLimit::new(limit)?;
        info!("Point limit set to {}", limit);
        state.point_limit = Some(limit);
        Ok(())
    }

    pub async fn start_game(&self, caller: SinkId) -> Result<(), SessionError> {
        let mut outbox = Outbox::new();
        {
            let mut state = self.state.write().await;
            state.require_host(caller)?;

            let limit = state.point_limit.ok_or(ConfigError::PointLimitUnset)?;
            if !state.valid_player_count() {
                return Err(SessionError::InvalidPlayerCount(state.players.len()));
            }

            state.game_started = true;
            info!(
                "Game started with {} players, first to {}",
                state.players.len(),
                limit
            );

            let scoreboard = board::score_board(&state.players);
            let threshold = limit.get();
            for player in &state.players {
                let scoreboard = scoreboard.clone();
                outbox.push(&player.sink, move |s| s.starting_game(scoreboard, threshold));
            }
            state.broadcast_locked_in(&mut outbox);
        }
        outbox.dispatch();
        Ok(())
    }

    /// Zeroes scores and hands; membership and the running flag are kept
    pub async fn reset_scores(&self, caller: SinkId) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        state.require_host(caller)?;

        state.reset_scores();
        info!("Scores reset");
        Ok(())
    }

    /// Puts the session back into a startable lobby
    ///
    /// Scores and hands are zeroed, the point limit is cleared and new joins
    /// are accepted again.
    pub async fn return_to_lobby(&self, caller: SinkId) -> Result<(), SessionError> {
        let mut outbox = Outbox::new();
        {
            let mut state = self.state.write().await;
            state.require_host(caller)?;

            state.reset_scores();
            state.game_started = false;
            state.point_limit = None;
            info!("Session returned to lobby");

            state.broadcast(&mut outbox, |s| s.returned_to_lobby());
            state.broadcast_lobby(&mut outbox);
        }
        outbox.dispatch();
        Ok(())
    }

    /// Records `hand` for `name` and resolves the round once everyone has
    /// committed
    ///
    /// Unknown names change nothing but still trigger a locked-in broadcast.
    pub async fn select_hand(&self, name: &str, hand: Hand) {
        let mut outbox = Outbox::new();
        {
            let mut state = self.state.write().await;

            match state.find(name) {
                Some(index) => {
                    debug!("'{}' locked in", state.players[index].name);
                    state.players[index].hand = Some(hand);
                }
                None => debug!("Hand from unknown player '{}' ignored", name),
            }

            state.broadcast_locked_in(&mut outbox);

            if state.all_locked_in() {
                state.resolve_round(&mut outbox);
            }
        }
        outbox.dispatch();
    }

    /// Copy of the roster in display order
    pub async fn players(&self) -> Vec<Player> {
        self.state.read().await.players.clone()
    }

    pub async fn point_limit(&self) -> Option<PointLimit> {
        self.state.read().await.point_limit
    }
}
