//! Client-side view of the session, rebuilt from pushed notifications

use shared::{Hand, Notification};

/// Everything the client knows about the session
#[derive(Debug, Clone, Default)]
pub struct ClientView {
    pub name: Option<String>,
    pub is_host: bool,
    /// Counted locally; the server does not number rounds
    pub round: u32,
    pub win_threshold: Option<u32>,
    pub lobby: Vec<String>,
    pub scores: Vec<String>,
    pub locked_in: Vec<String>,
    pub final_scores: Option<Vec<String>>,
    /// Hand committed for the current round, if any
    pub locked_hand: Option<Hand>,
    pub ready_to_start: bool,
    pub host_disconnected: bool,
}

impl ClientView {
    pub fn new(is_host: bool) -> Self {
        Self {
            is_host,
            round: 1,
            ..Self::default()
        }
    }

    pub fn in_game(&self) -> bool {
        self.win_threshold.is_some() && self.final_scores.is_none()
    }

    /// Folds one notification into the view
    pub fn apply(&mut self, notification: &Notification) {
        match notification {
            Notification::ReadyToStart => self.ready_to_start = true,
            Notification::TieRound | Notification::WinRound | Notification::LossRound => {
                self.round += 1;
                self.locked_hand = None;
            }
            Notification::LockedInBoard(entries) => self.locked_in = entries.clone(),
            Notification::LobbyBoard(entries) => self.lobby = entries.clone(),
            Notification::ScoreBoard(entries) => self.scores = entries.clone(),
            Notification::StartingGame {
                scoreboard,
                win_threshold,
            } => {
                self.scores = scoreboard.clone();
                self.win_threshold = Some(*win_threshold);
                self.round = 1;
                self.locked_hand = None;
                self.final_scores = None;
            }
            Notification::EndGame(entries) => self.final_scores = Some(entries.clone()),
            Notification::HostDisconnected => self.host_disconnected = true,
            Notification::ReturnedToLobby => self.return_to_lobby(),
        }
    }

    fn return_to_lobby(&mut self) {
        self.round = 1;
        self.win_threshold = None;
        self.final_scores = None;
        self.locked_hand = None;
        self.ready_to_start = false;
        self.scores.clear();
        self.locked_in.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_counter_advances_on_every_outcome() {
        let mut view = ClientView::new(false);
        view.apply(&Notification::StartingGame {
            scoreboard: vec![" 0 - A".to_string()],
            win_threshold: 3,
        });
        assert_eq!(view.round, 1);
        assert!(view.in_game());

        view.locked_hand = Some(Hand::Rock);
        view.apply(&Notification::TieRound);
        assert_eq!(view.round, 2);
        assert!(view.locked_hand.is_none());

        view.apply(&Notification::WinRound);
        view.apply(&Notification::LossRound);
        assert_eq!(view.round, 4);
    }

    #[test]
    fn test_boards_are_replaced() {
        let mut view = ClientView::new(true);
        view.apply(&Notification::LobbyBoard(vec!["A - Host".to_string()]));
        view.apply(&Notification::LobbyBoard(vec![
            "A - Host".to_string(),
            "B ".to_string(),
        ]));
        view.apply(&Notification::ScoreBoard(vec![" 1 - A".to_string()]));

        assert_eq!(view.lobby.len(), 2);
        assert_eq!(view.scores, vec![" 1 - A".to_string()]);
    }

    #[test]
    fn test_end_game_then_lobby_resets_match_state() {
        let mut view = ClientView::new(false);
        view.apply(&Notification::StartingGame {
            scoreboard: vec![],
            win_threshold: 1,
        });
        view.apply(&Notification::WinRound);
        view.apply(&Notification::EndGame(vec!["Winner -  1 - A".to_string()]));
        assert!(!view.in_game());

        view.apply(&Notification::ReturnedToLobby);
        assert!(view.final_scores.is_none());
        assert!(view.win_threshold.is_none());
        assert_eq!(view.round, 1);
    }

    #[test]
    fn test_lobby_mid_match_leaves_the_game() {
        let mut view = ClientView::new(false);
        view.apply(&Notification::StartingGame {
            scoreboard: vec![" 0 - A".to_string(), " 0 - B".to_string()],
            win_threshold: 5,
        });
        view.apply(&Notification::WinRound);
        view.locked_hand = Some(Hand::Paper);

        view.apply(&Notification::ReturnedToLobby);
        view.apply(&Notification::LobbyBoard(vec![
            "A - Host".to_string(),
            "B ".to_string(),
        ]));

        assert!(!view.in_game());
        assert!(view.locked_hand.is_none());
        assert_eq!(view.round, 1);
        assert_eq!(view.lobby.len(), 2);
    }

    #[test]
    fn test_player_leaving_mid_match_keeps_the_game() {
        let mut view = ClientView::new(false);
        view.apply(&Notification::StartingGame {
            scoreboard: vec![],
            win_threshold: 5,
        });

        view.apply(&Notification::LobbyBoard(vec!["A - Host".to_string()]));
        view.apply(&Notification::ScoreBoard(vec![" 0 - A".to_string()]));

        assert!(view.in_game());
        assert_eq!(view.win_threshold, Some(5));
    }

    #[test]
    fn test_host_flags() {
        let mut view = ClientView::new(true);
        view.apply(&Notification::ReadyToStart);
        view.apply(&Notification::HostDisconnected);

        assert!(view.ready_to_start);
        assert!(view.host_disconnected);
    }
}
