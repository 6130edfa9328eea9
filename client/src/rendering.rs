//! Terminal output for boards and round results

use crate::game::ClientView;
use shared::Notification;

fn board(title: &str, entries: &[String]) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", title)];
    if entries.is_empty() {
        lines.push("  (empty)".to_string());
    }
    lines.extend(entries.iter().map(|e| format!("  {}", e)));
    lines
}

/// Lines to print for a notification, after it has been applied to `view`
pub fn render_notification(view: &ClientView, notification: &Notification) -> Vec<String> {
    let finished_round = view.round.saturating_sub(1);

    match notification {
        Notification::ReadyToStart => {
            vec!["Enough players have joined. Set a limit and type 'start'.".to_string()]
        }
        Notification::TieRound => vec![format!("Round {} - Tie!", finished_round)],
        Notification::WinRound => vec![format!("Round {} - You won the round!", finished_round)],
        Notification::LossRound => vec![format!("Round {} - You lost the round.", finished_round)],
        Notification::LockedInBoard(entries) => board("Locked In", entries),
        Notification::LobbyBoard(entries) => board("Lobby", entries),
        Notification::ScoreBoard(entries) => board("Scores", entries),
        Notification::StartingGame {
            scoreboard,
            win_threshold,
        } => {
            let mut lines = vec![format!("Game starting! First to {} wins.", win_threshold)];
            lines.extend(board("Scores", scoreboard));
            lines.push(format!("Round {} - pick rock, paper or scissors", view.round));
            lines
        }
        Notification::EndGame(entries) => {
            let mut lines = board("Final Scores", entries);
            if view.is_host {
                lines.push("Type 'lobby' to play again or 'quit' to leave.".to_string());
            } else {
                lines.push("Waiting for the host. Type 'quit' to leave.".to_string());
            }
            lines
        }
        Notification::HostDisconnected => {
            vec!["The host has disconnected. Type 'quit' to leave.".to_string()]
        }
        Notification::ReturnedToLobby => vec!["Back in the lobby.".to_string()],
    }
}

/// Full dump of the current view for the `status` command
pub fn render_status(view: &ClientView) -> Vec<String> {
    let mut lines = vec![match &view.name {
        Some(name) if view.is_host => format!("Playing as {} (host)", name),
        Some(name) => format!("Playing as {}", name),
        None => "Not joined yet".to_string(),
    }];

    lines.extend(board("Lobby", &view.lobby));
    if let Some(limit) = view.win_threshold {
        lines.push(format!("Round {} - first to {}", view.round, limit));
        lines.extend(board("Scores", &view.scores));
        lines.extend(board("Locked In", &view.locked_in));
    }
    if let Some(hand) = view.locked_hand {
        lines.push(format!("You locked in {}", hand));
    }
    if let Some(final_scores) = &view.final_scores {
        lines.extend(board("Final Scores", final_scores));
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
