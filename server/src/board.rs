//! Text boards pushed to clients
//!
//! Entry layouts are part of the client contract and must not drift.

use crate::player::Player;
use shared::PointLimit;

/// Players by descending score; equal scores keep roster order
pub fn rank_by_score(players: &[Player]) -> Vec<&Player> {
    let mut ranked: Vec<&Player> = players.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

pub fn lobby_board(players: &[Player]) -> Vec<String> {
    players
        .iter()
        .map(|p| format!("{} {}", p.name, if p.is_host { "- Host" } else { "" }))
        .collect()
}

pub fn score_board(players: &[Player]) -> Vec<String> {
    rank_by_score(players)
        .into_iter()
        .map(|p| format!("{:>2} - {}", p.score, p.name))
        .collect()
}

/// Ranked scores tagged `Winner` when the score equals the limit
pub fn final_board(players: &[Player], limit: Option<PointLimit>) -> Vec<String> {
    rank_by_score(players)
        .into_iter()
        .map(|p| {
            let won = limit.map_or(false, |l| p.score == l.get());
            format!(
                "{:<6} - {:>2} - {}",
                if won { "Winner" } else { "Loser" },
                p.score,
                p.name
            )
        })
        .collect()
}

pub fn locked_in_board(players: &[Player]) -> Vec<String> {
    players
        .iter()
        .map(|p| {
            format!(
                "{} - {}",
                p.name,
                if p.is_locked_in() { "Locked In" } else { "Selecting..." }
            )
        })
        .collect()
}
